use super::base::DataSplitter;
use super::buckets::{ensure_temporal, group_buckets, month_keys, MonthBucket, MonthYear};
use super::types::{FoldSplit, SplitConfig};
use crate::config::SplitterConfig;
use crate::config::traits::ConfigSection;
use crate::error::{NestedCvError, Result};
use polars::prelude::*;
use std::iter::FusedIterator;

/// Nested cross-validation over calendar months.
///
/// With `n` distinct month-year buckets and `k` folds, every validation block
/// spans `n / (k + 1)` buckets. Fold `i` trains on all buckets before
/// `i * window` and validates on the following `window` buckets; the last fold
/// validates on everything that remains.
pub struct NestedCvSplitter {
    config: SplitConfig,
}

impl NestedCvSplitter {
    pub fn new(n_folds: usize) -> Result<Self> {
        if n_folds == 0 {
            return Err(NestedCvError::Configuration(
                "Number of folds must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            config: SplitConfig { n_folds },
        })
    }

    pub fn from_config(config: &SplitterConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.folds)
    }

    pub fn n_folds(&self) -> usize {
        self.config.n_folds
    }
}

impl DataSplitter for NestedCvSplitter {
    type Folds = NestedCvFolds;

    fn split(&self, data: &DataFrame, date_column: &str) -> Result<NestedCvFolds> {
        if data.height() == 0 {
            return Err(NestedCvError::EmptyInput);
        }
        ensure_temporal(data, date_column)?;

        // Stable: rows sharing a timestamp keep their input order.
        let sorted = data
            .sort(
                [date_column],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .map_err(|e| {
                NestedCvError::DateProcessing(format!(
                    "failed to sort by '{}': {}. Please ensure proper date values",
                    date_column, e
                ))
            })?;

        let keys = month_keys(ensure_temporal(&sorted, date_column)?)?;
        let buckets = group_buckets(&keys);
        let window = buckets.len() / (self.config.n_folds + 1);

        log::debug!(
            "{} rows across {} month buckets, {} folds, window of {} month(s)",
            sorted.height(),
            buckets.len(),
            self.config.n_folds,
            window
        );
        if window == 0 {
            log::warn!(
                "Only {} month bucket(s) for {} folds: early folds will be empty",
                buckets.len(),
                self.config.n_folds
            );
        }

        Ok(NestedCvFolds {
            data: sorted,
            buckets,
            n_folds: self.config.n_folds,
            window,
            next_fold: 1,
            exhausted: false,
        })
    }

    fn config(&self) -> &SplitConfig {
        &self.config
    }
}

/// Lazy sequence of folds produced by [`NestedCvSplitter::split`].
///
/// Subsets are sliced out of the date-sorted frame only when a fold is
/// requested. Iteration stops for good after the first error.
#[derive(Debug, Clone)]
pub struct NestedCvFolds {
    data: DataFrame,
    buckets: Vec<MonthBucket>,
    n_folds: usize,
    window: usize,
    next_fold: usize,
    exhausted: bool,
}

impl NestedCvFolds {
    /// Distinct month-year buckets in chronological order
    pub fn months(&self) -> Vec<MonthYear> {
        self.buckets.iter().map(|b| b.key).collect()
    }

    /// Buckets per validation block
    pub fn window(&self) -> usize {
        self.window
    }

    pub fn n_folds(&self) -> usize {
        self.n_folds
    }

    fn row_offset(&self, bucket_idx: usize) -> usize {
        self.buckets
            .get(bucket_idx)
            .map(|b| b.offset)
            .unwrap_or_else(|| self.data.height())
    }

    fn materialize(&self, fold: usize) -> Result<FoldSplit> {
        let n = self.buckets.len();
        let val_start = fold * self.window;
        let val_end = val_start + self.window;

        // The last fold absorbs buckets left over by the integer division.
        let val_stop = if fold == self.n_folds || val_end >= n {
            n
        } else {
            val_end
        };

        if val_start > n {
            return Err(NestedCvError::SplitOperation(format!(
                "fold {} starts at bucket {} but only {} buckets exist",
                fold, val_start, n
            )));
        }

        let train_rows = self.row_offset(val_start);
        let val_rows_end = self.row_offset(val_stop);
        if val_rows_end < train_rows || val_rows_end > self.data.height() {
            return Err(NestedCvError::SplitOperation(format!(
                "fold {} maps to rows {}..{} of a {}-row frame. Please check the splitting logic",
                fold,
                train_rows,
                val_rows_end,
                self.data.height()
            )));
        }

        let training = self.data.slice(0, train_rows);
        let validation = self
            .data
            .slice(train_rows as i64, val_rows_end - train_rows);

        Ok(FoldSplit {
            fold,
            training,
            validation,
            training_months: self.buckets[..val_start].iter().map(|b| b.key).collect(),
            validation_months: self.buckets[val_start..val_stop]
                .iter()
                .map(|b| b.key)
                .collect(),
        })
    }
}

impl Iterator for NestedCvFolds {
    type Item = Result<FoldSplit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted || self.next_fold > self.n_folds {
            return None;
        }

        let fold = self.next_fold;
        self.next_fold += 1;

        let result = self.materialize(fold);
        if result.is_err() {
            self.exhausted = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.exhausted {
            0
        } else {
            (self.n_folds + 1).saturating_sub(self.next_fold)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for NestedCvFolds {}

impl FusedIterator for NestedCvFolds {}
