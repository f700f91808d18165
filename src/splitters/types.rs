use super::buckets::MonthYear;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

/// Single fold of a nested cross-validation run
#[derive(Debug, Clone)]
pub struct FoldSplit {
    /// 1-based position of the fold in emission order
    pub fold: usize,
    pub training: DataFrame,
    pub validation: DataFrame,
    pub training_months: Vec<MonthYear>,
    pub validation_months: Vec<MonthYear>,
}

impl FoldSplit {
    pub fn training_rows(&self) -> usize {
        self.training.height()
    }

    pub fn validation_rows(&self) -> usize {
        self.validation.height()
    }

    /// Drop the month bookkeeping and keep the (training, validation) frames.
    pub fn into_pair(self) -> (DataFrame, DataFrame) {
        (self.training, self.validation)
    }

    pub fn summary(&self) -> FoldSummary {
        FoldSummary {
            fold: self.fold,
            training_rows: self.training_rows(),
            validation_rows: self.validation_rows(),
            training_start: self.training_months.first().map(|m| m.to_string()),
            training_end: self.training_months.last().map(|m| m.to_string()),
            validation_start: self.validation_months.first().map(|m| m.to_string()),
            validation_end: self.validation_months.last().map(|m| m.to_string()),
        }
    }
}

/// Row counts and month boundaries of a fold, for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoldSummary {
    pub fold: usize,
    pub training_rows: usize,
    pub validation_rows: usize,
    pub training_start: Option<String>,
    pub training_end: Option<String>,
    pub validation_start: Option<String>,
    pub validation_end: Option<String>,
}

fn span(start: &Option<String>, end: &Option<String>) -> String {
    match (start, end) {
        (Some(start), Some(end)) if start == end => start.clone(),
        (Some(start), Some(end)) => format!("{}..{}", start, end),
        _ => "-".to_string(),
    }
}

impl fmt::Display for FoldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fold {}: train {} ({} rows) | validation {} ({} rows)",
            self.fold,
            span(&self.training_start, &self.training_end),
            self.training_rows,
            span(&self.validation_start, &self.validation_end),
            self.validation_rows,
        )
    }
}

/// Configuration for data splitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    pub n_folds: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self { n_folds: 3 }
    }
}
