use super::types::{FoldSplit, SplitConfig};
use crate::error::Result;
use polars::prelude::*;

pub trait DataSplitter: Send + Sync {
    type Folds: Iterator<Item = Result<FoldSplit>>;

    /// Split data into folds ordered by `date_column`. Folds are produced lazily.
    fn split(&self, data: &DataFrame, date_column: &str) -> Result<Self::Folds>;

    /// Get splitter configuration
    fn config(&self) -> &SplitConfig;
}
