//! Time-ordered nested cross-validation over polars DataFrames.
//!
//! Rows are grouped into calendar month-year buckets and every fold trains on
//! an earlier contiguous run of buckets and validates on the run that follows.

pub mod config;
pub mod data;
pub mod error;
pub mod splitters;

pub use error::{NestedCvError, Result};
pub use splitters::{DataSplitter, FoldSplit, FoldSummary, MonthYear, NestedCvFolds, NestedCvSplitter};
