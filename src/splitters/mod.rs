pub mod base;
pub mod buckets;
pub mod nested;
pub mod types;

pub use base::DataSplitter;
pub use buckets::MonthYear;
pub use nested::{NestedCvFolds, NestedCvSplitter};
pub use types::{FoldSplit, FoldSummary, SplitConfig};
