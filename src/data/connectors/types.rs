use crate::splitters::MonthYear;
use serde::{Deserialize, Serialize};

/// Metadata about a loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub file_path: String,
    pub num_rows: usize,
    pub num_columns: usize,
    pub columns: Vec<String>,
    pub date_column: String,
    pub month_range: Option<(MonthYear, MonthYear)>,  // (first, last)
    pub distinct_months: usize,
}
