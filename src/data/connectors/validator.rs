use crate::error::{NestedCvError, Result};
use crate::splitters::buckets::ensure_temporal;
use polars::prelude::*;

pub struct DataValidator;

impl DataValidator {
    /// Validate that `date_column` exists and holds non-null Date/Datetime values
    pub fn validate_date_column(df: &DataFrame, date_column: &str) -> Result<()> {
        ensure_temporal(df, date_column).map(|_| ())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() == 0 {
            return Err(NestedCvError::EmptyInput);
        }
        if df.height() < min_rows {
            return Err(NestedCvError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Null counts per column, for columns that have any
    pub fn check_nulls(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }
}
