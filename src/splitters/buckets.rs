use crate::error::{NestedCvError, Result};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar month of a given year. Orders chronologically (year, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthYear {
    pub year: i32,
    pub month: u32,
}

impl MonthYear {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl From<NaiveDate> for MonthYear {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{}", self.month, self.year)
    }
}

/// Contiguous run of rows sharing a month-year key in a date-sorted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBucket {
    pub key: MonthYear,
    pub offset: usize,
    pub len: usize,
}

fn date_error(column: &str, err: impl fmt::Display) -> NestedCvError {
    NestedCvError::DateProcessing(format!(
        "column '{}': {}. Please ensure proper date values",
        column, err
    ))
}

/// Look up `date_column` and check it holds non-null temporal values.
pub fn ensure_temporal<'a>(data: &'a DataFrame, date_column: &str) -> Result<&'a Column> {
    let column = data
        .column(date_column)
        .map_err(|e| date_error(date_column, e))?;

    if !matches!(column.dtype(), DataType::Date | DataType::Datetime(_, _)) {
        return Err(date_error(
            date_column,
            format!("expected Date or Datetime values, found {:?}", column.dtype()),
        ));
    }

    let nulls = column.null_count();
    if nulls > 0 {
        return Err(date_error(
            date_column,
            format!("{} null value(s) cannot be assigned to a month", nulls),
        ));
    }

    Ok(column)
}

/// Month-year key of every row, in row order.
pub fn month_keys(column: &Column) -> Result<Vec<MonthYear>> {
    let name = column.name().to_string();
    let series = column.as_materialized_series();

    let years = series
        .year()
        .map_err(|e| date_error(&name, e))?
        .into_series()
        .cast(&DataType::Int32)?;
    let months = series
        .month()
        .map_err(|e| date_error(&name, e))?
        .into_series()
        .cast(&DataType::Int32)?;

    years
        .i32()?
        .into_iter()
        .zip(months.i32()?.into_iter())
        .enumerate()
        .map(|(row, pair)| match pair {
            (Some(year), Some(month)) if (1..=12).contains(&month) => {
                Ok(MonthYear::new(year, month as u32))
            }
            _ => Err(date_error(&name, format!("no month-year for row {}", row))),
        })
        .collect()
}

/// Group consecutive equal keys into buckets. `keys` must come from a frame
/// sorted by date, so each month occupies a single run.
pub fn group_buckets(keys: &[MonthYear]) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = Vec::new();

    for (row, key) in keys.iter().enumerate() {
        match buckets.last_mut() {
            Some(bucket) if bucket.key == *key => bucket.len += 1,
            _ => buckets.push(MonthBucket {
                key: *key,
                offset: row,
                len: 1,
            }),
        }
    }

    buckets
}
