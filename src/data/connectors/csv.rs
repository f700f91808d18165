use crate::config::{AppConfig, DataConfig};
use crate::error::{NestedCvError, Result};
use crate::splitters::buckets::{ensure_temporal, month_keys};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;
use std::collections::BTreeSet;
use std::path::Path;
use super::{types::DatasetMetadata, validator::DataValidator};

/// Formats tried, in order, for text date columns when none is configured
const DEFAULT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame, letting polars detect date columns
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .map_parse_options(|opts| opts.with_try_parse_dates(true))
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| NestedCvError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a CSV file and make it ready for splitting on the configured date column
    pub fn load_for_split<P: AsRef<Path>>(path: P, config: &AppConfig) -> Result<DataFrame> {
        let df = Self::load(&path)?;
        DataValidator::validate_minimum_rows(&df, config.data.min_rows)?;

        let date_column = config.splitter.date_column.as_str();
        let df = Self::coerce_date_column(df, date_column, &config.data)?;
        DataValidator::validate_date_column(&df, date_column)?;

        // Warn about nulls but don't fail
        let null_report = DataValidator::check_nulls(&df);
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        Ok(df)
    }

    /// Parse a text date column into `Date` (or `Datetime` when any value has a
    /// time of day). Temporal columns are returned unchanged.
    pub fn coerce_date_column(
        mut df: DataFrame,
        date_column: &str,
        config: &DataConfig,
    ) -> Result<DataFrame> {
        let dtype = df
            .column(date_column)
            .map_err(|e| NestedCvError::DateProcessing(format!("column '{}': {}", date_column, e)))?
            .dtype()
            .clone();

        match dtype {
            DataType::Date | DataType::Datetime(_, _) => return Ok(df),
            DataType::String => {}
            other => {
                return Err(NestedCvError::DateProcessing(format!(
                    "column '{}' has dtype {:?}, expected dates or date strings",
                    date_column, other
                )))
            }
        }

        let parsed = df
            .column(date_column)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|value| {
                value
                    .map(|text| parse_timestamp(text.trim(), config.date_format.as_deref()))
                    .transpose()
            })
            .collect::<Result<Vec<Option<NaiveDateTime>>>>()?;

        let date_only = parsed
            .iter()
            .flatten()
            .all(|ts| ts.time() == NaiveTime::MIN);

        let series = if date_only {
            let dates: Vec<Option<NaiveDate>> = parsed.iter().map(|ts| ts.map(|t| t.date())).collect();
            Series::new(date_column.into(), dates)
        } else {
            Series::new(date_column.into(), parsed)
        };

        log::debug!("Parsed text column '{}' as {:?}", date_column, series.dtype());
        df.with_column(series)?;
        Ok(df)
    }

    /// Create metadata for a loaded DataFrame
    pub fn create_metadata<P: AsRef<Path>>(
        path: P,
        df: &DataFrame,
        date_column: &str,
    ) -> Result<DatasetMetadata> {
        let columns: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        let months: BTreeSet<_> = month_keys(ensure_temporal(df, date_column)?)?
            .into_iter()
            .collect();

        let month_range = match (months.first(), months.last()) {
            (Some(first), Some(last)) => Some((*first, *last)),
            _ => None,
        };

        Ok(DatasetMetadata {
            file_path: path.as_ref().to_string_lossy().to_string(),
            num_rows: df.height(),
            num_columns: df.width(),
            columns,
            date_column: date_column.to_string(),
            month_range,
            distinct_months: months.len(),
        })
    }
}

fn parse_timestamp(text: &str, format: Option<&str>) -> Result<NaiveDateTime> {
    let formats: Vec<&str> = match format {
        Some(fmt) => vec![fmt],
        None => DEFAULT_DATE_FORMATS.to_vec(),
    };

    for fmt in formats {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(ts);
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }

    Err(NestedCvError::DateProcessing(format!(
        "cannot parse '{}' as a date. Please ensure proper date values",
        text
    )))
}
