use super::traits::ConfigSection;
use crate::error::NestedCvError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub min_rows: usize,
    /// chrono format for date columns that load as text, e.g. "%d/%m/%Y"
    pub date_format: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            min_rows: 1,
            date_format: None,
        }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), NestedCvError> {
        if self.min_rows == 0 {
            return Err(NestedCvError::Configuration(
                "Minimum row count must be at least 1".to_string()
            ));
        }
        if matches!(&self.date_format, Some(fmt) if fmt.trim().is_empty()) {
            return Err(NestedCvError::Configuration(
                "Date format must not be empty when set".to_string()
            ));
        }
        Ok(())
    }
}
