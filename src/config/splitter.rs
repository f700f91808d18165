use super::traits::ConfigSection;
use crate::error::NestedCvError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Number of (training, validation) folds
    pub folds: usize,
    pub date_column: String,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            folds: 3,
            date_column: "date".to_string(),
        }
    }
}

impl ConfigSection for SplitterConfig {
    fn section_name() -> &'static str {
        "splitter"
    }

    fn validate(&self) -> Result<(), NestedCvError> {
        if self.folds == 0 {
            return Err(NestedCvError::Configuration(
                "Number of folds must be at least 1".to_string()
            ));
        }
        if self.date_column.trim().is_empty() {
            return Err(NestedCvError::Configuration(
                "Date column name must not be empty".to_string()
            ));
        }
        Ok(())
    }
}
