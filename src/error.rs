use thiserror::Error;

#[derive(Error, Debug)]
pub enum NestedCvError {
    #[error("Input data is empty: provide a non-empty DataFrame")]
    EmptyInput,

    #[error("Error processing date column: {0}")]
    DateProcessing(String),

    #[error("Error in split operation: {0}")]
    SplitOperation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, NestedCvError>;
