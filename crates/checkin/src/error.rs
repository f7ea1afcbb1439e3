//! Error types for the check-in tools

use thiserror::Error;

/// Result type for check-in operations
pub type Result<T> = std::result::Result<T, CheckinError>;

#[derive(Error, Debug)]
pub enum CheckinError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid lint configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
