use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("File access error for {path}: {message}")]
    FileAccess { path: PathBuf, message: String },

    #[error("Data quality error for station {station}: {message}")]
    DataQuality { station: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Station {station} not found")]
    StationNotFound { station: String },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Report serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
