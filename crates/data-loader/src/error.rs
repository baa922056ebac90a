//! Error types for the data-loader crate.
//!
//! Only hard failures live here: missing files, unreadable CSV, absent
//! columns. Malformed individual cells are not errors; they surface as
//! missing values and are dropped later by the encoder.

use thiserror::Error;

/// Errors that can occur while reading, validating or persisting tables
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV layer rejected the input (bad quoting, ragged rows, ...)
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The upload lacks one or more of the required columns
    #[error("Missing required columns")]
    MissingColumns { columns: Vec<String> },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// No table has been stored for this profile yet
    #[error("No ratings uploaded for profile '{0}'")]
    ProfileNotFound(String),

    /// The reference catalog is not present in the data directory
    #[error("Catalog not found at {path}")]
    CatalogNotFound { path: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
