//! Upload surface: validation of a submitted ratings file.
//!
//! Checks run in a fixed order and stop at the first failure; nothing is
//! written unless every check passes.

use data_loader::parser::{missing_columns, read_table};
use data_loader::{REQUIRED_COLUMNS, Table};
use pipeline::IngestReport;
use serde::Serialize;
use thiserror::Error;

/// A file part as received from the client
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: Option<UploadedFile>,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            file: Some(UploadedFile {
                filename: filename.into(),
                contents: contents.into(),
            }),
        }
    }

    /// Run the upload checks and parse the file into a table.
    ///
    /// ## Algorithm
    /// 1. A file part must be present
    /// 2. Its filename must not be empty
    /// 3. Its filename must end in `.csv`
    /// 4. It must parse as CSV
    /// 5. Every required column must be present
    pub fn validate(&self) -> Result<Table, UploadError> {
        let file = self.file.as_ref().ok_or(UploadError::NoFilePart)?;
        if file.filename.is_empty() {
            return Err(UploadError::NoSelectedFile);
        }
        if !file.filename.ends_with(".csv") {
            return Err(UploadError::InvalidFormat);
        }

        let table = read_table(file.contents.as_slice())
            .map_err(|e| UploadError::Unreadable(e.to_string()))?;

        let missing = missing_columns(&table, &REQUIRED_COLUMNS);
        if !missing.is_empty() {
            return Err(UploadError::MissingColumns { columns: missing });
        }
        Ok(table)
    }
}

/// Why an upload was refused
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("Invalid file format")]
    InvalidFormat,

    #[error("Invalid file format: {0}")]
    Unreadable(String),

    #[error("Missing required columns")]
    MissingColumns { columns: Vec<String> },

    /// Encoding or storage failed after validation
    #[error("Failed to store ratings: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl UploadError {
    /// HTTP-style status: 400 for anything the client can fix
    pub fn status_code(&self) -> u16 {
        match self {
            UploadError::Storage(_) => 500,
            _ => 400,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() == 400
    }
}

/// JSON body of a failed upload
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&UploadError> for ErrorBody {
    fn from(err: &UploadError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// JSON body of a successful upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub profile: String,
    pub report: IngestReport,
}
