//! Error types for the film dashboard.
//!
//! - [`CsvError`] - CSV reading and decoding errors
//! - [`DatasetError`] - Loading the catalogue into a [`crate::dataset::Dataset`]
//! - [`SchemaMismatch`] - A query needs a column the catalogue does not have
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

use crate::models::Column;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode the file contents.
    #[error("Failed to decode content as {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty file.
    #[error("CSV file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CsvError::IoError(io),
            _ => CsvError::ParseError { line, message },
        }
    }
}

// =============================================================================
// Dataset Errors
// =============================================================================

/// Errors while building the in-memory catalogue.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The source could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// None of the expected columns were found in the header.
    #[error("No film columns found (header: {0})")]
    UnrecognizedHeader(String),
}

// =============================================================================
// Query Errors
// =============================================================================

/// A query needs one or more columns the catalogue was loaded without.
///
/// Distinct from an empty result: an empty match set is a valid answer,
/// a schema mismatch means the question cannot be answered at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Schema mismatch, missing column(s): {}", format_columns(.missing))]
pub struct SchemaMismatch {
    pub missing: Vec<Column>,
}

fn format_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.header())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The catalogue could not be loaded at startup.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Query cannot be answered against this catalogue.
    #[error("{0}")]
    Schema(#[from] SchemaMismatch),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Failed to bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for loading operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Result type for queries that depend on specific columns.
pub type QueryResult<T> = Result<T, SchemaMismatch>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let csv_err = CsvError::EmptyFile;
        let dataset_err: DatasetError = csv_err.into();
        assert!(dataset_err.to_string().contains("empty"));

        let server_err: ServerError = dataset_err.into();
        assert!(server_err.to_string().contains("Dataset error"));
    }

    #[test]
    fn test_schema_mismatch_lists_columns() {
        let err = SchemaMismatch {
            missing: vec![Column::Genre, Column::ImdbScore],
        };
        let msg = err.to_string();
        assert!(msg.contains("Genre"));
        assert!(msg.contains("IMDB Score"));
    }

    #[test]
    fn test_parse_error_format() {
        let err = CsvError::ParseError {
            line: 7,
            message: "unequal lengths".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("unequal lengths"));
    }
}
