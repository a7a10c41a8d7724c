/*!
 * Error types for the catalog-maint application.
 *
 * This module contains custom error types for the different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or saving a single JSON document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document does not exist on disk
    #[error("Document not found: {}", path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The document exists but is not valid JSON
    #[error("Failed to parse {}: {message}", path.display())]
    Parse {
        /// Path of the malformed document
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// The document is valid JSON but its root has the wrong type
    #[error("Unexpected document shape in {}: expected {expected}", path.display())]
    Shape {
        /// Path of the document
        path: PathBuf,
        /// Human readable description of the expected root
        expected: &'static str,
    },

    /// The document could not be written back
    #[error("Failed to write {}: {message}", path.display())]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying I/O message
        message: String,
    },
}

impl DocumentError {
    /// Path of the document this error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path }
            | Self::Parse { path, .. }
            | Self::Shape { path, .. }
            | Self::Write { path, .. } => path,
        }
    }

    /// Whether this error only means the document is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors raised while reading catalog records
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// A record lacks one of the required string fields
    #[error("Record #{index} is missing required field '{field}'")]
    MissingField {
        /// Zero-based position of the record in the catalog
        index: usize,
        /// Name of the missing field
        field: &'static str,
    },

    /// A catalog entry is not a JSON object
    #[error("Record #{index} is not a JSON object")]
    NotAnObject {
        /// Zero-based position of the entry
        index: usize,
    },

    /// The catalog root is not a JSON array
    #[error("Catalog root is not a JSON array")]
    NotAnArray,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from loading or saving a document
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from a malformed catalog record
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
