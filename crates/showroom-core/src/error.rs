//! Error types for Showroom core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Showroom operations.
pub type Result<T> = std::result::Result<T, ShowroomError>;

/// Core error type for Showroom operations.
#[derive(Debug, Error)]
pub enum ShowroomError {
    /// Caller-supplied data insufficient; rejected before any mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unique-constraint violation; nothing was written
    #[error("Duplicate value for {0}")]
    DuplicateKey(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Template page missing at the attempted path
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// Coordinate-map side-car present but malformed
    #[error("Coordinate map error: {0}")]
    CoordinateMap(String),

    /// Drawing or merge failure while producing a document
    #[error("Document render error: {0}")]
    Render(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for ShowroomError {
    fn from(err: rusqlite::Error) -> Self {
        ShowroomError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for ShowroomError {
    fn from(err: std::io::Error) -> Self {
        ShowroomError::Storage(err.to_string())
    }
}

impl From<lopdf::Error> for ShowroomError {
    fn from(err: lopdf::Error) -> Self {
        ShowroomError::Render(err.to_string())
    }
}
