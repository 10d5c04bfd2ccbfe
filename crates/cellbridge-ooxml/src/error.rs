//! Error types for workbook and package operations

use std::fmt::Display;

use thiserror::Error;

/// Errors that can occur while building, reading, writing or mapping workbooks
#[derive(Error, Debug)]
pub enum CellbridgeError {
    /// Cell reference could not be parsed (e.g. "1A", "A0", "")
    #[error("Malformed cell reference: {0:?}")]
    MalformedReference(String),

    /// A sheet with this name already exists in the workbook
    #[error("Duplicate sheet name: {0}")]
    DuplicateSheetName(String),

    /// Package could not be read or one of its parts is malformed
    #[error("Read error: {0}")]
    Read(String),

    /// A shared-string reference points outside the string table
    #[error("Shared string resolution failed: {0}")]
    Resolution(String),

    /// Package could not be assembled or written
    #[error("Write error: {0}")]
    Write(String),

    /// A field, column or sheet the decoder needs is absent
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// A cell value cannot be converted to the requested type
    #[error("Type mismatch for '{field}': expected {expected}, found {found:?}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// The value shape cannot be mapped onto a workbook
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Settings file could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CellbridgeError {
    pub(crate) fn read(context: impl Display, err: impl Display) -> Self {
        CellbridgeError::Read(format!("{context}: {err}"))
    }

    pub(crate) fn write(context: impl Display, err: impl Display) -> Self {
        CellbridgeError::Write(format!("{context}: {err}"))
    }
}

/// Result type for cellbridge operations
pub type Result<T> = std::result::Result<T, CellbridgeError>;
