//! Error types for mmv operations.
//!
//! Every hard failure in the core is an [`MmvError`]. Format errors carry the
//! 1-based line number of the offending input so callers can point at it.
//!
//! Soft failures (a backup rename that did not happen, a parent directory
//! that could not be created) are not errors: they come back as
//! [`SaveWarning`](crate::overrides::SaveWarning) values alongside a
//! successful result.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Core error type for mmv operations.
#[derive(Error, Debug)]
pub enum MmvError {
    // === I/O errors ===
    /// A file could not be opened, read, or written.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // === TSRG format errors (E001-E003) ===
    /// E001: Class line is not `<obf> <package/Class>`.
    #[error("E001: malformed class line {line}: {reason}")]
    MalformedClassLine { line: usize, reason: String },

    /// E002: Member line has neither 2 (field) nor 3 (method) tokens.
    #[error("E002: malformed member line {line}: expected 2 or 3 tokens, found {tokens}")]
    MalformedMemberLine { line: usize, tokens: usize },

    /// E003: Member line seen before any class line.
    #[error("E003: member line {line} appears before any class line")]
    MemberOutsideClass { line: usize },

    /// E004: More symbols of one kind than a 32-bit ID can address.
    #[error("E004: too many {kind} symbols (limit {})", u32::MAX)]
    TooManySymbols { kind: &'static str },

    // === CSV format errors (E010-E012) ===
    /// E010: CSV row is missing required tokens, or the header is missing.
    #[error("E010: CSV format error at line {line}: {reason}")]
    CsvFormat { line: usize, reason: String },

    /// E011: Side token is not one of 0, 1, 2.
    #[error("E011: invalid side '{value}' at line {line} (must be 0, 1 or 2)")]
    InvalidSide { line: usize, value: String },

    /// E012: A value cannot be stored in a CSV row and read back unchanged.
    #[error("E012: invalid {field} {value:?}: {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    // === Lookup and configuration errors ===
    /// E020: Symbolic name is unknown to the database and override stores.
    #[error("E020: unknown symbolic name: {0}")]
    NotFound(String),

    /// E030: Configuration error.
    #[error("E030: configuration error: {0}")]
    Config(String),
}

/// Result type for mmv operations.
pub type MmvResult<T> = Result<T, MmvError>;

impl MmvError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MmvError::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the error code (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            MmvError::Io { .. } => "IO",
            MmvError::MalformedClassLine { .. } => "E001",
            MmvError::MalformedMemberLine { .. } => "E002",
            MmvError::MemberOutsideClass { .. } => "E003",
            MmvError::TooManySymbols { .. } => "E004",
            MmvError::CsvFormat { .. } => "E010",
            MmvError::InvalidSide { .. } => "E011",
            MmvError::InvalidValue { .. } => "E012",
            MmvError::NotFound(_) => "E020",
            MmvError::Config(_) => "E030",
        }
    }

    /// Get the input line associated with this error, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            MmvError::MalformedClassLine { line, .. }
            | MmvError::MalformedMemberLine { line, .. }
            | MmvError::MemberOutsideClass { line }
            | MmvError::CsvFormat { line, .. }
            | MmvError::InvalidSide { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// True for errors caused by malformed input text or values.
    pub fn is_format_error(&self) -> bool {
        self.line().is_some() || matches!(self, MmvError::InvalidValue { .. })
    }

    /// Get the exit code for this error type.
    pub fn exit_code(&self) -> u8 {
        match self {
            MmvError::Io { .. } => 2,
            MmvError::MalformedClassLine { .. }
            | MmvError::MalformedMemberLine { .. }
            | MmvError::MemberOutsideClass { .. }
            | MmvError::CsvFormat { .. }
            | MmvError::InvalidSide { .. }
            | MmvError::InvalidValue { .. }
            | MmvError::TooManySymbols { .. } => 1,
            MmvError::NotFound(_) => 3,
            MmvError::Config(_) => 4,
        }
    }
}
