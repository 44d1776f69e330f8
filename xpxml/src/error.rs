//! Error types for XML tree handling.

use std::fmt;

use thiserror::Error;

/// Result type alias for tree, parser and serializer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, parsing or serializing trees.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed XML or illegal node content.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// API misuse that can only be detected at runtime.
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// A child or value addressed by position or name does not exist.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// I/O error while reading an input source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the format error, if this is one.
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            Error::Format(e) => Some(e),
            _ => None,
        }
    }
}

/// A malformed-XML condition.
///
/// Parser errors use the expat error numbering for `code` and carry a
/// 1-based line and column. Content validation errors have code, line and
/// column 0 and embed the byte offset in the message instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    message: String,
    code: u32,
    origin: Option<String>,
    line: u64,
    column: u64,
}

impl FormatError {
    /// Creates a new format error.
    pub fn new(
        message: impl Into<String>,
        code: u32,
        origin: Option<String>,
        line: u64,
        column: u64,
    ) -> Self {
        FormatError {
            message: message.into(),
            code,
            origin,
            line,
            column,
        }
    }

    /// Creates a format error for an illegal character in node content.
    pub fn illegal_content(position: usize, ordinal: u32) -> Self {
        Self::new(
            format!(
                "Content contains illegal character at position {} / chr({})",
                position, ordinal
            ),
            0,
            None,
            0,
            0,
        )
    }

    /// Creates a format error for NaN or infinite numeric content.
    pub fn non_finite_content(value: f64) -> Self {
        Self::new(
            format!("Content is not a finite number: {}", value),
            0,
            None,
            0,
            0,
        )
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the numeric error code.
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Returns the source identifier (file path, `(string)`, `(stream)`).
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Returns the 1-based line, or 0 if unknown.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Returns the 1-based column, or 0 if unknown.
    pub fn column(&self) -> u64 {
        self.column
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if self.line > 0 {
            write!(
                f,
                " at {}:{}:{}",
                self.origin.as_deref().unwrap_or("(unknown)"),
                self.line,
                self.column
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for FormatError {}
