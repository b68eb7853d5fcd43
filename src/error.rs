//! Structured error handling for the buffer crate.
//!
//! Errors carry a severity, a category, a machine-readable code, and a
//! message, the same shape the buffer's originating project uses for
//! its own errors rather than a `thiserror`/`anyhow` derive.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Category of the error, per §6/§7's boundary error kinds plus an
/// `Internal` bucket for invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Two edits in one batch touch overlapping ranges.
    OverlappingRanges,
    /// A (line, column) position falls outside the document.
    InvalidRange,
    /// A byte offset exceeds the document's total length.
    InvalidOffset,
    /// An edit operation's own fields are contradictory (e.g. a
    /// negative count) rather than merely out of range.
    MalformedEdit,
    /// A tree invariant didn't hold where it must (metadata drift,
    /// unbalanced black height) — a programmer bug, not user input.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverlappingRanges => write!(f, "OverlappingRanges"),
            Self::InvalidRange => write!(f, "InvalidRange"),
            Self::InvalidOffset => write!(f, "InvalidOffset"),
            Self::MalformedEdit => write!(f, "MalformedEdit"),
            Self::Internal => write!(f, "Internal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferError {
    pub severity: ErrorSeverity,
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
}

impl BufferError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Error,
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn critical(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Critical,
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn overlapping_ranges(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OverlappingRanges, "OVERLAPPING_RANGES", message)
    }

    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRange, "INVALID_RANGE", message)
    }

    pub fn invalid_offset(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOffset, "INVALID_OFFSET", message)
    }

    pub fn malformed_edit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedEdit, "MALFORMED_EDIT", message)
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}({}): {}",
            self.severity, self.kind, self.code, self.message
        )
    }
}

impl std::error::Error for BufferError {}

pub type Result<T> = std::result::Result<T, BufferError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
