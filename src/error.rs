//! Error definitions shared by every generation stage.

use thiserror::Error;

use crate::log::{Log, LogLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Failure classification carried by every [`GenError`].
pub enum ErrorKind {
    /// Invalid input to the generator; reported to the operator verbatim.
    User,
    /// Broken generator invariant; reported as a defect.
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Error carried by a failed [`crate::Outcome`].
pub enum GenError {
    /// Malformed description, unparsable snippet, unsupported schema shape.
    #[error("user error: {0}")]
    User(String),
    /// An instruction reached a handler that could not honor its contract.
    #[error("internal error: {0} (this is a bug in apigen, please report it)")]
    Internal(String),
}

impl GenError {
    pub fn user(message: impl Into<String>) -> Self {
        GenError::User(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        GenError::Internal(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GenError::User(_) => ErrorKind::User,
            GenError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            GenError::User(message) | GenError::Internal(message) => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {pos}")]
/// Failure reported by the syntax parser before it is lifted into a [`GenError`].
pub struct ParseError {
    pub message: String,
    /// Byte offset into the parsed text.
    pub pos: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, pos: usize) -> Self {
        Self {
            message: message.into(),
            pos,
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("generation failed: {error}")]
/// Failure surfaced at the process boundary by [`crate::Outcome::unsafe_run`].
pub struct BoundaryError {
    pub error: GenError,
    /// Everything logged up to the failing step.
    pub log: Log,
}

impl BoundaryError {
    /// Renders the error followed by the diagnostics trace at `min_level` and above.
    pub fn report(&self, min_level: LogLevel) -> String {
        let trace = self.log.render(min_level);
        if trace.is_empty() {
            self.to_string()
        } else {
            format!("{self}\n{trace}")
        }
    }
}
