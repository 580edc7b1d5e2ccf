//! Error handling for PlotKit
//!
//! Provides the error taxonomy shared by every layer of the codec:
//! - Protocol errors (unknown dialect, bad DMPL mode, malformed or missing templates)
//! - Preview errors (background parse jobs)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Protocol error type
///
/// Structural or configuration problems detected while encoding. These are
/// always surfaced to the caller; geometry quirks such as empty polygons
/// never produce one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Dialect name not known to the dispatcher or the origin/feed helpers
    #[error("Unsupported protocol: {name}")]
    UnsupportedProtocol {
        /// The dialect name that was requested.
        name: String,
    },

    /// DMPL mode outside of {1, 2, 3, 4, 6}
    #[error("Invalid mode {mode} for DMPL (expected 1, 2, 3, 4 or 6)")]
    InvalidMode {
        /// The rejected mode number.
        mode: u8,
    },

    /// Command template without `{` / `}` coordinate placeholders
    #[error("Malformed command template: {template:?} has no coordinate placeholders")]
    MalformedTemplate {
        /// The offending template text.
        template: String,
    },

    /// Only one of the two move templates is set
    #[error("Incomplete custom dialect: {missing} template is missing")]
    IncompleteTemplates {
        /// Name of the absent template.
        missing: String,
    },
}

/// Preview error type
///
/// Failures of the cut-preview pipeline itself. Parsing a command stream
/// never fails; only the worker that runs it can.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    /// The background parse job panicked or was cancelled
    #[error("Preview worker failed: {reason}")]
    WorkerFailed {
        /// Why the worker did not produce a result.
        reason: String,
    },
}

/// Main error type for PlotKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Protocol error
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Preview error
    #[error(transparent)]
    Preview(#[from] PreviewError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a protocol error
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Error::Protocol(_))
    }

    /// Check if this is a preview error
    pub fn is_preview_error(&self) -> bool {
        matches!(self, Error::Preview(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
