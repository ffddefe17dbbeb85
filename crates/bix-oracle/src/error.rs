//! Error types for oracle transports.

use std::path::PathBuf;

use bix_protocol::ProtocolError;

/// Errors that can occur while talking to an oracle.
///
/// None of these are recoverable mid-session: the oracle is stateful and
/// a retry would corrupt the dialog, so every variant aborts the session.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The oracle's reply did not match any expected shape at this point
    /// of the dialog.
    #[error("oracle protocol violation: expected {expected}, got {got}")]
    Protocol {
        /// What the dialog state called for.
        expected: &'static str,
        /// What actually arrived.
        got: String,
    },

    /// A frame failed to encode or decode.
    #[error(transparent)]
    Encoding(#[from] ProtocolError),

    /// The websocket transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    /// The oracle did not reply within the configured timeout.
    #[error("oracle timed out")]
    Timeout,

    /// The oracle closed the channel mid-dialog.
    #[error("connection closed by the oracle")]
    ConnectionClosed,

    /// A question or submission was issued with no instance in play.
    #[error("no active problem instance")]
    NoActiveInstance,

    /// A recorded problem file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A recorded problem file did not parse.
    #[error("problem file {path} is malformed: {source}")]
    MalformedProblemFile {
        /// The offending file.
        path: PathBuf,
        /// The parse failure.
        source: serde_json::Error,
    },
}

impl OracleError {
    /// Shorthand for a dialog-state mismatch.
    pub(crate) fn unexpected(expected: &'static str, got: impl Into<String>) -> Self {
        Self::Protocol {
            expected,
            got: got.into(),
        }
    }
}

/// Convenience alias for oracle results.
pub type OracleResult<T> = Result<T, OracleError>;
