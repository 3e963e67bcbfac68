//! Domain error types for the GrabQA engine.
//!
//! Storage failures are deliberately absent: the store degrades to empty
//! reads and logged, swallowed writes rather than surfacing errors.

use thiserror::Error;

/// Errors from the GitHub remote-service boundary.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The API answered with a non-success status; carries the remote
    /// error message when one was provided.
    #[error("{0}")]
    Api(String),

    #[error("GitHub request failed: {0}")]
    RequestFailed(#[from] anyhow::Error),
}

/// Errors from the clipboard export path, the only exporter with an
/// observable side effect.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("Clipboard write failed: {0}")]
    ClipboardWrite(String),
}
