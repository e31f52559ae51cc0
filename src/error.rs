use std::error::Error as _;

use thiserror::Error;

/// Failures talking to the catalog server.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Rendered with its whole cause chain; reqwest keeps timeouts and
    /// connect failures in `source()`.
    #[error("request failed: {}", with_causes(.0))]
    Transport(reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        RemoteError::Transport(e)
    }
}

fn with_causes(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(c) = cause {
        let text = c.to_string();
        if !out.ends_with(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        cause = c.source();
    }
    out
}

/// Errors that abort a sweep before any summary is produced.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("authentication with {endpoint} failed: {source}")]
    Authentication {
        endpoint: String,
        #[source]
        source: RemoteError,
    },
    #[error("user `{username}` matched {matches} remote users (expected exactly one)")]
    UserNotFound { username: String, matches: usize },
    #[error("listing users failed: {0}")]
    UserLookup(#[source] RemoteError),
    #[error("querying watched items failed: {0}")]
    RemoteQuery(#[source] RemoteError),
    #[error("item {item_id} has unsupported kind `{kind}`")]
    UnsupportedKind { item_id: String, kind: String },
}

/// Per-item delete failure. Counted and logged, never fatal.
#[derive(Debug, Error)]
pub enum DeletionError {
    #[error("Item marked not to be deleted.")]
    NotDeletable,
    #[error("{0}")]
    Remote(#[from] RemoteError),
}
