use std::time::Duration;
use thiserror::Error;

/// Invalid session configuration. Fatal: returned at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("endpoint URL is empty")]
    EmptyEndpoint,

    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("model name is empty")]
    EmptyModel,

    #[error("transcript cap must be at least 1")]
    ZeroTranscriptCap,

    #[error("unknown language '{0}' (expected 'en' or 'pt-BR')")]
    UnknownLanguage(String),
}

/// A failed exchange with the inference endpoint.
///
/// Never reaches users of `ChatSession`: every variant is turned into the
/// fallback answer plus a connection downgrade.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("endpoint returned status {status}")]
    Status { status: u16 },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("no answer within {0:?}")]
    Timeout(Duration),
}

/// Transcript persistence failure. Logged and otherwise ignored by the session.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("history serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),
}
