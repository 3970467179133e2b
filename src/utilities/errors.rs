//! Error types for the companion backend.
//!
//! Configuration errors are fatal at startup. Generation errors surface to
//! the caller. Store errors are always recovered by the chat pipeline
//! (logged, then the turn continues with degraded context).

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The generation API key is not set.
    #[error("GROQ_API_KEY is not configured")]
    MissingApiKey,

    /// A setting is present but cannot be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Errors from the text-generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("generation API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be interpreted.
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),

    /// Every attempt failed with a retryable error.
    #[error("generation failed after {attempts} attempt(s): {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

/// Errors from the memory/profile store or the analytics sink.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the operation.
    #[error("store operation failed: {0}")]
    Backend(String),
}

/// Errors surfaced by a chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The language model could not produce a reply.
    #[error("failed to get response from language model: {0}")]
    Generation(#[from] GenerationError),
}
