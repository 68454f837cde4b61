//! Error types for the coaching pipeline.
//!
//! Every failure here is session-scoped: a `ValidationError` answers the
//! offending message with an `error` event and leaves the connection open,
//! a `TranscriptionError` abandons one chunk's run, and a `GenerationError`
//! degrades to the deterministic fallback suggestion.

use thiserror::Error;

/// Malformed or unrecognized inbound channel message.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON format")]
    MalformedJson,

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("Invalid audio data: {message}")]
    InvalidAudio { message: String },

    #[error("missing field '{field}' in '{kind}' message")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
}

/// Speech-to-text collaborator failure.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("speech-to-text request failed: {message}")]
    Request { message: String },

    #[error("speech-to-text backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("failed to encode audio chunk: {message}")]
    Encode { message: String },
}

/// Suggestion collaborator failure.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("suggestion request failed: {message}")]
    Request { message: String },

    #[error("suggestion backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("suggestion backend returned an unexpected payload: {message}")]
    Payload { message: String },
}
