//! JSON envelopes for the bidirectional coaching channel.
//!
//! Every frame is `{"type": ..., "data": {...}}` in both directions.
//! Inbound frames go through a closed dispatch table: an unmatched tag is a
//! `ValidationError`, answered with an `error` event while the connection
//! stays open.

use crate::error::ValidationError;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw inbound envelope, before dispatch on the declared type.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Parsed client message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Decoded audio fragment bytes
    Audio(Vec<u8>),
    /// Liveness probe, no pipeline effect
    Ping,
    /// Empty the session's conversation history
    ClearHistory,
    /// Stop recording: flush the ingest buffer
    Stop,
}

impl ClientMessage {
    /// Parse one text frame off the channel.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let envelope: Envelope =
            serde_json::from_str(raw).map_err(|_| ValidationError::MalformedJson)?;

        match envelope.kind.as_str() {
            "audio" => {
                let encoded = envelope
                    .data
                    .get("audio")
                    .and_then(Value::as_str)
                    .ok_or(ValidationError::MissingField {
                        kind: "audio",
                        field: "audio",
                    })?;

                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|e| ValidationError::InvalidAudio {
                        message: e.to_string(),
                    })?;

                Ok(Self::Audio(bytes))
            }
            "ping" => Ok(Self::Ping),
            "clear_history" => Ok(Self::ClearHistory),
            "stop" => Ok(Self::Stop),
            other => Err(ValidationError::UnknownType(other.to_string())),
        }
    }
}

/// Outbound event
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Session lifecycle or warning
    Status { status: String, message: String },
    /// Decoded text for a completed chunk
    Transcription { text: String, timestamp: String },
    /// Coaching result for a completed chunk
    AiResponse {
        bullets: Vec<String>,
        follow_up: String,
        original_text: String,
        timestamp: String,
    },
    /// Malformed input or stage failure; the connection stays open
    Error { message: String },
    /// Reply to a client ping
    Pong { timestamp: String },
}

impl ServerEvent {
    pub fn status(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Status {
            status: status.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn pong_now() -> Self {
        Self::Pong {
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
