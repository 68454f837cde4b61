//! Speech-to-text collaborator seam.
//!
//! The pipeline only sees the `SpeechToText` trait; the concrete backend
//! (local model, remote API) is substitutable without pipeline changes.

mod remote;

pub use remote::{RemoteSpeechToText, RemoteSttConfig};

use crate::audio::AudioChunk;
use crate::error::TranscriptionError;

/// Speech-to-text collaborator
#[async_trait::async_trait]
pub trait SpeechToText: Send + Sync {
    /// Decode one audio chunk to text. Empty text means no speech detected.
    async fn transcribe(&self, chunk: &AudioChunk) -> Result<String, TranscriptionError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
