//! OpenAI-compatible transcription API backend (whisper-server, Voxtral, etc.)

use super::SpeechToText;
use crate::audio::{self, AudioChunk};
use crate::error::TranscriptionError;
use tracing::debug;

/// Configuration for the remote transcription API.
#[derive(Debug, Clone)]
pub struct RemoteSttConfig {
    /// Full endpoint URL, e.g. `http://localhost:8080/v1/audio/transcriptions`
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Format of the chunk PCM, needed to build the WAV container
    pub sample_rate: u32,
    pub channels: u16,
}

pub struct RemoteSpeechToText {
    config: RemoteSttConfig,
    client: reqwest::Client,
}

impl RemoteSpeechToText {
    pub fn new(config: RemoteSttConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl SpeechToText for RemoteSpeechToText {
    async fn transcribe(&self, chunk: &AudioChunk) -> Result<String, TranscriptionError> {
        let wav = audio::encode_wav(&chunk.pcm, self.config.sample_rate, self.config.channels)
            .map_err(|e| TranscriptionError::Encode {
                message: e.to_string(),
            })?;

        debug!(
            "Uploading chunk {} ({} WAV bytes) to {}",
            chunk.sequence,
            wav.len(),
            self.config.endpoint
        );

        let part = reqwest::multipart::Part::bytes(wav)
            .file_name(format!("chunk-{:04}.wav", chunk.sequence))
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::Request {
                message: e.to_string(),
            })?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.model.clone());

        let mut request = self.client.post(&self.config.endpoint).multipart(form);
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TranscriptionError::Request {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Backend { status, body });
        }

        let json: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| TranscriptionError::Request {
                    message: e.to_string(),
                })?;

        let text = json
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim()
            .to_string();

        Ok(text)
    }

    fn name(&self) -> &str {
        "remote-stt"
    }
}
