//! Ollama completion backend.

use super::SuggestionBackend;
use crate::error::GenerationError;
use serde_json::json;
use tracing::debug;

/// Configuration for a local or remote Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Server base URL, e.g. `http://localhost:11434`
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    /// Completion length cap (`num_predict` in Ollama options)
    pub num_predict: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            temperature: 0.7,
            num_predict: 200,
        }
    }
}

pub struct OllamaClient {
    config: OllamaConfig,
    client: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl SuggestionBackend for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'));

        let payload = json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.num_predict,
            }
        });

        debug!("Requesting completion from {} ({})", url, self.config.model);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GenerationError::Request {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Backend { status, body });
        }

        let json: serde_json::Value =
            response.json().await.map_err(|e| GenerationError::Request {
                message: e.to_string(),
            })?;

        json.get("response")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| GenerationError::Payload {
                message: "missing 'response' field".to_string(),
            })
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
