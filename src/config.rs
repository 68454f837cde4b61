use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub stt: SttSettings,
    #[serde(default)]
    pub llm: LlmSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Inbound audio format and chunking threshold.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Sample rate of the PCM the client streams (Whisper expects 16kHz)
    pub sample_rate: u32,
    /// Number of channels (1 = mono)
    pub channels: u16,
    /// Accumulated duration before a chunk is cut for transcription
    pub chunk_duration_secs: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            chunk_duration_secs: 3,
        }
    }
}

/// Per-session pipeline tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Chunks waiting behind the in-flight one before the oldest is dropped
    pub queue_depth: usize,
    /// Conversation history entries kept per session (FIFO beyond this)
    pub history_capacity: usize,
    /// Most recent history entries included in a generation prompt
    pub history_window: usize,
    /// Upper bound on one suggestion-generation call
    pub generation_timeout_secs: u64,
    /// Snippets pulled from each context document per question
    pub context_snippets: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            queue_depth: 2,
            history_capacity: 20,
            history_window: 5,
            generation_timeout_secs: 8,
            context_snippets: 3,
        }
    }
}

/// Speech-to-text collaborator endpoint (OpenAI-compatible transcription API).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SttSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for SttSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/v1/audio/transcriptions".to_string(),
            model: "whisper-1".to_string(),
            api_key: None,
        }
    }
}

/// Suggestion collaborator endpoint (Ollama).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub num_predict: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            temperature: 0.7,
            num_predict: 200,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
