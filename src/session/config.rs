use std::time::Duration;

/// Per-session pipeline configuration.
///
/// All figures here are operationally tunable; the service-level config file
/// feeds them through `from_app_config`.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier
    pub session_id: String,

    /// Sample rate of the inbound PCM (Whisper expects 16kHz)
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono)
    pub channels: u16,

    /// Accumulated duration that completes a chunk
    pub chunk_duration: Duration,

    /// Chunks allowed to wait behind the in-flight one
    pub queue_depth: usize,

    /// History entries kept before FIFO eviction
    pub history_capacity: usize,

    /// Recent history entries included in a generation prompt
    pub history_window: usize,

    /// Upper bound on one suggestion-generation call
    pub generation_timeout: Duration,

    /// Snippets retrieved from each context document
    pub context_snippets: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            sample_rate: 16000,
            channels: 1,
            chunk_duration: Duration::from_secs(3),
            queue_depth: 2,
            history_capacity: 20,
            history_window: 5,
            generation_timeout: Duration::from_secs(8),
            context_snippets: 3,
        }
    }
}

impl SessionConfig {
    /// Session defaults from the service configuration.
    pub fn from_app_config(cfg: &crate::config::Config) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            sample_rate: cfg.audio.sample_rate,
            channels: cfg.audio.channels,
            chunk_duration: Duration::from_secs(cfg.audio.chunk_duration_secs),
            queue_depth: cfg.pipeline.queue_depth,
            history_capacity: cfg.pipeline.history_capacity,
            history_window: cfg.pipeline.history_window,
            generation_timeout: Duration::from_secs(cfg.pipeline.generation_timeout_secs),
            context_snippets: cfg.pipeline.context_snippets,
        }
    }

    /// Same tuning, fresh identity — one per opened session.
    pub(crate) fn with_fresh_id(&self) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            ..self.clone()
        }
    }
}
