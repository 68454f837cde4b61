use super::config::SessionConfig;
use crate::audio::{AudioChunk, AudioIngestBuffer};
use crate::coach::HistoryStore;
use crate::protocol::ServerEvent;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Notify};
use tokio::task::JoinHandle;

/// Lifecycle of one channel-backed session
///
/// `Listening` is re-entered after every completed pipeline run; whether a
/// run is in flight is not externally observable. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, no audio received yet
    Idle,
    /// Audio has been received
    Listening,
    /// Torn down on explicit close or connection loss
    Closed,
}

/// Resume / job-description text supplied before the channel opens.
///
/// Immutable for the session's lifetime; a reconnect starts a new session
/// with a fresh snapshot.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub resume_text: String,
    pub job_text: String,
}

/// The full state associated with one open channel, from connect to close.
///
/// Exclusively owned by the connection handler for its lifetime; nothing in
/// here is shared across sessions. The history and chunk queue are shared
/// only with this session's own runner task.
pub struct Session {
    pub(crate) config: SessionConfig,
    pub(crate) state: SessionState,
    pub(crate) buffer: AudioIngestBuffer,
    pub(crate) queue: Arc<Mutex<VecDeque<AudioChunk>>>,
    pub(crate) queue_notify: Arc<Notify>,
    pub(crate) history: Arc<Mutex<HistoryStore>>,
    pub(crate) events: mpsc::UnboundedSender<ServerEvent>,
    pub(crate) runner: Option<JoinHandle<()>>,
    pub(crate) started_at: DateTime<Utc>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.config.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Send one event down the channel. Silently a no-op once the receiver
    /// is gone (the peer disconnected and close is on its way).
    pub(crate) fn emit(&self, event: ServerEvent) {
        let _ = self.events.send(event);
    }

    pub fn stats(&self) -> SessionStats {
        let duration = Utc::now().signed_duration_since(self.started_at);

        SessionStats {
            session_id: self.config.session_id.clone(),
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            chunks_ingested: self.buffer.chunks_emitted(),
        }
    }
}

/// Point-in-time statistics for one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub chunks_ingested: u64,
}
