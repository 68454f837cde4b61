use super::config::SessionConfig;
use super::pipeline::PipelineRunner;
use super::session::{Session, SessionContext, SessionState};
use crate::audio::{AudioChunk, AudioIngestBuffer, BufferConfig};
use crate::coach::{GeneratorConfig, HistoryStore, SuggestionGenerator};
use crate::error::ValidationError;
use crate::llm::SuggestionBackend;
use crate::protocol::{ClientMessage, ServerEvent};
use crate::stt::SpeechToText;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Notify};
use tracing::{info, warn};

/// Owns session lifecycle and maps channel messages to pipeline calls.
///
/// The collaborator clients are shared across all sessions (each request is
/// independent); everything else a session touches is created per open and
/// torn down on close.
pub struct SessionManager {
    stt: Arc<dyn SpeechToText>,
    llm: Arc<dyn SuggestionBackend>,
    defaults: SessionConfig,
}

impl SessionManager {
    pub fn new(
        stt: Arc<dyn SpeechToText>,
        llm: Arc<dyn SuggestionBackend>,
        defaults: SessionConfig,
    ) -> Self {
        Self {
            stt,
            llm,
            defaults,
        }
    }

    /// Create a session bound to an outbound event channel and start its
    /// pipeline runner.
    pub fn open(
        &self,
        context: SessionContext,
        events: mpsc::UnboundedSender<ServerEvent>,
    ) -> Session {
        let config = self.defaults.with_fresh_id();

        info!("Session {}: opened", config.session_id);

        let queue = Arc::new(Mutex::new(VecDeque::new()));
        let queue_notify = Arc::new(Notify::new());
        let history = Arc::new(Mutex::new(HistoryStore::new(config.history_capacity)));

        let generator = SuggestionGenerator::new(
            Arc::clone(&self.llm),
            GeneratorConfig {
                timeout: config.generation_timeout,
            },
        );

        let runner = PipelineRunner {
            session_id: config.session_id.clone(),
            context,
            stt: Arc::clone(&self.stt),
            generator,
            history: Arc::clone(&history),
            queue: Arc::clone(&queue),
            queue_notify: Arc::clone(&queue_notify),
            events: events.clone(),
            history_window: config.history_window,
            context_snippets: config.context_snippets,
        };
        let handle = tokio::spawn(runner.run());

        let buffer = AudioIngestBuffer::new(BufferConfig {
            sample_rate: config.sample_rate,
            channels: config.channels,
            chunk_duration: config.chunk_duration,
        });

        let session = Session {
            config,
            state: SessionState::Idle,
            buffer,
            queue,
            queue_notify,
            history,
            events,
            runner: Some(handle),
            started_at: Utc::now(),
        };

        session.emit(ServerEvent::status(
            "connected",
            format!("Connected to interview coach (session {})", session.id()),
        ));

        session
    }

    /// Feed raw audio bytes into the session's ingest buffer; enqueue a
    /// pipeline run when a chunk completes. Never blocks on the pipeline.
    pub async fn on_audio_fragment(&self, session: &mut Session, bytes: &[u8]) {
        if session.state == SessionState::Closed {
            return;
        }
        if session.state == SessionState::Idle {
            session.state = SessionState::Listening;
        }

        if let Some(chunk) = session.buffer.push(bytes) {
            self.enqueue(session, chunk).await;
        }
    }

    /// Dispatch one parsed control message.
    pub async fn on_control(&self, session: &mut Session, message: ClientMessage) {
        if session.state == SessionState::Closed {
            return;
        }

        match message {
            ClientMessage::Audio(bytes) => self.on_audio_fragment(session, &bytes).await,
            ClientMessage::Ping => session.emit(ServerEvent::pong_now()),
            ClientMessage::ClearHistory => {
                session.history.lock().await.clear();
                session.emit(ServerEvent::status(
                    "history_cleared",
                    "Conversation history cleared",
                ));
            }
            ClientMessage::Stop => {
                if let Some(chunk) = session.buffer.flush() {
                    self.enqueue(session, chunk).await;
                }
            }
        }
    }

    /// Answer an unparsable or unrecognized message with an error event.
    /// The connection stays open.
    pub fn on_invalid_message(&self, session: &Session, error: ValidationError) {
        session.emit(ServerEvent::error(error.to_string()));
    }

    /// Tear the session down: cancel in-flight collaborator work, discard
    /// queued chunks, mark the session terminal.
    pub async fn close(&self, session: &mut Session) {
        if session.state == SessionState::Closed {
            return;
        }
        session.state = SessionState::Closed;

        // Aborting the runner drops any in-flight transcription/generation
        // future mid-call.
        if let Some(runner) = session.runner.take() {
            runner.abort();
        }

        session.queue.lock().await.clear();

        let stats = session.stats();
        info!(
            "Session {}: closed after {:.1}s ({} chunks ingested)",
            session.id(),
            stats.duration_secs,
            stats.chunks_ingested
        );
    }

    /// Queue a completed chunk behind the in-flight run. At capacity the
    /// oldest *waiting* chunk is dropped — never the one being processed.
    async fn enqueue(&self, session: &Session, chunk: AudioChunk) {
        {
            let mut queue = session.queue.lock().await;

            if queue.len() >= session.config.queue_depth {
                if let Some(dropped) = queue.pop_front() {
                    warn!(
                        "Session {}: backlog full, dropping pending chunk {}",
                        session.id(),
                        dropped.sequence
                    );
                    session.emit(ServerEvent::status(
                        "queue_overflow",
                        format!(
                            "Processing backlog full, dropped pending audio chunk {}",
                            dropped.sequence
                        ),
                    ));
                }
            }

            queue.push_back(chunk);
        }

        session.queue_notify.notify_one();
    }
}
