//! Per-session pipeline runner.
//!
//! One spawned task per session, popping completed chunks FIFO and driving
//! transcription → classification → retrieval → generation → history for
//! each. Being the only consumer, it guarantees at most one in-flight run
//! and chunk-ordered events without any further locking.

use super::session::SessionContext;
use crate::audio::AudioChunk;
use crate::coach::{classify, retrieve, HistoryEntry, HistoryStore, SuggestionGenerator};
use crate::protocol::ServerEvent;
use crate::stt::SpeechToText;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Notify};
use tracing::{info, warn};

pub(crate) struct PipelineRunner {
    pub session_id: String,
    pub context: SessionContext,
    pub stt: Arc<dyn SpeechToText>,
    pub generator: SuggestionGenerator,
    pub history: Arc<Mutex<HistoryStore>>,
    pub queue: Arc<Mutex<VecDeque<AudioChunk>>>,
    pub queue_notify: Arc<Notify>,
    pub events: mpsc::UnboundedSender<ServerEvent>,
    pub history_window: usize,
    pub context_snippets: usize,
}

impl PipelineRunner {
    /// Runs until the session is closed (the task is aborted).
    pub(crate) async fn run(self) {
        loop {
            let next = { self.queue.lock().await.pop_front() };

            match next {
                Some(chunk) => self.process_chunk(chunk).await,
                None => self.queue_notify.notified().await,
            }
        }
    }

    async fn process_chunk(&self, chunk: AudioChunk) {
        let sequence = chunk.sequence;

        self.emit(ServerEvent::status("transcribing", "Processing audio..."));

        let text = match self.stt.transcribe(&chunk).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "Session {}: transcription failed for chunk {}: {}",
                    self.session_id, sequence, e
                );
                self.emit(ServerEvent::status(
                    "transcription_failed",
                    format!("Transcription failed: {}", e),
                ));
                return;
            }
        };

        if text.trim().is_empty() {
            self.emit(ServerEvent::status(
                "no_speech",
                "No speech detected in audio",
            ));
            return;
        }

        self.emit(ServerEvent::Transcription {
            text: text.clone(),
            timestamp: Utc::now().to_rfc3339(),
        });

        self.emit(ServerEvent::status(
            "generating",
            "Generating response suggestion...",
        ));

        let label = classify(&text);
        let snippets = retrieve(
            label,
            &self.context.resume_text,
            &self.context.job_text,
            self.context_snippets,
        );
        let recent = { self.history.lock().await.recent(self.history_window) };

        let result = self.generator.generate(&text, label, &snippets, &recent).await;

        {
            let mut history = self.history.lock().await;
            history.append(HistoryEntry {
                question: text.clone(),
                bullets: result.bullets.clone(),
                follow_up: result.follow_up.clone(),
                timestamp: Utc::now(),
            });
        }

        info!(
            "Session {}: chunk {} coached as '{}'",
            self.session_id, sequence, label
        );

        self.emit(ServerEvent::AiResponse {
            bullets: result.bullets,
            follow_up: result.follow_up,
            original_text: result.transcript,
            timestamp: Utc::now().to_rfc3339(),
        });
    }

    fn emit(&self, event: ServerEvent) {
        let _ = self.events.send(event);
    }
}
