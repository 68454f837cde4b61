pub mod audio;
pub mod coach;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod protocol;
pub mod session;
pub mod stt;

pub use audio::{AudioChunk, AudioIngestBuffer, BufferConfig};
pub use coach::{
    classify, retrieve, CoachingResult, ContextSnippets, HistoryEntry, HistoryStore,
    QuestionLabel, SuggestionGenerator,
};
pub use config::Config;
pub use http::{create_router, AppState};
pub use llm::{OllamaClient, SuggestionBackend};
pub use protocol::{ClientMessage, ServerEvent};
pub use session::{Session, SessionConfig, SessionContext, SessionManager, SessionState};
pub use stt::{RemoteSpeechToText, SpeechToText};
