//! Coaching stages between transcript and suggestion
//!
//! A transcript flows through:
//! - intent classification (rule-based question-type label)
//! - context retrieval (keyword-scored snippets from resume/job text)
//! - suggestion generation (prompt assembly, bounded collaborator call,
//!   deterministic fallback)
//! with a bounded per-session history feeding the generation prompt.

mod generator;
mod history;
mod intent;
mod retriever;

pub use generator::{fallback_result, CoachingResult, GeneratorConfig, SuggestionGenerator};
pub use history::{HistoryEntry, HistoryStore};
pub use intent::{classify, QuestionLabel};
pub use retriever::{retrieve, ContextSnippets};
