//! Suggestion collaborator seam.
//!
//! Prompt in, completion text out. The generator owns timeout and fallback,
//! so an implementation only reports its own failures.

mod ollama;

pub use ollama::{OllamaClient, OllamaConfig};

use crate::error::GenerationError;

/// Suggestion-generation collaborator
#[async_trait::async_trait]
pub trait SuggestionBackend: Send + Sync {
    /// Run one completion for an assembled coaching prompt.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
