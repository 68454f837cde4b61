//! Suggestion generation: prompt assembly, bounded collaborator call,
//! deterministic fallback.
//!
//! From the pipeline's point of view `generate` cannot fail: a collaborator
//! error, a timeout, and unparsable output all degrade to the per-label
//! fallback, so a successfully transcribed chunk always gets a suggestion.

use super::history::HistoryEntry;
use super::intent::QuestionLabel;
use super::retriever::ContextSnippets;
use crate::llm::SuggestionBackend;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Generated coaching payload for one transcribed chunk.
#[derive(Debug, Clone)]
pub struct CoachingResult {
    pub bullets: Vec<String>,
    /// Suggested follow-up question; empty for fallback results
    pub follow_up: String,
    /// Echo of the transcript that produced this result
    pub transcript: String,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Upper bound on one collaborator call (default: 8 seconds)
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(8),
        }
    }
}

/// Expected shape of a collaborator completion.
#[derive(Debug, Deserialize)]
struct RawCompletion {
    bullets: Vec<String>,
    #[serde(default)]
    follow_up: String,
}

pub struct SuggestionGenerator {
    backend: Arc<dyn SuggestionBackend>,
    config: GeneratorConfig,
}

impl SuggestionGenerator {
    pub fn new(backend: Arc<dyn SuggestionBackend>, config: GeneratorConfig) -> Self {
        Self { backend, config }
    }

    /// Generate a suggestion for one transcript.
    ///
    /// `history` is the already-windowed slice of recent exchanges the
    /// caller wants in the prompt.
    pub async fn generate(
        &self,
        transcript: &str,
        label: QuestionLabel,
        snippets: &ContextSnippets,
        history: &[HistoryEntry],
    ) -> CoachingResult {
        let prompt = build_prompt(transcript, label, snippets, history);

        match tokio::time::timeout(self.config.timeout, self.backend.complete(&prompt)).await {
            Ok(Ok(raw)) => match parse_completion(&raw) {
                Some((bullets, follow_up)) => CoachingResult {
                    bullets,
                    follow_up,
                    transcript: transcript.to_string(),
                },
                None => {
                    warn!(
                        "{} returned unparsable output, using fallback",
                        self.backend.name()
                    );
                    fallback_result(label, transcript)
                }
            },
            Ok(Err(e)) => {
                warn!("Suggestion generation failed ({}), using fallback", e);
                fallback_result(label, transcript)
            }
            Err(_) => {
                warn!(
                    "Suggestion generation timed out after {:?}, using fallback",
                    self.config.timeout
                );
                fallback_result(label, transcript)
            }
        }
    }
}

fn build_prompt(
    transcript: &str,
    label: QuestionLabel,
    snippets: &ContextSnippets,
    history: &[HistoryEntry],
) -> String {
    let mut prompt = format!(
        "You are an expert interview coach helping a job candidate respond well \
         during a live interview.\n\n\
         Interviewer question: \"{transcript}\"\n\
         Question type: {label}\n\n"
    );

    if !snippets.resume.is_empty() {
        prompt.push_str(&format!(
            "Candidate's relevant background: {}\n",
            snippets.resume.join("; ")
        ));
    }
    if !snippets.job.is_empty() {
        prompt.push_str(&format!("Role context: {}\n", snippets.job.join("; ")));
    }

    if !history.is_empty() {
        prompt.push_str("\nEarlier in this interview:\n");
        for entry in history {
            prompt.push_str(&format!(
                "- Q: {} / advice given: {}\n",
                entry.question,
                entry.bullets.join("; ")
            ));
        }
    }

    prompt.push_str(
        "\nProvide interview coaching advice as JSON only:\n\
         {\n\
         \x20\x20\"bullets\": [\"specific tip 1\", \"specific tip 2\", \"specific tip 3\"],\n\
         \x20\x20\"follow_up\": \"a good follow-up question the candidate can ask\"\n\
         }\n",
    );

    prompt
}

/// Parse a completion into (bullets, follow_up).
///
/// Accepts strict JSON, or JSON wrapped in prose by taking the outermost
/// brace span. Anything else is malformed and the caller falls back.
fn parse_completion(raw: &str) -> Option<(Vec<String>, String)> {
    let parsed: RawCompletion = match serde_json::from_str(raw.trim()) {
        Ok(parsed) => parsed,
        Err(_) => {
            let start = raw.find('{')?;
            let end = raw.rfind('}')?;
            if end <= start {
                return None;
            }
            serde_json::from_str(&raw[start..=end]).ok()?
        }
    };

    if parsed.bullets.is_empty() {
        return None;
    }

    Some((parsed.bullets, parsed.follow_up))
}

/// Deterministic, collaborator-free suggestion for a label.
pub fn fallback_result(label: QuestionLabel, transcript: &str) -> CoachingResult {
    CoachingResult {
        bullets: fallback_bullets(label)
            .iter()
            .map(|bullet| bullet.to_string())
            .collect(),
        follow_up: String::new(),
        transcript: transcript.to_string(),
    }
}

fn fallback_bullets(label: QuestionLabel) -> &'static [&'static str] {
    match label {
        QuestionLabel::Behavioral => &[
            "Use the STAR method: Situation, Task, Action, Result",
            "Choose an example that shows leadership or problem-solving",
            "Quantify your impact with specific numbers or outcomes",
        ],
        QuestionLabel::Technical => &[
            "Break down complex concepts into clear, simple terms",
            "Use specific examples from your experience",
            "Show your thought process and problem-solving approach",
        ],
        QuestionLabel::Experience => &[
            "Highlight your most relevant achievements with specific metrics",
            "Connect your background directly to the job requirements",
            "Show progression and growth in your career",
        ],
        QuestionLabel::Motivation => &[
            "Reference the company's mission and values",
            "Explain how this role aligns with your career goals",
            "Show genuine enthusiasm and specific knowledge about the company",
        ],
        QuestionLabel::Strengths => &[
            "Choose strengths that are directly relevant to the job",
            "Provide concrete examples to support your points",
            "Tie each strength back to what the role needs",
        ],
        QuestionLabel::Weaknesses => &[
            "Be honest, but frame the weakness around growth",
            "Show the concrete steps you are taking to improve",
            "Pick something that does not undermine the core of the role",
        ],
        QuestionLabel::Future => &[
            "Align your goals with the company's direction",
            "Show ambition but stay realistic",
            "Demonstrate long-term thinking",
        ],
        QuestionLabel::Situational => &[
            "Think through the problem systematically",
            "Consider multiple perspectives before committing",
            "Explain your reasoning clearly",
        ],
        QuestionLabel::General => &[
            "Take a moment to organize your thoughts before answering",
            "Provide specific examples whenever possible",
            "Keep your answer focused and concise",
        ],
    }
}
