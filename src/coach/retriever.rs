//! Context retrieval over resume / job-description text.
//!
//! Pure keyword-overlap scoring: fragments are sentence/line splits of each
//! source document, scored by how many distinct label keywords they contain.
//! Top-N per source; ties go to the earlier fragment.

use super::intent::QuestionLabel;

/// Snippets retrieved for one question, grouped by source document.
#[derive(Debug, Clone, Default)]
pub struct ContextSnippets {
    pub resume: Vec<String>,
    pub job: Vec<String>,
}

impl ContextSnippets {
    pub fn is_empty(&self) -> bool {
        self.resume.is_empty() && self.job.is_empty()
    }
}

/// Fragments shorter than this carry no retrievable signal.
const MIN_FRAGMENT_CHARS: usize = 12;

/// Retrieve the top-scoring fragments from both context documents.
pub fn retrieve(
    label: QuestionLabel,
    resume_text: &str,
    job_text: &str,
    max_snippets: usize,
) -> ContextSnippets {
    ContextSnippets {
        resume: top_fragments(label, resume_text, max_snippets),
        job: top_fragments(label, job_text, max_snippets),
    }
}

fn split_fragments(text: &str) -> Vec<&str> {
    text.split(['\n', '.', '!', '?'])
        .map(str::trim)
        .filter(|fragment| fragment.len() >= MIN_FRAGMENT_CHARS)
        .collect()
}

fn score(label: QuestionLabel, fragment: &str) -> usize {
    let lowered = fragment.to_lowercase();
    label
        .keywords()
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .count()
}

fn top_fragments(label: QuestionLabel, text: &str, max_snippets: usize) -> Vec<String> {
    let mut scored: Vec<(usize, usize, &str)> = split_fragments(text)
        .into_iter()
        .enumerate()
        .map(|(index, fragment)| (score(label, fragment), index, fragment))
        .filter(|(score, _, _)| *score > 0)
        .collect();

    // Stable sort keeps earlier fragments ahead on equal scores.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(max_snippets);
    // Present selected fragments in document order.
    scored.sort_by_key(|(_, index, _)| *index);

    scored
        .into_iter()
        .map(|(_, _, fragment)| fragment.to_string())
        .collect()
}
