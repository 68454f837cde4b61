//! Rule-based question-type classification.
//!
//! A fixed, ordered table of keyword groups; the first group with a hit in
//! the lowercased transcript wins. Deterministic by construction. The label
//! is never surfaced to the client — it only selects the prompt template,
//! the retrieval keyword set, and the fallback bullets.

/// Coarse question-type label for a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionLabel {
    Behavioral,
    Technical,
    Experience,
    Motivation,
    Strengths,
    Weaknesses,
    Future,
    Situational,
    /// No rule matched
    General,
}

impl QuestionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Behavioral => "behavioral",
            Self::Technical => "technical",
            Self::Experience => "experience",
            Self::Motivation => "motivation",
            Self::Strengths => "strengths",
            Self::Weaknesses => "weaknesses",
            Self::Future => "future",
            Self::Situational => "situational",
            Self::General => "general",
        }
    }

    /// Keyword set associated with the label.
    ///
    /// Doubles as the classification trigger group and the retrieval scoring
    /// vocabulary, so classification and retrieval stay in step.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Behavioral => &[
                "tell me about a time",
                "describe a situation",
                "give me an example",
                "walk me through",
                "how did you handle",
                "what would you do if",
                "challenge",
                "conflict",
                "deadline",
            ],
            Self::Technical => &[
                "how does",
                "algorithm",
                "implement",
                "design a system",
                "architecture",
                "code",
                "programming",
                "technical",
                "software",
            ],
            Self::Experience => &[
                "tell me about yourself",
                "your background",
                "your experience",
                "previous role",
                "worked on",
                "experience",
                "developed",
                "managed",
                "built",
            ],
            Self::Motivation => &[
                "why do you want",
                "why are you interested",
                "why should we hire",
                "what motivates you",
                "why this company",
                "mission",
                "values",
                "culture",
            ],
            Self::Strengths => &["strength", "good at", "excel", "skilled"],
            Self::Weaknesses => &["weakness", "improve", "area for improvement", "struggle"],
            Self::Future => &[
                "where do you see yourself",
                "career goals",
                "five years",
                "future plans",
                "goals",
                "growth",
            ],
            Self::Situational => &[
                "what would you do",
                "how would you approach",
                "if you were",
                "imagine you",
                "prioritize",
                "decision",
            ],
            Self::General => &["experience", "skills", "role", "team", "work"],
        }
    }
}

impl std::fmt::Display for QuestionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered rule table; earlier groups win ties.
const RULES: &[QuestionLabel] = &[
    QuestionLabel::Behavioral,
    QuestionLabel::Technical,
    QuestionLabel::Experience,
    QuestionLabel::Motivation,
    QuestionLabel::Strengths,
    QuestionLabel::Weaknesses,
    QuestionLabel::Future,
    QuestionLabel::Situational,
];

/// Classify one transcript. Pure and deterministic.
pub fn classify(text: &str) -> QuestionLabel {
    let lowered = text.to_lowercase();

    for label in RULES {
        if label.keywords().iter().any(|kw| lowered.contains(kw)) {
            return *label;
        }
    }

    QuestionLabel::General
}
