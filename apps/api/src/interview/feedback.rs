//! Commentary generation.
//!
//! Two error policies, chosen by type:
//! - per-answer feedback returns a [`Commentary`]; a generator fault degrades
//!   to a fixed fallback and the interview carries on.
//! - terminal evaluation (rating / closing summary) returns
//!   `Result<String, EvaluationError>`; a fault is reported to the caller.

use thiserror::Error;
use tracing::{debug, warn};

use crate::interview::prompts::{FEEDBACK_PROMPT, RATING_PROMPT, SUMMARY_PROMPT};
use crate::llm_client::{GenerationError, TextGenerator};

pub const FEEDBACK_FALLBACK: &str = "Feedback generation failed.";
pub const EMPTY_RATING_FALLBACK: &str = "Unable to generate rating due to empty response.";
pub const EMPTY_SUMMARY_FALLBACK: &str = "Unable to generate feedback due to empty response.";

/// Answer that suppresses feedback for the turn without ending the interview.
const SKIP_FEEDBACK_ANSWER: &str = "exit";

#[derive(Debug)]
pub enum Commentary {
    Generated(String),
    /// The candidate answered "exit".
    Skipped,
    Degraded {
        fallback: &'static str,
        cause: GenerationError,
    },
}

impl Commentary {
    pub fn into_text(self) -> String {
        match self {
            Commentary::Generated(text) => text,
            Commentary::Skipped => String::new(),
            Commentary::Degraded { fallback, .. } => fallback.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Error during evaluation: {0}")]
    Rating(#[source] GenerationError),

    #[error("Error during final feedback: {0}")]
    Summary(#[source] GenerationError),
}

/// Which closing text to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationKind {
    /// Out-of-10 rating plus summary ("done").
    Rating,
    /// Closing narrative feedback ("stop" or budget used up).
    Summary,
}

impl EvaluationKind {
    fn prompt_template(self) -> &'static str {
        match self {
            EvaluationKind::Rating => RATING_PROMPT,
            EvaluationKind::Summary => SUMMARY_PROMPT,
        }
    }

    fn empty_fallback(self) -> &'static str {
        match self {
            EvaluationKind::Rating => EMPTY_RATING_FALLBACK,
            EvaluationKind::Summary => EMPTY_SUMMARY_FALLBACK,
        }
    }

    fn failed(self, cause: GenerationError) -> EvaluationError {
        match self {
            EvaluationKind::Rating => EvaluationError::Rating(cause),
            EvaluationKind::Summary => EvaluationError::Summary(cause),
        }
    }
}

/// 1–2 sentences on the candidate's answer, grounded in `context`.
pub async fn answer_feedback(
    generator: &dyn TextGenerator,
    context: &str,
    answer: &str,
) -> Commentary {
    if answer.trim().eq_ignore_ascii_case(SKIP_FEEDBACK_ANSWER) {
        return Commentary::Skipped;
    }

    let prompt = FEEDBACK_PROMPT
        .replace("{context}", context)
        .replace("{response}", answer);

    match generator.generate(&prompt).await {
        Ok(text) => Commentary::Generated(text.trim().to_string()),
        Err(cause) => Commentary::Degraded {
            fallback: FEEDBACK_FALLBACK,
            cause,
        },
    }
}

/// Numbered `Q{n}: / A{n}:` lines, pairing questions and responses by index.
/// Unanswered trailing questions are left out.
pub fn compose_transcript(past_questions: &[String], past_responses: &[String]) -> String {
    past_questions
        .iter()
        .zip(past_responses)
        .enumerate()
        .map(|(i, (q, a))| format!("Q{n}: {q}\nA{n}: {a}", n = i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rating or closing feedback over the whole transcript. Blank output is
/// replaced by a fixed notice; generator faults are returned as errors.
pub async fn evaluate(
    generator: &dyn TextGenerator,
    kind: EvaluationKind,
    context: &str,
    transcript: &str,
) -> Result<String, EvaluationError> {
    let prompt = kind
        .prompt_template()
        .replace("{context}", context)
        .replace("{answers_summary}", transcript);
    debug!("{kind:?} prompt is {} chars", prompt.len());

    let text = generator
        .generate(&prompt)
        .await
        .map_err(|e| kind.failed(e))?;

    let text = text.trim();
    if text.is_empty() {
        warn!("{kind:?} generation returned empty text");
        return Ok(kind.empty_fallback().to_string());
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{unavailable, ScriptedGenerator};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn exit_skips_generation() {
        let generator = ScriptedGenerator::replying(["unused"]);
        let commentary = answer_feedback(&generator, "ctx", "EXIT").await;
        assert!(matches!(commentary, Commentary::Skipped));
        assert_eq!(commentary.into_text(), "");
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn feedback_is_grounded_in_answer_and_context() {
        let generator = ScriptedGenerator::replying(["Good depth on ownership. "]);
        let commentary = answer_feedback(&generator, "Rust at Acme", "I used lifetimes").await;
        assert_eq!(commentary.into_text(), "Good depth on ownership.");

        let prompt = &generator.prompts()[0];
        assert!(prompt.contains("Rust at Acme"));
        assert!(prompt.contains("I used lifetimes"));
    }

    #[tokio::test]
    async fn feedback_fault_degrades_to_fallback() {
        let generator = ScriptedGenerator::new([unavailable()]);
        let commentary = answer_feedback(&generator, "ctx", "An answer").await;
        assert!(matches!(commentary, Commentary::Degraded { .. }));
        assert_eq!(commentary.into_text(), FEEDBACK_FALLBACK);
    }

    #[test]
    fn transcript_pairs_by_index() {
        let transcript = compose_transcript(
            &strings(&["Hello", "Why Rust?", "Unanswered"]),
            &strings(&["start", "Safety"]),
        );
        assert_eq!(transcript, "Q1: Hello\nA1: start\nQ2: Why Rust?\nA2: Safety");
    }

    #[test]
    fn transcript_of_nothing_is_empty() {
        assert_eq!(compose_transcript(&[], &[]), "");
    }

    #[tokio::test]
    async fn rating_uses_rating_prompt() {
        let generator = ScriptedGenerator::replying(["Rating: 7/10. Solid answers."]);
        let text = evaluate(&generator, EvaluationKind::Rating, "ctx", "Q1: a\nA1: b")
            .await
            .unwrap();
        assert_eq!(text, "Rating: 7/10. Solid answers.");
        assert!(generator.prompts()[0].contains("Rating (out of 10):"));
        assert!(generator.prompts()[0].contains("Q1: a\nA1: b"));
    }

    #[tokio::test]
    async fn blank_evaluation_gets_kind_specific_notice() {
        let generator = ScriptedGenerator::replying(["  ", "\n"]);
        let rating = evaluate(&generator, EvaluationKind::Rating, "", "").await.unwrap();
        let summary = evaluate(&generator, EvaluationKind::Summary, "", "").await.unwrap();
        assert_eq!(rating, EMPTY_RATING_FALLBACK);
        assert_eq!(summary, EMPTY_SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn evaluation_fault_is_an_error() {
        let generator = ScriptedGenerator::new([unavailable()]);
        let err = evaluate(&generator, EvaluationKind::Summary, "", "")
            .await
            .unwrap_err();
        assert!(matches!(err, EvaluationError::Summary(_)));
        assert!(err.to_string().starts_with("Error during final feedback"));
    }
}
