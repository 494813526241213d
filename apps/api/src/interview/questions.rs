//! Question generation with a bounded uniqueness retry.

use tracing::{debug, warn};

use crate::interview::prompts::QUESTION_PROMPT;
use crate::llm_client::{GenerationError, TextGenerator};

/// Attempts per turn before giving up on a fresh question.
pub const MAX_QUESTION_ATTEMPTS: u32 = 5;

/// Shown to the candidate when no fresh question could be produced.
/// Never recorded in `past_questions`.
pub const NO_UNIQUE_QUESTION: &str = "No new unique question found.";

#[derive(Debug)]
pub enum QuestionOutcome {
    /// A trimmed, non-empty question not asked before.
    Fresh(String),
    /// Every attempt was a repeat, or the generator failed (`cause`).
    Exhausted {
        attempts: u32,
        cause: Option<GenerationError>,
    },
}

/// Asks the generator for a question until one is not already in
/// `past_questions` (exact match). A generator failure ends the loop at once.
pub async fn generate_unique_question(
    generator: &dyn TextGenerator,
    context: &str,
    past_questions: &[String],
    max_attempts: u32,
) -> QuestionOutcome {
    let prompt = build_question_prompt(context, past_questions);

    for attempt in 1..=max_attempts {
        let candidate = match generator.generate(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("Question generation failed on attempt {attempt}: {e}");
                return QuestionOutcome::Exhausted {
                    attempts: attempt,
                    cause: Some(e),
                };
            }
        };

        if candidate.is_empty() {
            debug!("Attempt {attempt}/{max_attempts}: empty question, retrying");
            continue;
        }
        if past_questions.contains(&candidate) {
            debug!("Attempt {attempt}/{max_attempts}: duplicate question, retrying");
            continue;
        }
        return QuestionOutcome::Fresh(candidate);
    }

    warn!("No unique question after {max_attempts} attempts");
    QuestionOutcome::Exhausted {
        attempts: max_attempts,
        cause: None,
    }
}

fn build_question_prompt(context: &str, past_questions: &[String]) -> String {
    let asked = if past_questions.is_empty() {
        "(none)".to_string()
    } else {
        past_questions
            .iter()
            .map(|q| format!("- {q}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    QUESTION_PROMPT
        .replace("{context}", context)
        .replace("{past_questions}", &asked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{unavailable, ScriptedGenerator};

    fn asked(questions: &[&str]) -> Vec<String> {
        questions.iter().map(|q| q.to_string()).collect()
    }

    fn shown(outcome: &QuestionOutcome) -> &str {
        match outcome {
            QuestionOutcome::Fresh(q) => q,
            QuestionOutcome::Exhausted { .. } => NO_UNIQUE_QUESTION,
        }
    }

    #[tokio::test]
    async fn first_fresh_question_is_accepted_and_trimmed() {
        let generator = ScriptedGenerator::replying(["  What drew you to Rust?\n"]);
        let outcome = generate_unique_question(&generator, "ctx", &asked(&["Hello"]), 5).await;
        assert!(matches!(outcome, QuestionOutcome::Fresh(ref q) if q == "What drew you to Rust?"));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn duplicates_are_retried() {
        let generator = ScriptedGenerator::replying(["Q1", "Q1 ", "Q2"]);
        let outcome = generate_unique_question(&generator, "ctx", &asked(&["Hello", "Q1"]), 5).await;
        assert_eq!(shown(&outcome), "Q2");
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn duplicate_check_is_case_sensitive() {
        let generator = ScriptedGenerator::replying(["q1"]);
        let outcome = generate_unique_question(&generator, "ctx", &asked(&["Q1"]), 5).await;
        assert_eq!(shown(&outcome), "q1");
    }

    #[tokio::test]
    async fn five_duplicates_exhaust_the_loop() {
        let generator = ScriptedGenerator::replying(["Q1"; 6]);
        let outcome = generate_unique_question(&generator, "ctx", &asked(&["Q1"]), 5).await;
        assert!(matches!(
            outcome,
            QuestionOutcome::Exhausted {
                attempts: 5,
                cause: None
            }
        ));
        assert_eq!(shown(&outcome), NO_UNIQUE_QUESTION);
        assert_eq!(generator.calls(), 5);
    }

    #[tokio::test]
    async fn generator_failure_stops_immediately() {
        let generator = ScriptedGenerator::new([unavailable(), Ok("Q9".to_string())]);
        let outcome = generate_unique_question(&generator, "ctx", &[], 5).await;
        assert!(matches!(
            outcome,
            QuestionOutcome::Exhausted {
                attempts: 1,
                cause: Some(_)
            }
        ));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn empty_replies_count_as_attempts() {
        let generator = ScriptedGenerator::replying(["   ", "Q2"]);
        let outcome = generate_unique_question(&generator, "ctx", &[], 5).await;
        assert_eq!(shown(&outcome), "Q2");
    }

    #[test]
    fn prompt_lists_asked_questions() {
        let prompt = build_question_prompt("Built a compiler", &asked(&["Hello", "Why Rust?"]));
        assert!(prompt.contains("Built a compiler"));
        assert!(prompt.contains("- Why Rust?"));
        assert!(build_question_prompt("", &[]).contains("(none)"));
    }
}
