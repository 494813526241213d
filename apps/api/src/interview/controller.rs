//! Interview controller: one chat turn in, one updated session out.
//!
//! Dispatch is keyed on (phase, command), checked in this order:
//! await-start, stop, done, budget exhausted, answer. "stop" and "done" win
//! over the budget check so a candidate past the budget can still ask for a
//! rating.

use tracing::{debug, info, warn};

use crate::document::{DocumentChunk, Retriever};
use crate::interview::feedback::{
    answer_feedback, compose_transcript, evaluate, Commentary, EvaluationError, EvaluationKind,
};
use crate::interview::questions::{
    generate_unique_question, QuestionOutcome, MAX_QUESTION_ATTEMPTS, NO_UNIQUE_QUESTION,
};
use crate::interview::session::{ChatResponse, Command, Phase, SessionTurn};
use crate::llm_client::TextGenerator;

pub const INTERVIEW_COMPLETE: &str = "Interview complete.";
pub const EVALUATION_COMPLETE: &str = "Interview evaluation complete.";

/// Echoed before "start" when the client did not send the greeting back.
pub const DEFAULT_GREETING: &str =
    "Hello, welcome to your interview! Let's begin. Reply 'start' to begin.";

#[derive(Debug, Clone, Copy)]
pub struct InterviewSettings {
    /// Questions asked before the interview closes on its own.
    pub question_budget: u32,
    /// Chunks retrieved per turn.
    pub retrieval_k: usize,
    pub max_question_attempts: u32,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            question_budget: 3,
            retrieval_k: 4,
            max_question_attempts: MAX_QUESTION_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Requested,
    BudgetExhausted,
}

/// What the turn did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Still waiting for "start"; greeting echoed.
    AwaitingStart,
    /// First question asked.
    Started,
    /// Answer recorded, next question asked.
    Continued,
    Stopped(StopReason),
    Evaluated,
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub transition: Transition,
    pub response: ChatResponse,
}

/// Runs one turn. Only terminal evaluation faults are returned as errors;
/// question and feedback faults degrade inside the response.
pub async fn run_turn(
    retriever: &dyn Retriever,
    generator: &dyn TextGenerator,
    settings: &InterviewSettings,
    turn: SessionTurn,
) -> Result<TurnOutcome, EvaluationError> {
    let phase = Phase::from_count(turn.question_count, settings.question_budget);
    let command = Command::parse(&turn.current_response);
    debug!("Dispatching turn: phase={phase:?} command={command:?}");

    let outcome = match (phase, command) {
        (Phase::AwaitingStart, Command::Start) => {
            start(retriever, generator, settings, turn).await
        }
        (Phase::AwaitingStart, _) => await_start(turn),
        (_, Command::Stop) => {
            let context = retrieve_context(retriever, &turn.current_question, settings);
            close(generator, &context, turn, StopReason::Requested).await?
        }
        (_, Command::Done) => {
            let context = retrieve_context(retriever, &turn.current_question, settings);
            rate(generator, &context, turn).await?
        }
        (Phase::BudgetExhausted, _) => {
            let context = retrieve_context(retriever, &turn.current_question, settings);
            close(generator, &context, turn, StopReason::BudgetExhausted).await?
        }
        (Phase::Active, _) => {
            let context = retrieve_context(retriever, &turn.current_question, settings);
            advance(generator, &context, settings, turn).await
        }
    };

    info!(
        "Turn finished: {:?}, question_count={}",
        outcome.transition, outcome.response.question_count
    );
    Ok(outcome)
}

/// Retrieved chunk texts joined by blank lines.
fn retrieve_context(retriever: &dyn Retriever, query: &str, settings: &InterviewSettings) -> String {
    let chunks: Vec<&DocumentChunk> = retriever.retrieve(query, settings.retrieval_k);
    debug!(
        "Retrieved chunks {:?} for query {:?}",
        chunks
            .iter()
            .map(|c| (c.page_number, c.chunk_index))
            .collect::<Vec<_>>(),
        query
    );
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn await_start(turn: SessionTurn) -> TurnOutcome {
    let greeting = if turn.current_question.is_empty() {
        DEFAULT_GREETING.to_string()
    } else {
        turn.current_question
    };

    TurnOutcome {
        transition: Transition::AwaitingStart,
        response: ChatResponse {
            question: greeting,
            feedback: String::new(),
            past_questions: turn.past_questions,
            past_responses: turn.past_responses,
            question_count: 0,
        },
    }
}

async fn start(
    retriever: &dyn Retriever,
    generator: &dyn TextGenerator,
    settings: &InterviewSettings,
    turn: SessionTurn,
) -> TurnOutcome {
    let context = retrieve_context(retriever, "", settings);
    let (question, past_questions) =
        next_question(generator, &context, settings, turn.past_questions).await;

    TurnOutcome {
        transition: Transition::Started,
        response: ChatResponse {
            question,
            feedback: String::new(),
            past_questions,
            past_responses: turn.past_responses,
            question_count: 1,
        },
    }
}

async fn advance(
    generator: &dyn TextGenerator,
    context: &str,
    settings: &InterviewSettings,
    turn: SessionTurn,
) -> TurnOutcome {
    let commentary = answer_feedback(generator, context, &turn.current_response).await;
    if let Commentary::Degraded { cause, .. } = &commentary {
        warn!("Feedback degraded to fallback: {cause}");
    }
    let feedback = commentary.into_text();

    let mut past_responses = turn.past_responses;
    past_responses.push(turn.current_response);

    let (question, past_questions) =
        next_question(generator, context, settings, turn.past_questions).await;

    TurnOutcome {
        transition: Transition::Continued,
        response: ChatResponse {
            question,
            feedback,
            past_questions,
            past_responses,
            question_count: turn.question_count.saturating_add(1),
        },
    }
}

async fn close(
    generator: &dyn TextGenerator,
    context: &str,
    turn: SessionTurn,
    reason: StopReason,
) -> Result<TurnOutcome, EvaluationError> {
    let transcript = compose_transcript(&turn.past_questions, &turn.past_responses);
    let feedback = evaluate(generator, EvaluationKind::Summary, context, &transcript).await?;
    Ok(finished(turn, Transition::Stopped(reason), INTERVIEW_COMPLETE, feedback))
}

async fn rate(
    generator: &dyn TextGenerator,
    context: &str,
    turn: SessionTurn,
) -> Result<TurnOutcome, EvaluationError> {
    let transcript = compose_transcript(&turn.past_questions, &turn.past_responses);
    let rating = evaluate(generator, EvaluationKind::Rating, context, &transcript).await?;
    Ok(finished(turn, Transition::Evaluated, EVALUATION_COMPLETE, rating))
}

/// Terminal response: history and counter are returned unchanged.
fn finished(turn: SessionTurn, transition: Transition, question: &str, feedback: String) -> TurnOutcome {
    TurnOutcome {
        transition,
        response: ChatResponse {
            question: question.to_string(),
            feedback,
            past_questions: turn.past_questions,
            past_responses: turn.past_responses,
            question_count: turn.question_count,
        },
    }
}

/// Generates the next question and appends it to the history. On exhaustion
/// the sentinel is shown but the history is left as it was.
async fn next_question(
    generator: &dyn TextGenerator,
    context: &str,
    settings: &InterviewSettings,
    mut past_questions: Vec<String>,
) -> (String, Vec<String>) {
    let outcome =
        generate_unique_question(generator, context, &past_questions, settings.max_question_attempts)
            .await;
    match outcome {
        QuestionOutcome::Fresh(question) => {
            past_questions.push(question.clone());
            (question, past_questions)
        }
        QuestionOutcome::Exhausted { attempts, cause } => {
            match cause {
                Some(e) => warn!("Question generation aborted after {attempts} attempt(s): {e}"),
                None => warn!("All {attempts} question attempts were repeats"),
            }
            (NO_UNIQUE_QUESTION.to_string(), past_questions)
        }
    }
}
