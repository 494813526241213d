//! Session state carried by the client on every chat turn, and the phase and
//! command types the controller dispatches on.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat`. Everything except `response` may be omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub past_questions: Vec<String>,
    pub response: String,
    #[serde(default)]
    pub past_responses: Vec<String>,
    #[serde(default)]
    pub question_count: Option<u32>,
}

/// Body returned by `POST /chat` on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub question: String,
    pub feedback: String,
    pub past_questions: Vec<String>,
    pub past_responses: Vec<String>,
    pub question_count: u32,
}

/// One turn of visible session state, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTurn {
    pub current_question: String,
    pub current_response: String,
    /// `past_questions[0]` is the greeting.
    pub past_questions: Vec<String>,
    pub past_responses: Vec<String>,
    pub question_count: u32,
}

impl ChatRequest {
    /// A missing `question_count` means 0 when the reply is "start", otherwise
    /// one past the number of questions already asked.
    pub fn into_turn(self) -> SessionTurn {
        let question_count = self.question_count.unwrap_or_else(|| {
            if self.response.to_lowercase() == "start" {
                0
            } else {
                self.past_questions.len() as u32 + 1
            }
        });

        SessionTurn {
            current_question: self.question,
            current_response: self.response,
            past_questions: self.past_questions,
            past_responses: self.past_responses,
            question_count,
        }
    }
}

/// Where the interview stands, derived from the turn counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingStart,
    Active,
    BudgetExhausted,
}

impl Phase {
    pub fn from_count(question_count: u32, question_budget: u32) -> Self {
        match question_count {
            0 => Phase::AwaitingStart,
            n if n > question_budget => Phase::BudgetExhausted,
            _ => Phase::Active,
        }
    }
}

/// The candidate's reply, read as a command. Anything unrecognised is an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Done,
    Answer,
}

impl Command {
    pub fn parse(response: &str) -> Self {
        match response.trim().to_lowercase().as_str() {
            "start" => Command::Start,
            "stop" => Command::Stop,
            "done" => Command::Done,
            _ => Command::Answer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> ChatRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn missing_count_defaults_to_zero_for_start() {
        let turn = request(serde_json::json!({"response": "Start"})).into_turn();
        assert_eq!(turn.question_count, 0);
    }

    #[test]
    fn missing_count_defaults_past_questions_plus_one() {
        let turn = request(serde_json::json!({
            "response": "I built a compiler",
            "past_questions": ["Hello", "What did you build?"]
        }))
        .into_turn();
        assert_eq!(turn.question_count, 3);
        assert!(turn.past_responses.is_empty());
        assert!(turn.current_question.is_empty());
    }

    #[test]
    fn explicit_count_is_kept() {
        let turn = request(serde_json::json!({"response": "start", "question_count": 2})).into_turn();
        assert_eq!(turn.question_count, 2);
    }

    #[test]
    fn response_is_required() {
        let result: Result<ChatRequest, _> = serde_json::from_value(serde_json::json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let turn = request(serde_json::json!({"response": "hi", "session_id": "abc"})).into_turn();
        assert_eq!(turn.current_response, "hi");
    }

    #[test]
    fn phase_boundaries() {
        assert_eq!(Phase::from_count(0, 3), Phase::AwaitingStart);
        assert_eq!(Phase::from_count(1, 3), Phase::Active);
        assert_eq!(Phase::from_count(3, 3), Phase::Active);
        assert_eq!(Phase::from_count(4, 3), Phase::BudgetExhausted);
    }

    #[test]
    fn commands_are_trimmed_and_case_insensitive() {
        assert_eq!(Command::parse("  START "), Command::Start);
        assert_eq!(Command::parse("Stop"), Command::Stop);
        assert_eq!(Command::parse("done\n"), Command::Done);
        assert_eq!(Command::parse("exit"), Command::Answer);
        assert_eq!(Command::parse("I am done with Rust"), Command::Answer);
    }
}
