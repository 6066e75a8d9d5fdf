// Wire events exchanged over the relay socket
//
// Every frame is a JSON text message: {"event": "<name>", "data": <payload>}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const ASK_QUESTION: &str = "ask-question";
pub const PUMP_WATER: &str = "pump-water";
pub const USER_QUESTION: &str = "user-question";
pub const GPT_ANSWER: &str = "gpt-answer";

// Client -> server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    AskQuestion(String),
    PumpWater,
}

// Server -> every client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "user-question")]
    UserQuestion(String),
    #[serde(rename = "gpt-answer")]
    GptAnswer(String),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::UserQuestion(_) => USER_QUESTION,
            ServerEvent::GptAnswer(_) => GPT_ANSWER,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Invalid payload for {event}: expected {expected}")]
    InvalidPayload {
        event: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    data: Value,
}

impl ClientEvent {
    /// Parse one text frame from a client.
    ///
    /// A missing or null question counts as the empty string; the text is
    /// otherwise passed through untouched.
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        let raw: RawFrame = serde_json::from_str(frame)?;

        match raw.event.as_str() {
            ASK_QUESTION => match raw.data {
                Value::String(text) => Ok(ClientEvent::AskQuestion(text)),
                Value::Null => Ok(ClientEvent::AskQuestion(String::new())),
                _ => Err(ProtocolError::InvalidPayload {
                    event: ASK_QUESTION,
                    expected: "a string",
                }),
            },
            PUMP_WATER => Ok(ClientEvent::PumpWater),
            _ => Err(ProtocolError::UnknownEvent(raw.event)),
        }
    }
}
