//! Completion Layer
//!
//! A small interface over chat-completion backends plus the OpenAI client the
//! relay uses in production.

pub mod core;
pub mod openai;
pub mod persona;

// Re-export commonly used types
pub use core::{
    error::CompletionError,
    provider::CompletionProvider,
    types::{GenerateRequest, Message, MessageRole},
};

pub use openai::{OpenAiClient, OpenAiModel};
