//! OpenAI provider implementation
//!
//! Non-streaming client for the `/chat/completions` endpoint of OpenAI or any
//! compatible server.

pub mod client;
pub mod types;

// Re-export commonly used types
pub use client::{OpenAiClient, OpenAiModel};
