//! Core abstractions for the completion layer

pub mod error;
pub mod provider;
pub mod types;
