// HTTP/WebSocket server modules
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;

// Relay hub
pub mod relay;

// Completion layer
pub mod llm;

// Pump serial link
pub mod hardware;
