//! Relay hub and client fan-out

pub mod broadcast;
pub mod server;

pub use broadcast::{Broadcaster, ConnectionId, EventReceiver};
pub use server::{RelayServer, FALLBACK_ANSWER};
