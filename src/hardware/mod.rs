//! Pump hardware

pub mod channel;
pub mod error;

pub use channel::{HardwareChannel, PUMP_COMMAND};
pub use error::HardwareError;
