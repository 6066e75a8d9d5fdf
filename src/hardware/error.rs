use thiserror::Error;

/// Errors from the pump serial link
#[derive(Debug, Error)]
pub enum HardwareError {
    /// The device was never opened, or has since gone away
    #[error("Hardware channel is unavailable")]
    Unavailable,

    /// Writing the command failed
    #[error("Serial write failed: {0}")]
    Io(#[from] std::io::Error),

    /// A previous writer panicked while holding the port
    #[error("Serial port lock poisoned")]
    LockPoisoned,
}
