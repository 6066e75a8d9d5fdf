//! Serial link to the pump microcontroller
//!
//! The link is write-only and best-effort. The firmware reads single command
//! bytes; `w` runs the water pump.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};

use super::error::HardwareError;
use crate::config::SerialConfig;

/// Command byte that makes the firmware dispense water
pub const PUMP_COMMAND: &[u8] = b"w";

const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

type Sink = Box<dyn Write + Send>;

/// Long-lived handle to the pump microcontroller
pub struct HardwareChannel {
    /// Device path or other label, for logs
    label: String,
    sink: Option<Mutex<Sink>>,
    open: AtomicBool,
}

impl HardwareChannel {
    /// Open the serial device described by `config`.
    ///
    /// Failing to open is not an error: the channel is returned permanently
    /// unavailable and the failure is logged.
    pub fn open(config: &SerialConfig) -> Self {
        match serialport::new(&config.path, config.baud_rate)
            .timeout(WRITE_TIMEOUT)
            .open()
        {
            Ok(port) => {
                info!(path = %config.path, baud_rate = config.baud_rate, "serial port opened");
                Self::from_writer(config.path.clone(), port)
            }
            Err(e) => {
                warn!(
                    path = %config.path,
                    error = %e,
                    "failed to open serial port; pump commands will be ignored"
                );
                Self::unavailable(config.path.clone())
            }
        }
    }

    /// An open channel over an arbitrary byte sink
    pub fn from_writer<W>(label: impl Into<String>, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            label: label.into(),
            sink: Some(Mutex::new(Box::new(writer))),
            open: AtomicBool::new(true),
        }
    }

    /// A channel that never had a device behind it
    pub fn unavailable(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sink: None,
            open: AtomicBool::new(false),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// True only if the device was opened and has not gone away since
    pub fn is_available(&self) -> bool {
        self.sink.is_some() && self.open.load(Ordering::Acquire)
    }

    /// Send the pump command once. Never retried.
    pub fn pump(&self) -> Result<(), HardwareError> {
        let sink = match &self.sink {
            Some(sink) if self.open.load(Ordering::Acquire) => sink,
            _ => return Err(HardwareError::Unavailable),
        };

        let mut port = sink.lock().map_err(|_| HardwareError::LockPoisoned)?;
        let result = port.write_all(PUMP_COMMAND).and_then(|_| port.flush());

        if let Err(e) = &result {
            if is_disconnect(e) {
                self.open.store(false, Ordering::Release);
                warn!(label = %self.label, error = %e, "serial device went away; marking channel closed");
            }
        }

        result.map_err(HardwareError::from)
    }
}

fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::PermissionDenied
    )
}
