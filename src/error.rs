//! Error types for the ws281x-serial crate.

use std::error::Error as StdError;
use std::fmt;
use std::io;

// =============================================================================
// Driver Error
// =============================================================================

/// Error type shared by discovery, flushes and the transport layer.
///
/// Transport failures are passed through unchanged; the driver never retries,
/// reconnects or buffers for later delivery.
#[derive(Debug)]
pub enum Error {
    /// The serial link is not open.
    NotOpen,

    /// A bounded read did not complete in time (no prompt, no count byte).
    Timeout,

    /// The controller disconnected or the link was closed mid-operation.
    Disconnected(String),

    /// Invalid configuration or API misuse.
    InvalidConfig(String),

    /// A channel number does not fit into the upper nibble of a command byte.
    InvalidChannel(u8),

    /// Transport/backend error (wrapped).
    Backend(Box<dyn StdError + Send + Sync>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotOpen => write!(f, "not open: serial link has not been opened"),
            Error::Timeout => write!(f, "timeout: controller did not answer in time"),
            Error::Disconnected(msg) => write!(f, "disconnected: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Error::InvalidChannel(channel) => {
                write!(f, "invalid channel {}: must be in 0..=15", channel)
            }
            Error::Backend(e) => write!(f, "backend error: {}", e),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Backend(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl Error {
    /// Create a disconnected error with a message.
    pub fn disconnected(msg: impl Into<String>) -> Self {
        Error::Disconnected(msg.into())
    }

    /// Create an invalid config error with a message.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// Create a backend error from any error type.
    pub fn backend(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Backend(Box::new(err))
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }

    /// Returns true if this is a Disconnected error.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Error::Disconnected(_))
    }

    /// Returns true if this is a NotOpen error.
    pub fn is_not_open(&self) -> bool {
        matches!(self, Error::NotOpen)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Error::Timeout,
            io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
            | io::ErrorKind::UnexpectedEof => Error::Disconnected(err.to_string()),
            _ => Error::Backend(Box::new(err)),
        }
    }
}

#[cfg(feature = "serial")]
impl From<serialport::Error> for Error {
    fn from(err: serialport::Error) -> Self {
        match err.kind() {
            serialport::ErrorKind::NoDevice => Error::Disconnected(err.description),
            serialport::ErrorKind::InvalidInput => Error::InvalidConfig(err.description),
            serialport::ErrorKind::Io(kind) => io::Error::new(kind, err.description).into(),
            _ => Error::Backend(Box::new(err)),
        }
    }
}

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, Error>;
