//! Connection and queue configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Default serial baud rate of the controller firmware.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default prompt the controller prints when it is ready for a command.
pub const DEFAULT_PROMPT: &[u8] = b">";

/// Default bound on a single blocking read.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// How the length of a channel's update buffer is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BufferSizing {
    /// `3 × (LEDs in the whole frame) + 1` for every channel.
    ///
    /// This is what existing controllers are driven with. A channel's buffer
    /// is oversized whenever other channels carry LEDs too, and the unwritten
    /// tail (zeros, or the previous frame's bytes on reuse) is still sent.
    #[default]
    FrameTotal,
    /// `3 × (LEDs on this channel) + 1`.
    PerChannel,
}

/// Configuration for an update queue on a serial link.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    /// Serial port name, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port_name: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Upper bound for one blocking read on the link.
    pub read_timeout: Duration,
    /// Byte sequence the controller emits when it is ready for a command.
    pub prompt: Vec<u8>,
    /// Channel buffer sizing rule.
    pub buffer_sizing: BufferSizing,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            prompt: DEFAULT_PROMPT.to_vec(),
            buffer_sizing: BufferSizing::default(),
        }
    }
}

impl SerialConfig {
    /// Creates a configuration for the given port with default settings.
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            ..Default::default()
        }
    }

    /// Sets the baud rate.
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Sets the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the prompt delimiter.
    pub fn prompt(mut self, prompt: impl Into<Vec<u8>>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Sets the channel buffer sizing rule.
    pub fn buffer_sizing(mut self, sizing: BufferSizing) -> Self {
        self.buffer_sizing = sizing;
        self
    }

    /// Checks the configuration for values the link cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.port_name.is_empty() {
            return Err(Error::invalid_config("port name is empty"));
        }
        if self.baud_rate == 0 {
            return Err(Error::invalid_config("baud rate must be non-zero"));
        }
        if self.prompt.is_empty() {
            return Err(Error::invalid_config("prompt delimiter is empty"));
        }
        Ok(())
    }
}
