//! Byte transport between the host and the LED controller.
//!
//! The protocol engine only needs a handful of blocking primitives from the
//! link. Buffers handed to [`Transport::write`] are final wire bytes: the
//! transport adds no framing, length prefix or checksum.

use std::collections::VecDeque;

use crate::error::Result;

/// Blocking byte link to the controller.
///
/// Implementations report failures as [`Error`](crate::Error) and never retry
/// internally. Reads should be bounded by a transport-level timeout and fail
/// with [`Error::Timeout`](crate::Error::Timeout) when it expires.
pub trait Transport: Send {
    /// Opens the link. Opening an already open link is a no-op.
    fn open(&mut self) -> Result<()>;

    /// Returns whether the link is open.
    fn is_open(&self) -> bool;

    /// Drops any input received but not yet read.
    fn discard_pending_input(&mut self) -> Result<()>;

    /// Writes `bytes` verbatim, in full.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Reads exactly one byte.
    fn read_byte(&mut self) -> Result<u8>;

    /// Reads until `delimiter` has been seen and returns the number of bytes
    /// discarded, delimiter included.
    ///
    /// Only the last `delimiter.len()` bytes are held while scanning.
    fn read_until(&mut self, delimiter: &[u8]) -> Result<usize> {
        let mut window = VecDeque::with_capacity(delimiter.len());
        let mut consumed = 0;
        while !window.iter().eq(delimiter) {
            if window.len() == delimiter.len() {
                window.pop_front();
            }
            window.push_back(self.read_byte()?);
            consumed += 1;
        }
        Ok(consumed)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn discard_pending_input(&mut self) -> Result<()> {
        (**self).discard_pending_input()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }

    fn read_until(&mut self, delimiter: &[u8]) -> Result<usize> {
        (**self).read_until(delimiter)
    }
}

// =============================================================================
// Serial port transport
// =============================================================================

#[cfg(feature = "serial")]
pub use serial::SerialTransport;

#[cfg(feature = "serial")]
mod serial {
    use super::*;
    use crate::config::SerialConfig;
    use crate::error::Error;
    use log::debug;
    use serialport::{ClearBuffer, SerialPort};
    use std::io::{Read, Write};
    use std::time::Duration;

    /// [`Transport`] over a local serial port.
    ///
    /// The port is opened lazily by [`Transport::open`] using the configured
    /// baud rate; every read is bounded by the configured read timeout.
    pub struct SerialTransport {
        port_name: String,
        baud_rate: u32,
        read_timeout: Duration,
        port: Option<Box<dyn SerialPort>>,
    }

    impl SerialTransport {
        /// Creates a closed transport for the given configuration.
        pub fn new(config: &SerialConfig) -> Self {
            Self {
                port_name: config.port_name.clone(),
                baud_rate: config.baud_rate,
                read_timeout: config.read_timeout,
                port: None,
            }
        }

        /// Returns the port name.
        pub fn port_name(&self) -> &str {
            &self.port_name
        }

        /// Closes the port. It can be reopened with [`Transport::open`].
        pub fn close(&mut self) {
            if self.port.take().is_some() {
                debug!("serial: closed {}", self.port_name);
            }
        }

        fn port(&mut self) -> Result<&mut Box<dyn SerialPort>> {
            self.port.as_mut().ok_or(Error::NotOpen)
        }
    }

    impl Transport for SerialTransport {
        fn open(&mut self) -> Result<()> {
            if self.port.is_some() {
                return Ok(());
            }
            let port = serialport::new(&self.port_name, self.baud_rate)
                .timeout(self.read_timeout)
                .open()?;
            debug!(
                "serial: opened {} at {} baud",
                self.port_name, self.baud_rate
            );
            self.port = Some(port);
            Ok(())
        }

        fn is_open(&self) -> bool {
            self.port.is_some()
        }

        fn discard_pending_input(&mut self) -> Result<()> {
            self.port()?.clear(ClearBuffer::Input)?;
            Ok(())
        }

        fn write(&mut self, bytes: &[u8]) -> Result<()> {
            let port = self.port()?;
            port.write_all(bytes)?;
            port.flush()?;
            Ok(())
        }

        fn read_byte(&mut self) -> Result<u8> {
            let mut byte = [0u8; 1];
            self.port()?.read_exact(&mut byte)?;
            Ok(byte[0])
        }
    }
}
