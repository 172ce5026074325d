//! Arduino WS2812 serial controller protocol.
//!
//! The controller firmware drives up to 15 WS2812 strips ("channels") and is
//! spoken to with single-byte commands over a serial link. This module holds
//! the update queue that turns frames into wire commands for it.
//!
//! # Example
//!
//! ```no_run
//! use ws281x_serial::protocols::arduino_ws2812::ArduinoWs2812UpdateQueue;
//! use ws281x_serial::{Color, FrameData, SerialConfig, UpdateQueue};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SerialConfig::new("/dev/ttyUSB0");
//!     let mut queue = ArduinoWs2812UpdateQueue::open_serial(&config)?;
//!
//!     let channels = queue.discover_channels()?;
//!     let mut frame = FrameData::new();
//!     for channel in &channels {
//!         for key in channel.led_keys() {
//!             frame.insert(key, Color::from_hex_string("#FF8000")?);
//!         }
//!     }
//!     queue.on_update(&frame)?;
//!     Ok(())
//! }
//! ```

pub mod discovery;
pub mod frame;
pub mod protocol;

pub use self::discovery::{ChannelDiscovery, DiscoveryState};
pub use self::frame::{CommandSequence, FrameBuilder};

use log::{debug, trace};

use self::protocol::ASK_PROMPT_COMMAND;
use crate::backend::UpdateQueue;
use crate::config::SerialConfig;
use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::types::{ChannelDescriptor, FrameData};

#[cfg(feature = "serial")]
use crate::transport::SerialTransport;

/// Update queue for an Arduino WS2812 controller on any [`Transport`].
///
/// Owns the link and the frame builder. Discovery and flushes borrow the
/// queue mutably, so they can never overlap.
pub struct ArduinoWs2812UpdateQueue<T: Transport> {
    name: String,
    transport: T,
    prompt: Vec<u8>,
    builder: FrameBuilder,
    channels: Option<Vec<ChannelDescriptor>>,
}

impl<T: Transport> ArduinoWs2812UpdateQueue<T> {
    /// Creates a queue over `transport`, taking prompt and buffer sizing from `config`.
    ///
    /// The link is not touched until [`UpdateQueue::on_startup`] or
    /// [`discover_channels`](Self::discover_channels) is called.
    pub fn new(transport: T, config: &SerialConfig) -> Self {
        Self {
            name: format!("Arduino WS2812 ({})", config.port_name),
            transport,
            prompt: config.prompt.clone(),
            builder: FrameBuilder::new(config.buffer_sizing),
            channels: None,
        }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the underlying transport mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the queue and returns the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Channels found by the last successful discovery.
    pub fn channels(&self) -> Option<&[ChannelDescriptor]> {
        self.channels.as_deref()
    }

    /// Runs the channel discovery handshake.
    ///
    /// Opens the link if needed. Blocks until the controller has answered for
    /// every channel or a read fails; a failure leaves earlier results untouched.
    pub fn discover_channels(&mut self) -> Result<Vec<ChannelDescriptor>> {
        let channels = ChannelDiscovery::new(&self.prompt).run(&mut self.transport)?;
        debug!(
            "{}: discovered {} populated channel(s)",
            self.name,
            channels.len()
        );
        self.channels = Some(channels.clone());
        Ok(channels)
    }

    /// Writes a command verbatim.
    pub fn send_command(&mut self, command: &[u8]) -> Result<()> {
        self.transport.write(command)
    }

    /// Streams `frame` to the controller and commits it.
    pub fn update(&mut self, frame: &FrameData) -> Result<()> {
        if !self.transport.is_open() {
            return Err(Error::NotOpen);
        }
        let sent = self.builder.commands(frame)?.send_all(&mut self.transport)?;
        trace!(
            "{}: flushed {} LED(s) in {} command(s)",
            self.name,
            frame.len(),
            sent
        );
        Ok(())
    }

    /// The frame builder, for inspecting channel buffers.
    pub fn builder(&self) -> &FrameBuilder {
        &self.builder
    }
}

#[cfg(feature = "serial")]
impl ArduinoWs2812UpdateQueue<SerialTransport> {
    /// Opens the serial port described by `config` and primes the controller.
    pub fn open_serial(config: &SerialConfig) -> Result<Self> {
        config.validate()?;
        let mut queue = Self::new(SerialTransport::new(config), config);
        queue.on_startup()?;
        Ok(queue)
    }
}

impl<T: Transport + 'static> UpdateQueue for ArduinoWs2812UpdateQueue<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_startup(&mut self) -> Result<()> {
        if !self.transport.is_open() {
            self.transport.open()?;
        }
        // Ask for the initial prompt; the answer is drained by discovery.
        self.send_command(&[ASK_PROMPT_COMMAND])?;
        debug!("{}: link started", self.name);
        Ok(())
    }

    fn on_update(&mut self, frame: &FrameData) -> Result<()> {
        self.update(frame)
    }
}
