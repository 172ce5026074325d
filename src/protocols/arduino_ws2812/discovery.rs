//! Channel discovery handshake.
//!
//! The controller is asked for its channel count, then for the LED count of
//! every channel in ascending order, waiting for the prompt before each query:
//!
//! ```text
//! Idle -> AwaitingPrompt -> AwaitingChannelCount -> AwaitingLedCount(1..=n) -> Done
//! ```
//!
//! Each transition is driven by one successful read. A read that fails (link
//! closed, transport timeout) aborts discovery; there is no retry.

use log::{debug, trace};

use super::protocol::{led_count_command, validate_channel, ASK_PROMPT_COMMAND, COUNT_COMMAND};
use crate::error::Result;
use crate::transport::Transport;
use crate::types::ChannelDescriptor;

/// Position of a [`ChannelDiscovery`] in the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryState {
    /// Nothing sent yet.
    Idle,
    /// Prompt requested; waiting for the delimiter.
    AwaitingPrompt,
    /// Channel count requested; waiting for the count byte.
    AwaitingChannelCount,
    /// Next step queries this channel's LED count.
    AwaitingLedCount(u8),
    /// All channels queried.
    Done,
}

/// Discovery state machine over a borrowed prompt delimiter.
#[derive(Debug)]
pub struct ChannelDiscovery<'a> {
    prompt: &'a [u8],
    state: DiscoveryState,
    channel_count: u8,
    channels: Vec<ChannelDescriptor>,
}

impl<'a> ChannelDiscovery<'a> {
    /// Creates a discovery in the [`DiscoveryState::Idle`] state.
    pub fn new(prompt: &'a [u8]) -> Self {
        Self {
            prompt,
            state: DiscoveryState::Idle,
            channel_count: 0,
            channels: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    /// Channels reported so far.
    pub fn channels(&self) -> &[ChannelDescriptor] {
        &self.channels
    }

    /// Runs one transition and returns the new state.
    pub fn step<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<DiscoveryState> {
        self.state = match self.state {
            DiscoveryState::Idle => {
                if !transport.is_open() {
                    transport.open()?;
                }
                transport.discard_pending_input()?;
                transport.write(&[ASK_PROMPT_COMMAND])?;
                DiscoveryState::AwaitingPrompt
            }
            DiscoveryState::AwaitingPrompt => {
                transport.read_until(self.prompt)?;
                transport.write(&[COUNT_COMMAND])?;
                DiscoveryState::AwaitingChannelCount
            }
            DiscoveryState::AwaitingChannelCount => {
                let count = transport.read_byte()?;
                debug!("discovery: controller reports {} channel(s)", count);
                // Channels are numbered from 1, so the count itself must be addressable.
                self.channel_count = validate_channel(count)?;
                if count == 0 {
                    DiscoveryState::Done
                } else {
                    DiscoveryState::AwaitingLedCount(1)
                }
            }
            DiscoveryState::AwaitingLedCount(channel) => {
                transport.read_until(self.prompt)?;
                transport.write(&[led_count_command(channel)?])?;
                let led_count = transport.read_byte()?;
                if led_count > 0 {
                    debug!("discovery: channel {} has {} LED(s)", channel, led_count);
                    self.channels
                        .push(ChannelDescriptor::new(channel, led_count));
                } else {
                    trace!("discovery: channel {} is unpopulated", channel);
                }
                if channel >= self.channel_count {
                    DiscoveryState::Done
                } else {
                    DiscoveryState::AwaitingLedCount(channel + 1)
                }
            }
            DiscoveryState::Done => DiscoveryState::Done,
        };
        Ok(self.state)
    }

    /// Runs the handshake to completion.
    pub fn run<T: Transport + ?Sized>(mut self, transport: &mut T) -> Result<Vec<ChannelDescriptor>> {
        while self.step(transport)? != DiscoveryState::Done {}
        Ok(self.channels)
    }
}
