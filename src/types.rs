//! Frame and device types shared by the protocol engine.
//!
//! A frame is a sparse mapping of [`LedKey`] to [`Color`]. Keys present in a
//! frame are exactly the LEDs rendered for that flush; nothing is carried over
//! from earlier frames.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::color::Color;

/// Identifies one LED: the controller channel it hangs off and its position
/// on that channel's strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LedKey {
    /// Controller channel. Must be in `0..=15` to be addressable.
    pub channel: u8,
    /// Position on the strip, 0 is closest to the controller.
    pub index: u16,
}

impl LedKey {
    /// Creates a new LED key.
    pub fn new(channel: u8, index: u16) -> Self {
        Self { channel, index }
    }
}

impl fmt::Display for LedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel, self.index)
    }
}

/// One complete LED→color snapshot to render in a single flush.
pub type FrameData = HashMap<LedKey, Color>;

/// A populated channel reported by the controller during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelDescriptor {
    /// Channel number, starting at 1.
    pub channel: u8,
    /// Number of LEDs on the channel, always greater than zero.
    pub led_count: u8,
}

impl ChannelDescriptor {
    /// Creates a new channel descriptor.
    pub fn new(channel: u8, led_count: u8) -> Self {
        Self { channel, led_count }
    }

    /// Keys of every LED on this channel, in strip order.
    pub fn led_keys(&self) -> impl Iterator<Item = LedKey> + '_ {
        (0..self.led_count as u16).map(move |index| LedKey::new(self.channel, index))
    }
}

impl fmt::Display for ChannelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel {} ({} LEDs)", self.channel, self.led_count)
    }
}

/// What an update trigger hands to an update queue when it fires.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateEvent {
    /// The link has just been opened.
    Startup,
    /// Render this frame.
    Frame(FrameData),
}

/// Connection state of an update worker, as seen by the owning thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WorkerState {
    /// The worker is running and accepting frames.
    Running { name: String },
    /// A startup or flush failed; the worker has exited.
    Failed { name: String, error: String },
    /// The worker was stopped.
    Stopped { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_led_key_ordering_is_channel_then_index() {
        let mut keys = vec![LedKey::new(2, 0), LedKey::new(1, 7), LedKey::new(1, 2)];
        keys.sort();
        assert_eq!(
            keys,
            vec![LedKey::new(1, 2), LedKey::new(1, 7), LedKey::new(2, 0)]
        );
    }

    #[test]
    fn test_channel_led_keys() {
        let channel = ChannelDescriptor::new(3, 4);
        let keys: Vec<_> = channel.led_keys().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(keys[0], LedKey::new(3, 0));
        assert_eq!(keys[3], LedKey::new(3, 3));
    }

    #[test]
    fn test_display() {
        assert_eq!(LedKey::new(1, 12).to_string(), "1:12");
        assert_eq!(
            ChannelDescriptor::new(2, 60).to_string(),
            "channel 2 (60 LEDs)"
        );
    }
}
