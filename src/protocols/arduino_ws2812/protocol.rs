//! Wire constants and command bytes for the Arduino WS2812 serial firmware.
//!
//! Every command is a single byte. Channel-addressed commands carry the channel
//! number in the upper nibble and the opcode in the lower nibble, so only
//! channels `0..=15` can be addressed.

use crate::error::{Error, Result};

/// Request a channel count (unaddressed) or an LED count (channel-addressed).
pub const COUNT_COMMAND: u8 = 0x01;

/// Channel-addressed: pixel data follows. Unaddressed: latch the streamed data.
pub const UPDATE_COMMAND: u8 = 0x02;

/// Ask the controller to print its prompt.
pub const ASK_PROMPT_COMMAND: u8 = 0x0F;

/// Highest channel number that fits into the command nibble.
pub const MAX_CHANNEL: u8 = 0x0F;

/// Bytes per LED on the wire (R, G, B).
pub const BYTES_PER_LED: usize = 3;

/// Length of the command header in an update buffer.
pub const HEADER_LEN: usize = 1;

/// Checks that a channel number is addressable.
pub fn validate_channel(channel: u8) -> Result<u8> {
    if channel > MAX_CHANNEL {
        return Err(Error::InvalidChannel(channel));
    }
    Ok(channel)
}

/// Packs a channel number and an opcode into one command byte.
pub fn channel_command(channel: u8, opcode: u8) -> Result<u8> {
    let channel = validate_channel(channel)?;
    Ok((channel << 4) | (opcode & 0x0F))
}

/// Command byte requesting the LED count of `channel`.
pub fn led_count_command(channel: u8) -> Result<u8> {
    channel_command(channel, COUNT_COMMAND)
}

/// Header byte of an update buffer for `channel`.
pub fn update_command(channel: u8) -> Result<u8> {
    channel_command(channel, UPDATE_COMMAND)
}

/// Length of an update buffer carrying `led_count` LEDs.
pub fn update_buffer_len(led_count: usize) -> usize {
    BYTES_PER_LED * led_count + HEADER_LEN
}
