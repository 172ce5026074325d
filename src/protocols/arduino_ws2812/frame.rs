//! Turns a frame into the command buffers of one flush.
//!
//! A flush consists of one update buffer per channel present in the frame,
//! followed by a single commit byte that makes the controller latch the
//! streamed pixels. Within a channel LEDs are always written in ascending
//! index order; channels themselves go out in ascending order.
//!
//! Channel buffers are kept between flushes and only reallocated when their
//! required length changes.

use std::collections::{BTreeMap, HashMap};

use log::trace;

use super::protocol::{update_buffer_len, update_command, BYTES_PER_LED, HEADER_LEN, UPDATE_COMMAND};
use crate::color::Color;
use crate::config::BufferSizing;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::FrameData;

static COMMIT_COMMAND: [u8; 1] = [UPDATE_COMMAND];

/// Builds per-flush command sequences and owns the reusable channel buffers.
#[derive(Debug, Default)]
pub struct FrameBuilder {
    sizing: BufferSizing,
    buffers: HashMap<u8, Vec<u8>>,
}

impl FrameBuilder {
    /// Creates a builder using the given buffer sizing rule.
    pub fn new(sizing: BufferSizing) -> Self {
        Self {
            sizing,
            buffers: HashMap::new(),
        }
    }

    /// Buffer sizing rule in use.
    pub fn sizing(&self) -> BufferSizing {
        self.sizing
    }

    /// The buffer last written for `channel`, if any.
    pub fn buffer(&self, channel: u8) -> Option<&[u8]> {
        self.buffers.get(&channel).map(Vec::as_slice)
    }

    /// Prepares the command sequence for one flush of `frame`.
    ///
    /// Every channel in the frame is checked up front, so an unaddressable
    /// channel fails here before anything can be sent.
    pub fn commands(&mut self, frame: &FrameData) -> Result<CommandSequence<'_>> {
        let mut grouped: BTreeMap<u8, Vec<(u16, Color)>> = BTreeMap::new();
        for (key, color) in frame {
            grouped
                .entry(key.channel)
                .or_default()
                .push((key.index, *color));
        }

        let mut groups = Vec::with_capacity(grouped.len());
        for (channel, mut leds) in grouped {
            let header = update_command(channel)?;
            leds.sort_unstable_by_key(|&(index, _)| index);
            groups.push(ChannelGroup {
                channel,
                header,
                leds,
            });
        }

        Ok(CommandSequence {
            buffers: &mut self.buffers,
            groups: groups.into_iter(),
            total_leds: frame.len(),
            sizing: self.sizing,
            committed: false,
        })
    }
}

#[derive(Debug)]
struct ChannelGroup {
    channel: u8,
    header: u8,
    leds: Vec<(u16, Color)>,
}

/// The commands of a single flush, produced lazily and consumable once.
///
/// Channel buffers are filled only when their turn comes. The commit command
/// is always the last item and is produced exactly once.
#[derive(Debug)]
pub struct CommandSequence<'a> {
    buffers: &'a mut HashMap<u8, Vec<u8>>,
    groups: std::vec::IntoIter<ChannelGroup>,
    total_leds: usize,
    sizing: BufferSizing,
    committed: bool,
}

impl CommandSequence<'_> {
    /// Produces the next command, or `None` once the commit has been produced.
    pub fn next_command(&mut self) -> Option<&[u8]> {
        if let Some(group) = self.groups.next() {
            return Some(self.fill(group));
        }
        if self.committed {
            return None;
        }
        self.committed = true;
        Some(&COMMIT_COMMAND)
    }

    /// Number of commands still to be produced.
    pub fn remaining(&self) -> usize {
        self.groups.len() + usize::from(!self.committed)
    }

    /// Writes every remaining command to `transport`, in order.
    ///
    /// Stops at the first transport error; the commit is only sent after all
    /// channel buffers went through. Returns the number of commands written.
    pub fn send_all<T: Transport + ?Sized>(mut self, transport: &mut T) -> Result<usize> {
        let mut sent = 0;
        while let Some(command) = self.next_command() {
            transport.write(command)?;
            sent += 1;
        }
        Ok(sent)
    }

    fn fill(&mut self, group: ChannelGroup) -> &[u8] {
        // FrameTotal sizes every channel by the whole frame. Controllers in the
        // field expect this, even though the tail past this channel's LEDs is
        // never rewritten and goes out with whatever it held before.
        let led_count = match self.sizing {
            BufferSizing::FrameTotal => self.total_leds,
            BufferSizing::PerChannel => group.leds.len(),
        };
        let required_len = update_buffer_len(led_count);

        let buffer = self.buffers.entry(group.channel).or_default();
        if buffer.len() != required_len {
            trace!(
                "frame: channel {} buffer resized {} -> {} bytes",
                group.channel,
                buffer.len(),
                required_len
            );
            *buffer = vec![0; required_len];
        }

        buffer[0] = group.header;
        for (slot, (_, color)) in buffer[HEADER_LEN..]
            .chunks_exact_mut(BYTES_PER_LED)
            .zip(&group.leds)
        {
            slot.copy_from_slice(&color.rgb_bytes());
        }
        buffer
    }
}
