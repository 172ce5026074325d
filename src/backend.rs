//! The update-queue trait driven by update triggers.
//!
//! An update trigger decides *when* LEDs are refreshed; an [`UpdateQueue`]
//! decides *what* goes over the wire. The trigger calls [`UpdateQueue::on_startup`]
//! once when the link comes up and [`UpdateQueue::on_update`] with the complete
//! current frame every time it fires.

use crate::error::Result;
use crate::types::{FrameData, UpdateEvent};

/// Device-side half of an update trigger.
///
/// # Contract
///
/// - Calls are never concurrent: the caller serializes startup and flushes.
/// - `on_update` either writes the whole frame plus its commit, or fails.
///   Transport errors are returned unchanged and not retried.
pub trait UpdateQueue: Send + 'static {
    /// Human readable name of the device behind this queue.
    fn name(&self) -> &str;

    /// Called once after the link has been opened.
    fn on_startup(&mut self) -> Result<()>;

    /// Renders `frame` on the device.
    fn on_update(&mut self, frame: &FrameData) -> Result<()>;

    /// Dispatches a trigger event to the matching entry point.
    fn handle(&mut self, event: &UpdateEvent) -> Result<()> {
        match event {
            UpdateEvent::Startup => self.on_startup(),
            UpdateEvent::Frame(frame) => self.on_update(frame),
        }
    }
}
