//! Host-side driver for WS281x LED chains behind a serial microcontroller.
//!
//! The controller exposes a minimal byte-oriented command protocol. This crate
//! discovers how many channels and LEDs the controller drives, and turns a
//! sparse LED→color frame into the framed command buffers that render it.
//!
//! # Supported controllers
//!
//! - **Arduino WS2812** - Arduino-class board running the RGB.NET WS2812 USB
//!   sketch, up to 15 channels ([`protocols::arduino_ws2812`])
//!
//! # Features
//!
//! - `serial` (default): [`SerialTransport`] backed by the `serialport` crate
//! - `serde`: `Serialize`/`Deserialize` for colors, keys, descriptors and config
//!
//! # Frames
//!
//! A frame is a [`FrameData`] map from [`LedKey`] (channel, index) to [`Color`].
//! Every flush sends the complete frame; LEDs missing from a frame are not
//! written. Colors are quantized to 8-bit RGB on the wire, alpha is dropped.
//!
//! # Threading
//!
//! A queue is driven from one thread at a time. [`UpdateWorker`] moves a queue
//! onto its own thread and serializes flushes for callers that render elsewhere.

pub mod backend;
pub mod color;
pub mod config;
mod error;
pub mod protocols;
pub mod transport;
pub mod types;
pub mod worker;

// Error types
pub use error::{Error, Result};

// Queue trait and worker
pub use backend::UpdateQueue;
pub use worker::{UpdateWorker, WorkerStatus};

// Types
pub use color::{Color, ColorParseError};
pub use config::{BufferSizing, SerialConfig, DEFAULT_BAUD_RATE};
pub use transport::Transport;
pub use types::{ChannelDescriptor, FrameData, LedKey, UpdateEvent, WorkerState};

// Arduino WS2812
pub use protocols::arduino_ws2812::ArduinoWs2812UpdateQueue;

#[cfg(feature = "serial")]
pub use transport::SerialTransport;
