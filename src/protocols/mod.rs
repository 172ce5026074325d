//! Controller protocol implementations.

pub mod arduino_ws2812;
