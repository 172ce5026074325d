//! Channel discovery example.
//!
//! Opens the controller, asks it how many channels and LEDs it drives and
//! prints the result.
//!
//! Run with: `cargo run --example discover -- /dev/ttyUSB0`

mod common;

use clap::Parser;
use common::Args;
use ws281x_serial::{ArduinoWs2812UpdateQueue, Result};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.config();

    println!("Opening {} at {} baud...\n", config.port_name, config.baud_rate);
    let mut queue = ArduinoWs2812UpdateQueue::open_serial(&config)?;
    let channels = queue.discover_channels()?;

    if channels.is_empty() {
        println!("Controller reports no populated channels.");
        return Ok(());
    }

    for channel in &channels {
        println!("  Found: {}", channel);
    }
    Ok(())
}
