//! Animated pattern example using UpdateWorker.
//!
//! Discovers the controller's channels, hands the queue to a worker thread
//! and streams frames at ~30 FPS.
//!
//! Run with: `cargo run --example chase -- /dev/ttyUSB0 --pattern rainbow`

mod common;

use clap::Parser;
use common::{create_frame, Args};
use std::thread;
use std::time::Duration;
use ws281x_serial::{ArduinoWs2812UpdateQueue, Result, UpdateWorker, WorkerState};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut queue = ArduinoWs2812UpdateQueue::open_serial(&args.config())?;
    let channels = queue.discover_channels()?;
    if channels.is_empty() {
        println!("Controller reports no populated channels.");
        return Ok(());
    }

    let mut worker = UpdateWorker::new(Box::new(queue));
    println!("Sending {}... Press Ctrl+C to stop\n", args.pattern.name());

    let mut frame_count = 0usize;
    loop {
        worker.update();
        if let WorkerState::Failed { name, error } = worker.state() {
            eprintln!("{}: {}", name, error);
            return Ok(());
        }
        let frame = create_frame(args.pattern, &channels, frame_count);
        if worker.submit_frame(frame) {
            frame_count = frame_count.wrapping_add(1);
        }
        thread::sleep(Duration::from_millis(33));
    }
}
