//! End-to-end tests for the Arduino WS2812 protocol against a simulated controller.
//!
//! These tests drive the full startup -> discovery -> flush -> worker lifecycle
//! through a mock transport that behaves like the controller firmware: it prints
//! its prompt after every command, answers count queries from a channel table,
//! and latches streamed pixel data on the commit command.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use ws281x_serial::protocols::arduino_ws2812::protocol::{
    ASK_PROMPT_COMMAND, COUNT_COMMAND, UPDATE_COMMAND,
};
use ws281x_serial::{
    ArduinoWs2812UpdateQueue, BufferSizing, ChannelDescriptor, Color, Error, FrameData, LedKey,
    Result, SerialConfig, Transport, UpdateQueue, UpdateWorker, WorkerState,
};

const PROMPT: &[u8] = b">";

/// Observable state of the simulated controller.
#[derive(Default)]
struct ControllerState {
    open: bool,
    unplugged: bool,
    /// Swallows commands without answering.
    silent: bool,
    /// LED count per channel, channel 1 first.
    led_counts: Vec<u8>,
    output: VecDeque<u8>,
    /// Raw pixel bytes received per channel since the last commit.
    pending: HashMap<u8, Vec<u8>>,
    /// Pixels shown per channel after the last commit.
    latched: HashMap<u8, Vec<[u8; 3]>>,
    commits: usize,
    commands: Vec<u8>,
}

impl ControllerState {
    fn respond(&mut self, bytes: &[u8]) {
        if self.silent {
            return;
        }
        self.output.extend(bytes.iter().copied());
        self.output.extend(PROMPT.iter().copied());
    }

    fn handle(&mut self, buffer: &[u8]) {
        let command = buffer[0];
        self.commands.push(command);
        let channel = command >> 4;
        match (channel, command & 0x0F) {
            (_, ASK_PROMPT_COMMAND) => self.respond(&[]),
            (0, COUNT_COMMAND) => {
                let count = self.led_counts.len() as u8;
                self.respond(&[count]);
            }
            (channel, COUNT_COMMAND) => {
                let count = self
                    .led_counts
                    .get(channel as usize - 1)
                    .copied()
                    .unwrap_or(0);
                self.respond(&[count]);
            }
            (0, UPDATE_COMMAND) => {
                for (channel, data) in self.pending.drain() {
                    let leds = self.led_counts[channel as usize - 1] as usize;
                    let pixels = data
                        .chunks_exact(3)
                        .take(leds)
                        .map(|rgb| [rgb[0], rgb[1], rgb[2]])
                        .collect();
                    self.latched.insert(channel, pixels);
                }
                self.commits += 1;
                self.respond(&[]);
            }
            (channel, UPDATE_COMMAND) => {
                self.pending.insert(channel, buffer[1..].to_vec());
                self.respond(&[]);
            }
            _ => {}
        }
    }
}

/// Transport handle onto a shared simulated controller.
#[derive(Clone)]
struct MockController {
    state: Arc<Mutex<ControllerState>>,
}

impl MockController {
    fn new(led_counts: &[u8]) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControllerState {
                led_counts: led_counts.to_vec(),
                ..Default::default()
            })),
        }
    }

    /// A controller that never answers.
    fn silent() -> Self {
        let controller = Self::new(&[4]);
        controller.state.lock().unwrap().silent = true;
        controller
    }

    fn unplug(&self) {
        self.state.lock().unwrap().unplugged = true;
    }

    fn latched(&self, channel: u8) -> Vec<[u8; 3]> {
        self.state
            .lock()
            .unwrap()
            .latched
            .get(&channel)
            .cloned()
            .unwrap_or_default()
    }

    fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }

    fn commands(&self) -> Vec<u8> {
        self.state.lock().unwrap().commands.clone()
    }
}

impl Transport for MockController {
    fn open(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.unplugged {
            return Err(Error::disconnected("no such device"));
        }
        state.open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state.lock().unwrap().open
    }

    fn discard_pending_input(&mut self) -> Result<()> {
        self.state.lock().unwrap().output.clear();
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.unplugged {
            return Err(Error::disconnected("device removed"));
        }
        if !state.open {
            return Err(Error::NotOpen);
        }
        state.handle(bytes);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut state = self.state.lock().unwrap();
        if state.unplugged {
            return Err(Error::disconnected("device removed"));
        }
        state.output.pop_front().ok_or(Error::Timeout)
    }
}

fn queue(controller: &MockController) -> ArduinoWs2812UpdateQueue<MockController> {
    ArduinoWs2812UpdateQueue::new(controller.clone(), &SerialConfig::new("mock"))
}

fn fill(channels: &[ChannelDescriptor], color: Color) -> FrameData {
    channels
        .iter()
        .flat_map(|channel| channel.led_keys())
        .map(|key| (key, color))
        .collect()
}

fn wait_until(mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !done() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_discovery_excludes_empty_channels() {
    let controller = MockController::new(&[5, 0]);
    let mut queue = queue(&controller);

    queue.on_startup().unwrap();
    let channels = queue.discover_channels().unwrap();

    assert_eq!(channels, vec![ChannelDescriptor::new(1, 5)]);
    assert_eq!(queue.channels(), Some(&channels[..]));
    assert_eq!(
        controller.commands(),
        vec![ASK_PROMPT_COMMAND, ASK_PROMPT_COMMAND, COUNT_COMMAND, 0x11, 0x21]
    );
}

#[test]
fn test_discovery_opens_link_on_demand() {
    let controller = MockController::new(&[3, 4, 0, 8]);
    let mut queue = queue(&controller);

    let channels = queue.discover_channels().unwrap();
    assert_eq!(
        channels,
        vec![
            ChannelDescriptor::new(1, 3),
            ChannelDescriptor::new(2, 4),
            ChannelDescriptor::new(4, 8),
        ]
    );
}

#[test]
fn test_silent_controller_times_out() {
    let controller = MockController::silent();
    let mut queue = queue(&controller);

    queue.on_startup().unwrap();
    assert!(queue.discover_channels().unwrap_err().is_timeout());
    assert!(queue.channels().is_none());
    assert!(queue.transport().is_open());
}

#[test]
fn test_rediscovery_failure_keeps_known_channels() {
    let controller = MockController::new(&[6, 2]);
    let mut queue = queue(&controller);
    let channels = queue.discover_channels().unwrap();

    controller.state.lock().unwrap().silent = true;
    assert!(queue.discover_channels().unwrap_err().is_timeout());
    assert_eq!(queue.channels(), Some(&channels[..]));
}

#[test]
fn test_flush_renders_discovered_layout() {
    let controller = MockController::new(&[3, 2]);
    let mut queue = queue(&controller);
    queue.on_startup().unwrap();
    let channels = queue.discover_channels().unwrap();

    let mut frame = fill(&channels, Color::BLACK);
    frame.insert(LedKey::new(1, 2), Color::from_hex_string("#FF0000").unwrap());
    frame.insert(LedKey::new(2, 0), Color::from_hex_string("#00FF00").unwrap());
    queue.on_update(&frame).unwrap();

    assert_eq!(controller.commits(), 1);
    assert_eq!(controller.latched(1), vec![[0, 0, 0], [0, 0, 0], [255, 0, 0]]);
    assert_eq!(controller.latched(2), vec![[0, 255, 0], [0, 0, 0]]);
    // Both channel buffers are sized by all five LEDs of the frame.
    assert_eq!(queue.builder().buffer(1).unwrap().len(), 16);
    assert_eq!(queue.builder().buffer(2).unwrap().len(), 16);
}

#[test]
fn test_commit_is_last_command_of_flush() {
    let controller = MockController::new(&[2, 2]);
    let mut queue = queue(&controller);
    queue.on_startup().unwrap();
    let channels = queue.discover_channels().unwrap();
    let before = controller.commands().len();

    queue.on_update(&fill(&channels, Color::WHITE)).unwrap();

    let flushed = controller.commands()[before..].to_vec();
    assert_eq!(flushed.len(), 3);
    assert_eq!(flushed[2], UPDATE_COMMAND);
    assert!(flushed[..2].contains(&0x12));
    assert!(flushed[..2].contains(&0x22));
}

#[test]
fn test_per_channel_sizing_end_to_end() {
    let controller = MockController::new(&[3, 2]);
    let config = SerialConfig::new("mock").buffer_sizing(BufferSizing::PerChannel);
    let mut queue = ArduinoWs2812UpdateQueue::new(controller.clone(), &config);
    queue.on_startup().unwrap();
    let channels = queue.discover_channels().unwrap();

    queue.on_update(&fill(&channels, Color::WHITE)).unwrap();

    assert_eq!(queue.builder().buffer(1).unwrap().len(), 10);
    assert_eq!(queue.builder().buffer(2).unwrap().len(), 7);
    assert_eq!(controller.latched(2), vec![[255, 255, 255]; 2]);
}

#[test]
fn test_unplugged_controller_fails_flush_without_commit() {
    let controller = MockController::new(&[4]);
    let mut queue = queue(&controller);
    queue.on_startup().unwrap();
    let channels = queue.discover_channels().unwrap();

    controller.unplug();
    let err = queue.on_update(&fill(&channels, Color::WHITE)).unwrap_err();
    assert!(err.is_disconnected());
    assert_eq!(controller.commits(), 0);
}

#[test]
fn test_invalid_channel_sends_nothing() {
    let controller = MockController::new(&[4]);
    let mut queue = queue(&controller);
    queue.on_startup().unwrap();
    let before = controller.commands().len();

    let mut frame = FrameData::new();
    frame.insert(LedKey::new(1, 0), Color::WHITE);
    frame.insert(LedKey::new(16, 0), Color::WHITE);
    assert!(matches!(
        queue.on_update(&frame),
        Err(Error::InvalidChannel(16))
    ));
    assert_eq!(controller.commands().len(), before);
}

#[test]
fn test_worker_lifecycle() {
    let controller = MockController::new(&[2]);
    let mut worker = UpdateWorker::new(Box::new(queue(&controller)));

    let mut frame = FrameData::new();
    frame.insert(LedKey::new(1, 0), Color::rgb(0.0, 0.0, 1.0));
    frame.insert(LedKey::new(1, 1), Color::rgb(1.0, 1.0, 0.0));

    let mut accepted = false;
    wait_until(|| {
        accepted = worker.submit_frame(frame.clone());
        accepted
    });
    assert!(accepted);

    wait_until(|| controller.commits() == 1);
    assert_eq!(controller.latched(1), vec![[0, 0, 255], [255, 255, 0]]);

    worker.stop();
    assert!(worker.is_started());
    assert!(matches!(worker.state(), WorkerState::Stopped { .. }));
}

#[test]
fn test_worker_reports_lost_device() {
    let controller = MockController::new(&[1]);
    let mut worker = UpdateWorker::new(Box::new(queue(&controller)));
    wait_until(|| {
        worker.update();
        worker.is_started()
    });

    controller.unplug();
    let mut frame = FrameData::new();
    frame.insert(LedKey::new(1, 0), Color::WHITE);
    assert!(worker.submit_frame(frame));

    wait_until(|| !worker.is_alive());
    worker.update();
    match worker.state() {
        WorkerState::Failed { error, .. } => assert!(error.contains("device removed")),
        other => panic!("unexpected state: {:?}", other),
    }
}
