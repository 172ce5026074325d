//! Background worker that owns an update queue.
//!
//! [`UpdateWorker`] moves an [`UpdateQueue`] onto a dedicated thread, runs its
//! startup and then flushes frames as they are submitted. Because a single
//! thread owns the queue, flushes are serialized and never overlap.
//!
//! Frames are sent via a bounded channel (capacity 1). If a flush is still in
//! progress and a frame is already waiting, new frames are dropped rather than
//! queued up, so the LEDs always converge on the latest frame.
//!
//! ```ignore
//! let queue = ArduinoWs2812UpdateQueue::open_serial(&config)?;
//! let mut worker = UpdateWorker::new(Box::new(queue));
//! loop {
//!     worker.submit_frame(render());
//!     worker.update();
//!     thread::sleep(Duration::from_millis(16));
//! }
//! ```

use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::{self, JoinHandle};

use log::warn;

use crate::backend::UpdateQueue;
use crate::types::{FrameData, UpdateEvent, WorkerState};

/// Command sent to the worker thread.
#[derive(Debug, Clone)]
enum WorkerCommand {
    /// Flush a frame.
    Update(FrameData),
    /// Shut the worker down.
    Stop,
}

/// Status update from the worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorkerStatus {
    /// Startup completed or a frame was flushed.
    Ready,
    /// The queue failed; the worker has exited.
    Failed(String),
    /// The worker exited on request.
    Stopped,
}

/// Background worker serializing flushes for one update queue.
pub struct UpdateWorker {
    name: String,
    command_tx: SyncSender<WorkerCommand>,
    status_rx: Receiver<WorkerStatus>,
    handle: Option<JoinHandle<()>>,
    state: WorkerState,
    started: bool,
    frames_flushed: u64,
}

impl UpdateWorker {
    /// Spawns the worker thread. The queue's startup runs first on that thread.
    pub fn new(queue: Box<dyn UpdateQueue>) -> Self {
        let name = queue.name().to_string();
        let (command_tx, command_rx) = mpsc::sync_channel::<WorkerCommand>(1);
        let (status_tx, status_rx) = mpsc::channel::<WorkerStatus>();

        let handle = thread::spawn(move || Self::worker_loop(queue, command_rx, status_tx));

        Self {
            name: name.clone(),
            command_tx,
            status_rx,
            handle: Some(handle),
            state: WorkerState::Running { name },
            started: false,
            frames_flushed: 0,
        }
    }

    /// Returns the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the state as of the last [`update`](Self::update).
    pub fn state(&self) -> &WorkerState {
        &self.state
    }

    /// Returns whether the queue's startup has completed.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Number of successful flushes observed by [`update`](Self::update).
    pub fn frames_flushed(&self) -> u64 {
        self.frames_flushed
    }

    /// Submits a frame to be flushed (non-blocking).
    ///
    /// Returns true if the frame was queued, false if it was dropped because
    /// the worker is busy or gone.
    pub fn submit_frame(&self, frame: FrameData) -> bool {
        self.command_tx
            .try_send(WorkerCommand::Update(frame))
            .is_ok()
    }

    /// Polls for status updates from the worker thread.
    pub fn update(&mut self) {
        while let Ok(status) = self.status_rx.try_recv() {
            match status {
                // The first Ready acknowledges startup.
                WorkerStatus::Ready if !self.started => self.started = true,
                WorkerStatus::Ready => self.frames_flushed += 1,
                WorkerStatus::Failed(error) => {
                    self.state = WorkerState::Failed {
                        name: self.name.clone(),
                        error,
                    };
                }
                WorkerStatus::Stopped => {
                    self.state = WorkerState::Stopped {
                        name: self.name.clone(),
                    };
                }
            }
        }

        if !self.is_alive() && matches!(self.state, WorkerState::Running { .. }) {
            self.state = WorkerState::Failed {
                name: self.name.clone(),
                error: "Worker thread died unexpectedly".to_string(),
            };
        }
    }

    /// Checks if the worker thread is still alive.
    pub fn is_alive(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Asks the worker to stop and waits for it to exit.
    ///
    /// A frame already waiting in the channel is flushed first.
    pub fn stop(&mut self) {
        let _ = self.command_tx.send(WorkerCommand::Stop);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.update();
    }

    fn worker_loop(
        mut queue: Box<dyn UpdateQueue>,
        command_rx: Receiver<WorkerCommand>,
        status_tx: Sender<WorkerStatus>,
    ) {
        if let Err(e) = queue.handle(&UpdateEvent::Startup) {
            warn!("{}: startup failed: {}", queue.name(), e);
            let _ = status_tx.send(WorkerStatus::Failed(e.to_string()));
            return;
        }
        let _ = status_tx.send(WorkerStatus::Ready);

        while let Ok(command) = command_rx.recv() {
            match command {
                WorkerCommand::Update(frame) => match queue.on_update(&frame) {
                    Ok(()) => {
                        let _ = status_tx.send(WorkerStatus::Ready);
                    }
                    Err(e) => {
                        warn!("{}: flush failed: {}", queue.name(), e);
                        let _ = status_tx.send(WorkerStatus::Failed(e.to_string()));
                        return;
                    }
                },
                WorkerCommand::Stop => break,
            }
        }
        let _ = status_tx.send(WorkerStatus::Stopped);
    }
}

impl Drop for UpdateWorker {
    fn drop(&mut self) {
        let _ = self.command_tx.try_send(WorkerCommand::Stop);
    }
}
