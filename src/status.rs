//! # Submission Status Rotation
//! Cosmetic progress messages rotated on a timer while a submission is in
//! flight. Purely presentational: no effect on correctness, and the timer
//! must never outlive the submission — dropping the ticker aborts the task.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Messages cycled while the upstream analysis runs.
pub const ROTATION: [&str; 6] = [
    "Optimizing Image for Transmission...",
    "Scanning Spectral Imagery...",
    "Running Damage Assessment...",
    "Running Tactical Heuristics...",
    "Optimizing For Low Bandwidth Intelligence...",
    "Finalizing Intelligence Report...",
];

pub const DEFAULT_ROTATION_PERIOD: Duration = Duration::from_secs(4);

/// Periodic notifier publishing the current status line via a watch channel.
pub struct StatusTicker {
    handle: JoinHandle<()>,
    rx: watch::Receiver<&'static str>,
}

impl StatusTicker {
    /// Spawn the rotation task. Starts at the first message immediately,
    /// then advances every `period`, wrapping around the list.
    pub fn start(period: Duration) -> Self {
        let (tx, rx) = watch::channel(ROTATION[0]);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await; // first tick fires immediately; already shown
            let mut i = 1usize;
            loop {
                ticker.tick().await;
                if tx.send(ROTATION[i]).is_err() {
                    break; // nobody is watching anymore
                }
                i = (i + 1) % ROTATION.len();
            }
        });
        Self { handle, rx }
    }

    /// The message currently on display.
    pub fn current(&self) -> &'static str {
        *self.rx.borrow()
    }

    /// Receiver for callers that want change notifications.
    pub fn subscribe(&self) -> watch::Receiver<&'static str> {
        self.rx.clone()
    }

    /// Stop rotating. Equivalent to dropping the ticker.
    pub fn stop(self) {}
}

impl Drop for StatusTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
