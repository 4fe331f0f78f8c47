//! Cancellable periodic tick loop.
//!
//! The first tick fires immediately, then one per interval. The shutdown
//! wait doubles as the timer, so a stop request takes effect as soon as the
//! in-flight tick finishes; ticks themselves are never interrupted.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Requests a clean stop of the loop. Safe to call from any thread; calling
/// it more than once is harmless.
pub struct ShutdownHandle {
    tx: Sender<()>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }
}

pub struct Ticker {
    interval: Duration,
    shutdown_rx: Receiver<()>,
}

impl Ticker {
    pub fn new(interval: Duration) -> (Self, ShutdownHandle) {
        let (tx, shutdown_rx) = mpsc::channel();
        (
            Self {
                interval,
                shutdown_rx,
            },
            ShutdownHandle { tx },
        )
    }

    /// Runs `tick` until shutdown is requested. Returns after the tick in
    /// flight when the request arrives has completed.
    pub fn run<F: FnMut()>(self, mut tick: F) {
        loop {
            tick();
            match self.shutdown_rx.recv_timeout(self.interval) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }
    }
}
