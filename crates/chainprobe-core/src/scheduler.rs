//! Fixed-interval tick loop.
//!
//! ```text
//! Idle ──start──▶ Running ──tick done──▶ Waiting ──interval──▶ Running
//!                                           │
//!                                        cancel
//!                                           ▼
//!                                        Stopped
//! ```
//!
//! The first tick fires immediately. Cancellation is observed while waiting;
//! a tick in progress is expected to watch the same token itself.

use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Runtime state of a job's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum JobState {
    /// Not yet started.
    Idle = 0,
    /// A tick is in progress.
    Running = 1,
    /// Sleeping until the next tick.
    Waiting = 2,
    /// Cancelled. Terminal.
    Stopped = 3,
}

impl JobState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Waiting,
            _ => Self::Stopped,
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Waiting => write!(f, "waiting"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Drives a tick function on a fixed interval until cancelled.
#[derive(Debug)]
pub struct Scheduler {
    interval: Duration,
    state: AtomicU8,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: AtomicU8::new(JobState::Idle as u8),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> JobState {
        JobState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: JobState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Tick once now, then every `interval` after the previous tick
    /// finished, until `cancel` fires.
    pub async fn run<F, Fut>(&self, cancel: &CancellationToken, mut tick: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        if cancel.is_cancelled() {
            self.set_state(JobState::Stopped);
            return;
        }

        loop {
            self.set_state(JobState::Running);
            tick().await;

            self.set_state(JobState::Waiting);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.set_state(JobState::Stopped);
    }
}
