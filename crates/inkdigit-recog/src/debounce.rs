//! Debounced recognition
//!
//! [`DebounceScheduler`] is a pure state machine over caller-supplied
//! instants:
//!
//! ```text
//! Idle --input--> Pending{deadline} --poll >= deadline--> Running
//!                   ^  |input (deadline reset)              |
//!                   |__|                                    | input: queue or drop
//! Running --finish--> Idle, or Pending if input was queued
//! ```
//!
//! [`DebouncedWorker`] drives the scheduler on a dedicated thread and runs
//! recognition passes over the latest stroke snapshot.

use crate::recognizer::Recognizer;
use crate::result::AggregateResult;
use crate::{RecogError, RecogResult};
use inkdigit_core::Stroke;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// What happens to input that arrives while a pass is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetriggerPolicy {
    /// Schedule another pass after the current one
    #[default]
    Queue,
    /// Ignore the input
    Drop,
}

/// Longest accepted quiet period, one minute
pub const MAX_DEBOUNCE_DELAY_MS: u64 = 60_000;

/// Debounce timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet period before a pass starts, in milliseconds (default: 500)
    pub delay_ms: u64,
    /// Input handling during a pass (default: queue)
    pub retrigger: RetriggerPolicy,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay_ms: 500,
            retrigger: RetriggerPolicy::Queue,
        }
    }
}

impl DebounceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the quiet period
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the retrigger policy
    pub fn with_retrigger(mut self, retrigger: RetriggerPolicy) -> Self {
        self.retrigger = retrigger;
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn validate(&self) -> RecogResult<()> {
        if self.delay_ms == 0 {
            return Err(RecogError::InvalidConfig("debounce delay must be > 0".into()));
        }
        if self.delay_ms > MAX_DEBOUNCE_DELAY_MS {
            return Err(RecogError::InvalidConfig(format!(
                "debounce delay must be <= {MAX_DEBOUNCE_DELAY_MS} ms, got {}",
                self.delay_ms
            )));
        }
        if !(300..=800).contains(&self.delay_ms) {
            tracing::debug!(delay_ms = self.delay_ms, "debounce delay outside 300-800 ms");
        }
        Ok(())
    }
}

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending { deadline: Instant },
    Running { queued: Option<Instant> },
}

/// Whether an input was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The deadline was (re)set
    Scheduled,
    /// A pass is running; another will follow it
    Queued,
    /// A pass is running and the input was discarded
    Dropped,
}

/// Debounce state machine
#[derive(Debug, Clone)]
pub struct DebounceScheduler {
    delay: Duration,
    policy: RetriggerPolicy,
    state: DebounceState,
}

impl DebounceScheduler {
    pub fn new(config: DebounceConfig) -> RecogResult<Self> {
        config.validate()?;
        Ok(Self {
            delay: config.delay(),
            policy: config.retrigger,
            state: DebounceState::Idle,
        })
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Record input at `now`
    pub fn on_input(&mut self, now: Instant) -> InputOutcome {
        match self.state {
            DebounceState::Idle | DebounceState::Pending { .. } => {
                self.state = DebounceState::Pending {
                    deadline: self.deadline_after(now),
                };
                InputOutcome::Scheduled
            }
            DebounceState::Running { .. } => match self.policy {
                RetriggerPolicy::Queue => {
                    self.state = DebounceState::Running { queued: Some(now) };
                    InputOutcome::Queued
                }
                RetriggerPolicy::Drop => InputOutcome::Dropped,
            },
        }
    }

    /// Start a pass if the deadline has passed; returns whether one started
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Pending { deadline } if now >= deadline => {
                self.state = DebounceState::Running { queued: None };
                true
            }
            _ => false,
        }
    }

    /// Mark the running pass as finished
    pub fn finish(&mut self, now: Instant) {
        if let DebounceState::Running { queued } = self.state {
            self.state = match queued {
                Some(at) => DebounceState::Pending {
                    deadline: self.deadline_after(at).max(now),
                },
                None => DebounceState::Idle,
            };
        }
    }

    /// When the next pass is due, if one is pending
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Pending { deadline } => Some(deadline),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, DebounceState::Running { .. })
    }

    fn deadline_after(&self, at: Instant) -> Instant {
        at.checked_add(self.delay).unwrap_or(at)
    }
}

enum Message {
    Snapshot {
        strokes: Vec<Stroke>,
        canvas_width: f64,
        at: Instant,
    },
}

/// Background worker running debounced recognition passes
///
/// Dropping the worker stops its thread after any pass in progress.
pub struct DebouncedWorker {
    tx: Option<Sender<Message>>,
    handle: Option<JoinHandle<()>>,
}

impl DebouncedWorker {
    /// Spawn a worker; `on_result` receives the outcome of every pass
    pub fn spawn<F>(recognizer: Arc<Recognizer>, config: DebounceConfig, on_result: F) -> RecogResult<Self>
    where
        F: FnMut(RecogResult<AggregateResult>) + Send + 'static,
    {
        let scheduler = DebounceScheduler::new(config)?;
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || run_worker(recognizer, scheduler, rx, on_result));
        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Submit the current stroke snapshot
    pub fn submit(&self, strokes: Vec<Stroke>, canvas_width: f64) {
        if let Some(tx) = &self.tx {
            let msg = Message::Snapshot {
                strokes,
                canvas_width,
                at: Instant::now(),
            };
            if tx.send(msg).is_err() {
                tracing::warn!("recognition worker has stopped");
            }
        }
    }
}

impl Drop for DebouncedWorker {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("recognition worker panicked");
        }
    }
}

fn run_worker<F>(
    recognizer: Arc<Recognizer>,
    mut scheduler: DebounceScheduler,
    rx: mpsc::Receiver<Message>,
    mut on_result: F,
) where
    F: FnMut(RecogResult<AggregateResult>),
{
    let mut snapshot: Option<(Vec<Stroke>, f64)> = None;
    loop {
        let received = match scheduler.next_deadline() {
            Some(deadline) => {
                let now = Instant::now();
                if deadline <= now {
                    Err(RecvTimeoutError::Timeout)
                } else {
                    rx.recv_timeout(deadline - now)
                }
            }
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(msg) => accept(&mut scheduler, &mut snapshot, msg),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if !scheduler.poll(Instant::now()) {
            continue;
        }
        if let Some((strokes, canvas_width)) = snapshot.take() {
            on_result(recognizer.recognize_strokes(strokes, canvas_width));
        }
        // input that arrived during the pass
        while let Ok(msg) = rx.try_recv() {
            accept(&mut scheduler, &mut snapshot, msg);
        }
        scheduler.finish(Instant::now());
    }
    tracing::debug!("recognition worker stopped");
}

fn accept(scheduler: &mut DebounceScheduler, snapshot: &mut Option<(Vec<Stroke>, f64)>, msg: Message) {
    let Message::Snapshot {
        strokes,
        canvas_width,
        at,
    } = msg;
    if scheduler.on_input(at) != InputOutcome::Dropped {
        *snapshot = Some((strokes, canvas_width));
    }
}
