//! Section countdown timer
//!
//! [`Countdown`] is a plain state machine advanced one second per [`Countdown::tick`].
//! [`CountdownHandle`] drives it from a tokio interval and stops ticking when dropped.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::progress::format_time;

/// Remaining time at or below which the timer shows a warning
pub const DEFAULT_WARNING_THRESHOLD_SECS: u64 = 300;

const TICK: Duration = Duration::from_secs(1);

type ExpiryCallback = Box<dyn FnOnce() + Send + 'static>;

/// Timer lifecycle; `Expired` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Running,
    Expired,
}

/// Point-in-time view of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub remaining: u64,
    pub state: TimerState,
    pub warning: bool,
}

impl fmt::Display for TimerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_time(self.remaining))
    }
}

/// A countdown in whole seconds
pub struct Countdown {
    remaining: u64,
    warning_threshold: u64,
    state: TimerState,
    on_expire: Option<ExpiryCallback>,
}

impl fmt::Debug for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Countdown")
            .field("remaining", &self.remaining)
            .field("warning_threshold", &self.warning_threshold)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Countdown {
    /// Start a countdown of `duration_secs`
    ///
    /// A zero duration starts out `Expired`. Its callback runs on the first tick, or
    /// straight away when driven by a [`CountdownHandle`].
    pub fn new(duration_secs: u64) -> Self {
        let state = if duration_secs == 0 { TimerState::Expired } else { TimerState::Running };
        Self {
            remaining: duration_secs,
            warning_threshold: DEFAULT_WARNING_THRESHOLD_SECS,
            state,
            on_expire: None,
        }
    }

    pub fn with_warning_threshold(mut self, secs: u64) -> Self {
        self.warning_threshold = secs;
        self
    }

    /// Callback run once when the countdown reaches zero
    pub fn on_expire(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_expire = Some(Box::new(callback));
        self
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    pub fn is_warning(&self) -> bool {
        self.remaining > 0 && self.remaining <= self.warning_threshold
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot { remaining: self.remaining, state: self.state, warning: self.is_warning() }
    }

    /// Advance by one second, running the expiry callback if it is due
    pub fn tick(&mut self) -> TimerState {
        self.advance();
        if let Some(callback) = self.take_due_callback() {
            callback();
        }
        self.state
    }

    fn advance(&mut self) {
        if self.state == TimerState::Running {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.state = TimerState::Expired;
            }
        }
    }

    /// The expiry callback, once, after the countdown has expired
    fn take_due_callback(&mut self) -> Option<ExpiryCallback> {
        if self.state == TimerState::Expired { self.on_expire.take() } else { None }
    }
}

/// A countdown ticking on a background task
///
/// Dropping the handle cancels the task.
#[derive(Debug)]
pub struct CountdownHandle {
    countdown: Arc<Mutex<Countdown>>,
    snapshots: watch::Receiver<TimerSnapshot>,
    cancel_token: CancellationToken,
}

impl CountdownHandle {
    /// Drive `countdown` once per second on the current tokio runtime
    pub fn spawn(countdown: Countdown) -> Self {
        let (tx, snapshots) = watch::channel(countdown.snapshot());
        let countdown = Arc::new(Mutex::new(countdown));
        let cancel_token = CancellationToken::new();

        tokio::spawn(run(Arc::clone(&countdown), tx, cancel_token.clone()));

        Self { countdown, snapshots, cancel_token }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.countdown.lock().unwrap_or_else(PoisonError::into_inner).snapshot()
    }

    /// Receiver of every snapshot the timer publishes
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until the countdown expires or the timer is cancelled
    pub async fn finished(&self) -> TimerSnapshot {
        let mut rx = self.subscribe();
        loop {
            let snapshot = *rx.borrow_and_update();
            if snapshot.state == TimerState::Expired || self.cancel_token.is_cancelled() {
                return snapshot;
            }
            if rx.changed().await.is_err() {
                return *rx.borrow();
            }
        }
    }

    /// Stop ticking
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn run(
    countdown: Arc<Mutex<Countdown>>,
    tx: watch::Sender<TimerSnapshot>,
    cancel_token: CancellationToken,
) {
    // Zero-length countdowns are already expired
    let (snapshot, callback) = {
        let mut countdown = countdown.lock().unwrap_or_else(PoisonError::into_inner);
        (countdown.snapshot(), countdown.take_due_callback())
    };
    if snapshot.state == TimerState::Expired {
        if let Some(callback) = callback {
            callback();
        }
        let _ = tx.send(snapshot);
        return;
    }

    let mut interval = tokio::time::interval_at(Instant::now() + TICK, TICK);
    interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                tracing::debug!("Countdown cancelled");
                return;
            }

            _ = interval.tick() => {
                let (snapshot, callback) = {
                    let mut countdown = countdown.lock().unwrap_or_else(PoisonError::into_inner);
                    countdown.advance();
                    (countdown.snapshot(), countdown.take_due_callback())
                };
                // Callback runs with the lock released
                if let Some(callback) = callback {
                    callback();
                }
                let _ = tx.send(snapshot);
                if snapshot.state == TimerState::Expired {
                    tracing::debug!("Countdown expired");
                    return;
                }
            }
        }
    }
}
