//! One-second countdown to the tracker's next scheduled scrape.
//!
//! The ticker runs independently of the minute-granularity data sync and
//! only ever reads one field of shared state. At most one ticker may be
//! alive: the handle owns its task and aborts it on drop, so replacing a
//! ticker replaces the task instead of accumulating a second one (two
//! tickers would publish interleaved, visibly jumpy countdowns).

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::state::SharedState;

/// Tick period of the live countdown
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// What the countdown line should show right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownDisplay {
    /// No next-scrape time known yet
    Idle,
    /// Remaining time, pre-formatted
    Counting(String),
    /// The scheduled instant has passed and the scraper should be running
    Overdue,
}

impl CountdownDisplay {
    /// Derive the display from a target instant. Comparison happens at
    /// millisecond precision so a sub-second remainder still counts down
    /// ("0s") instead of flipping to overdue early.
    pub fn for_target(next_scrape_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        let Some(target) = next_scrape_at else {
            return Self::Idle;
        };
        let remaining_ms = target.signed_duration_since(now).num_milliseconds();
        if remaining_ms <= 0 {
            Self::Overdue
        } else {
            Self::Counting(remaining_label(remaining_ms / 1000))
        }
    }

    pub fn is_overdue(&self) -> bool {
        matches!(self, Self::Overdue)
    }
}

impl std::fmt::Display for CountdownDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Calculating..."),
            Self::Counting(label) => write!(f, "{label}"),
            Self::Overdue => write!(f, "Running now..."),
        }
    }
}

/// "2h 5m 30s" when hours remain, "5m 30s" below an hour, "30s" below a
/// minute
pub fn remaining_label(total_secs: i64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Owning handle to the ticking task.
///
/// Dropping the handle aborts the task, which is what makes "start a new
/// countdown" safe to call repeatedly: assign the new ticker over the old
/// binding and the old task dies with it.
pub struct CountdownTicker {
    handle: JoinHandle<()>,
    display: watch::Receiver<CountdownDisplay>,
}

impl CountdownTicker {
    pub fn spawn(state: SharedState) -> Self {
        Self::spawn_with_period(state, COUNTDOWN_TICK)
    }

    /// Period injectable so tests don't sit through wall-clock seconds
    pub fn spawn_with_period(state: SharedState, period: Duration) -> Self {
        let (tx, rx) = watch::channel(CountdownDisplay::Idle);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let target = state.read().unwrap().next_scrape_at();
                let display = CountdownDisplay::for_target(target, Utc::now());
                if tx.send(display).is_err() {
                    break;
                }
            }
        });
        Self {
            handle,
            display: rx,
        }
    }

    /// Most recently published display value
    pub fn latest(&self) -> CountdownDisplay {
        self.display.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownDisplay> {
        self.display.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
