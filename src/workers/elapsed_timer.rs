use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::models::DisplayMatch;

const ZERO: &str = "00:00";

/// Time since `started_at` (epoch seconds) as `mm:ss`.
///
/// Absent or future start times render as `00:00`. Minutes keep counting past
/// 59 rather than rolling into hours.
pub fn format_elapsed(started_at: Option<i64>, now: DateTime<Utc>) -> String {
    let start = match started_at {
        Some(start) => start,
        None => return ZERO.to_string(),
    };

    let diff_ms = match now.timestamp_millis().checked_sub(start.saturating_mul(1000)) {
        Some(diff) if diff >= 0 => diff,
        _ => return ZERO.to_string(),
    };

    let secs = diff_ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Live `mm:ss` clock for one displayed set. Ticks every second on its own
/// task until dropped or until its parent token is cancelled.
pub struct ElapsedTimer {
    started_at: Option<i64>,
    display: watch::Receiver<String>,
    cancel: CancellationToken,
}

impl ElapsedTimer {
    pub fn start(started_at: Option<i64>, parent: &CancellationToken) -> Self {
        let cancel = parent.child_token();
        let (tx, display) = watch::channel(format_elapsed(started_at, Utc::now()));

        let token = cancel.clone();
        tokio::spawn(async move {
            let mut ticker = time::interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        tx.send_if_modified(|current| {
                            let next = format_elapsed(started_at, Utc::now());
                            if *current == next {
                                return false;
                            }
                            *current = next;
                            true
                        });
                    }
                }
            }
        });

        Self {
            started_at,
            display,
            cancel,
        }
    }

    pub fn started_at(&self) -> Option<i64> {
        self.started_at
    }

    /// Current clock text
    pub fn display(&self) -> String {
        self.display.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.display.clone()
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// One elapsed timer per displayed set, kept in step with the board
pub struct ElapsedClocks {
    parent: CancellationToken,
    timers: HashMap<String, ElapsedTimer>,
}

impl ElapsedClocks {
    pub fn new(parent: CancellationToken) -> Self {
        Self {
            parent,
            timers: HashMap::new(),
        }
    }

    /// Start timers for sets that appeared, restart those whose start time
    /// changed, and stop those that left the board.
    pub fn sync<'a>(&mut self, matches: impl IntoIterator<Item = &'a DisplayMatch>) {
        let wanted: HashMap<&str, Option<i64>> = matches
            .into_iter()
            .map(|m| (m.id.as_str(), m.started_at))
            .collect();

        let before = self.timers.len();
        self.timers.retain(|id, timer| {
            wanted
                .get(id.as_str())
                .map(|started_at| *started_at == timer.started_at())
                .unwrap_or(false)
        });
        let stopped = before - self.timers.len();

        let mut started = 0;
        for (id, started_at) in wanted {
            if !self.timers.contains_key(id) {
                self.timers
                    .insert(id.to_string(), ElapsedTimer::start(started_at, &self.parent));
                started += 1;
            }
        }

        if started > 0 || stopped > 0 {
            debug!("Elapsed clocks: {} started, {} stopped", started, stopped);
        }
    }

    /// Clock text for a set, `None` if it is not on the board
    pub fn display(&self, match_id: &str) -> Option<String> {
        self.timers.get(match_id).map(|t| t.display())
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
