use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api::{BracketSource, FetchError, FetchResult};
use crate::matching::BoardCycle;
use crate::models::{BracketSnapshot, SchedulerStatus};

type InFlight = Pin<Box<dyn Future<Output = FetchResult<BracketSnapshot>> + Send>>;

/// Latest published board; `None` until the first fetch succeeds
pub type CycleReceiver = watch::Receiver<Option<Arc<BoardCycle>>>;

/// Polls the bracket source on a fixed cadence, on demand, with a visible
/// countdown. At most one fetch is in flight at a time.
pub struct RefreshScheduler {
    source: Arc<dyn BracketSource>,
    refresh_interval: Duration,
    request_timeout: Duration,
}

/// Handle to a running scheduler. Dropping it stops the scheduler.
pub struct SchedulerHandle {
    cycles: CycleReceiver,
    status: watch::Receiver<SchedulerStatus>,
    trigger_tx: mpsc::Sender<()>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Create a new refresh scheduler
    pub fn new(
        source: Arc<dyn BracketSource>,
        refresh_interval_secs: u64,
        request_timeout_secs: u64,
    ) -> Self {
        Self {
            source,
            refresh_interval: Duration::from_secs(refresh_interval_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
        }
    }

    /// Start polling. The first fetch is issued immediately. Cancelling
    /// `cancel` (or dropping the returned handle) stops every timer and
    /// abandons any in-flight request.
    pub fn spawn(self, cancel: CancellationToken) -> SchedulerHandle {
        let refresh_secs = self.refresh_interval.as_secs();
        let (cycles_tx, cycles) = watch::channel(None);
        let (status_tx, status) = watch::channel(SchedulerStatus::new(refresh_secs));
        // Capacity 1: extra presses while one is queued are dropped
        let (trigger_tx, trigger_rx) = mpsc::channel(1);

        let state = SchedulerLoop {
            source: self.source,
            refresh_secs,
            request_timeout: self.request_timeout,
            cycles_tx,
            status_tx,
            sequence: 0,
        };

        let task = tokio::spawn(state.run(self.refresh_interval, trigger_rx, cancel.clone()));

        SchedulerHandle {
            cycles,
            status,
            trigger_tx,
            cancel,
            task,
        }
    }
}

impl SchedulerHandle {
    /// Queue a request for an immediate refresh. Returns `false` if one is
    /// already queued. A queued request that the scheduler picks up while a
    /// fetch is in flight is dropped, so `true` does not promise a fetch.
    pub fn refresh_now(&self) -> bool {
        self.trigger_tx.try_send(()).is_ok()
    }

    pub fn cycles(&self) -> CycleReceiver {
        self.cycles.clone()
    }

    pub fn status(&self) -> watch::Receiver<SchedulerStatus> {
        self.status.clone()
    }

    /// Stop the scheduler and wait for its task to exit
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Err(e) = (&mut self.task).await {
            warn!("Refresh scheduler task ended abnormally: {}", e);
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct SchedulerLoop {
    source: Arc<dyn BracketSource>,
    refresh_secs: u64,
    request_timeout: Duration,
    cycles_tx: watch::Sender<Option<Arc<BoardCycle>>>,
    status_tx: watch::Sender<SchedulerStatus>,
    sequence: u64,
}

impl SchedulerLoop {
    async fn run(
        mut self,
        refresh_interval: Duration,
        mut trigger_rx: mpsc::Receiver<()>,
        cancel: CancellationToken,
    ) {
        info!("Refresh scheduler started (interval: {:?})", refresh_interval);

        let mut cadence = time::interval(refresh_interval);
        cadence.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let second = Duration::from_secs(1);
        let mut countdown = time::interval_at(Instant::now() + second, second);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight: Option<InFlight> = None;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    break;
                }

                result = wait_in_flight(&mut in_flight) => {
                    in_flight = None;
                    self.complete(result);
                    // Next cadence fetch is a full interval after this one finished
                    cadence.reset();
                    countdown.reset();
                }

                _ = cadence.tick() => {
                    if in_flight.is_some() {
                        debug!("Cadence tick skipped: fetch already in flight");
                    } else {
                        in_flight = Some(self.begin());
                    }
                }

                Some(()) = trigger_rx.recv() => {
                    if in_flight.is_some() {
                        debug!("Manual refresh ignored: fetch already in flight");
                    } else {
                        info!("Manual refresh requested");
                        self.status_tx
                            .send_modify(|s| s.seconds_to_refresh = self.refresh_secs);
                        countdown.reset();
                        in_flight = Some(self.begin());
                    }
                }

                _ = countdown.tick() => {
                    self.status_tx.send_if_modified(|s| {
                        if s.seconds_to_refresh == 0 {
                            return false;
                        }
                        s.seconds_to_refresh -= 1;
                        true
                    });
                }
            }
        }

        info!("Refresh scheduler stopped");
    }

    /// Enter Fetching and return the request future
    fn begin(&mut self) -> InFlight {
        self.status_tx.send_modify(|s| s.in_flight = true);

        let source = Arc::clone(&self.source);
        let deadline = self.request_timeout;

        Box::pin(async move {
            match time::timeout(deadline, source.fetch_board()).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(deadline)),
            }
        })
    }

    /// Back to Idle. A failed fetch leaves the published board untouched.
    /// Status is updated before the new cycle goes out, so a consumer woken
    /// by the cycle always reads the Idle status that belongs to it.
    fn complete(&mut self, result: FetchResult<BracketSnapshot>) {
        let (cycle, last_error) = match result {
            Ok(snapshot) => {
                self.sequence += 1;
                let cycle = BoardCycle::build(&snapshot, self.sequence, Utc::now());

                info!(
                    "Board refreshed (cycle {}): {} called, {} playing, {} upcoming",
                    cycle.sequence,
                    cycle.called.len(),
                    cycle.playing.len(),
                    cycle.upcoming.len()
                );

                (Some(cycle), None)
            }
            Err(e) => {
                error!("Failed to refresh bracket: {}", e);
                warn!("Keeping previous board until next refresh");
                (None, Some(e.to_string()))
            }
        };

        let cycles = self.sequence;
        let refresh_secs = self.refresh_secs;
        self.status_tx.send_modify(|s| {
            s.in_flight = false;
            s.seconds_to_refresh = refresh_secs;
            s.cycles = cycles;
            s.last_error = last_error;
        });

        if let Some(cycle) = cycle {
            self.cycles_tx.send_replace(Some(Arc::new(cycle)));
        }
    }
}

async fn wait_in_flight(in_flight: &mut Option<InFlight>) -> FetchResult<BracketSnapshot> {
    match in_flight {
        Some(fetch) => fetch.await,
        None => std::future::pending().await,
    }
}
