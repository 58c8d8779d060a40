//! The poll controller: a self-rescheduling fetch loop driven by messages.
//!
//! [`PollController::activate`] spawns one tokio task that exclusively owns
//! the poll state. Timers, fetch completions, manual refreshes, and teardown
//! all arrive at that task as messages, so state is never touched from
//! two places at once.
//!
//! Ordering guarantees:
//! - at most one scheduled cycle is pending at any instant
//! - at most one request is in flight
//! - after deactivation nothing mutates the store and nothing is scheduled

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::cards::{CardData, parse_payload, parse_snapshot};
use crate::fetch::{FetchError, FetchResponse, Fetcher};
use crate::poll::backoff::Backoff;
use crate::poll::diagnostics::{DiagnosticsSink, PollFailure};
use crate::poll::errors::PollError;
use crate::poll::timer::{self, TimerHandle};
use crate::poll::types::{PollConfig, PollStatus, duration_millis};
use crate::store::{DisplayList, DisplayListStore};

/// What started a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleTrigger {
    Activation,
    Manual,
    /// Carries the id of the timer that fired.
    Timer(u64),
}

#[derive(Debug)]
enum PollCommand {
    RunCycle(CycleTrigger),
    FetchCompleted {
        endpoint: String,
        result: Result<FetchResponse, FetchError>,
    },
    Deactivate(Option<oneshot::Sender<()>>),
}

/// Handle to a running poll loop.
///
/// Dropping the handle deactivates the loop.
pub struct PollController {
    commands: mpsc::UnboundedSender<PollCommand>,
    store: DisplayListStore,
    status: watch::Receiver<PollStatus>,
}

impl PollController {
    /// Start a controller. Must be called from within a tokio runtime.
    ///
    /// A snapshot, if configured, is parsed and published before this returns.
    /// An endpoint, if configured, is fetched immediately. With neither, the
    /// controller idles with an empty store until deactivated.
    ///
    /// # Errors
    ///
    /// Returns [`PollError::InvalidSnapshot`] if the snapshot is not a JSON
    /// array of cards. No task is started in that case.
    pub fn activate<F: Fetcher>(
        config: PollConfig,
        fetcher: Arc<F>,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Result<Self, PollError> {
        let store = DisplayListStore::new();

        if let Some(ref text) = config.snapshot {
            let items = parse_snapshot(text).map_err(|source| {
                warn!(event = "core.poll.snapshot_invalid", error = %source);
                PollError::InvalidSnapshot { source }
            })?;
            info!(event = "core.poll.snapshot_loaded", count = items.len());
            store.replace(items);
        }

        let backoff = Backoff::new(config.base_interval, config.max_interval);
        let (status_tx, status_rx) = watch::channel(PollStatus::initial(backoff.current()));
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        info!(
            event = "core.poll.activated",
            endpoint = config.endpoint.as_deref().unwrap_or("-"),
            has_snapshot = config.snapshot.is_some(),
            base_interval_ms = duration_millis(backoff.base()),
            max_interval_ms = duration_millis(backoff.max()),
        );

        let mut poll_loop = PollLoop {
            endpoint: config.endpoint,
            fetcher,
            diagnostics,
            store: store.clone(),
            backoff,
            pending_timer: None,
            next_timer_id: 0,
            is_active: true,
            in_flight: false,
            consecutive_failures: 0,
            cycles: 0,
            last_success_at: None,
            last_failure: None,
            commands: commands_tx.clone(),
            status: status_tx,
        };

        if poll_loop.endpoint.is_some() {
            poll_loop.run_cycle(CycleTrigger::Activation);
        }
        tokio::spawn(poll_loop.run(commands_rx));

        Ok(Self {
            commands: commands_tx,
            store,
            status: status_rx,
        })
    }

    /// Stop polling. Cancels the pending cycle, if any.
    ///
    /// Idempotent. A request already in flight is left to finish, and its
    /// result is discarded.
    pub async fn deactivate(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self
            .commands
            .send(PollCommand::Deactivate(Some(ack_tx)))
            .is_ok()
        {
            // Loop already gone if the ack sender is dropped unanswered.
            let _ = ack_rx.await;
        }
    }

    /// Run a cycle now instead of waiting for the pending one.
    ///
    /// Ignored while a request is in flight or after deactivation.
    pub fn refresh(&self) {
        let _ = self
            .commands
            .send(PollCommand::RunCycle(CycleTrigger::Manual));
    }

    pub fn store(&self) -> &DisplayListStore {
        &self.store
    }

    /// Current card list.
    pub fn cards(&self) -> DisplayList {
        self.store.current()
    }

    /// Receiver that wakes on every store replace.
    pub fn subscribe_cards(&self) -> watch::Receiver<DisplayList> {
        self.store.subscribe()
    }

    pub fn status(&self) -> PollStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<PollStatus> {
        self.status.clone()
    }

    pub fn is_active(&self) -> bool {
        self.status.borrow().active
    }
}

impl Drop for PollController {
    fn drop(&mut self) {
        let _ = self.commands.send(PollCommand::Deactivate(None));
    }
}

impl std::fmt::Debug for PollController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollController")
            .field("status", &*self.status.borrow())
            .field("cards", &self.store.len())
            .finish()
    }
}

/// State owned by the controller task.
struct PollLoop<F: Fetcher> {
    endpoint: Option<String>,
    fetcher: Arc<F>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    store: DisplayListStore,
    backoff: Backoff,
    pending_timer: Option<(u64, TimerHandle)>,
    next_timer_id: u64,
    is_active: bool,
    in_flight: bool,
    consecutive_failures: u32,
    cycles: u64,
    last_success_at: Option<DateTime<Utc>>,
    last_failure: Option<PollFailure>,
    commands: mpsc::UnboundedSender<PollCommand>,
    status: watch::Sender<PollStatus>,
}

impl<F: Fetcher> PollLoop<F> {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<PollCommand>) {
        // Keep draining after teardown until the in-flight request reports back.
        while self.is_active || self.in_flight {
            let Some(command) = commands.recv().await else {
                break;
            };
            match command {
                PollCommand::RunCycle(trigger) => self.run_cycle(trigger),
                PollCommand::FetchCompleted { endpoint, result } => {
                    self.complete_cycle(&endpoint, result)
                }
                PollCommand::Deactivate(ack) => {
                    self.teardown();
                    if let Some(ack) = ack {
                        let _ = ack.send(());
                    }
                }
            }
        }
        self.teardown();
        debug!(event = "core.poll.loop_exited", cycles = self.cycles);
    }

    fn run_cycle(&mut self, trigger: CycleTrigger) {
        if let CycleTrigger::Timer(id) = trigger
            && self.pending_timer.as_ref().map(|(pending, _)| *pending) != Some(id)
        {
            debug!(event = "core.poll.cycle_skipped", reason = "stale_timer", timer_id = id);
            return;
        }

        self.cancel_timer();

        if !self.is_active {
            debug!(event = "core.poll.cycle_skipped", reason = "inactive");
            self.publish();
            return;
        }
        let Some(endpoint) = self.endpoint.clone() else {
            debug!(event = "core.poll.cycle_skipped", reason = "no_endpoint");
            self.publish();
            return;
        };
        if self.in_flight {
            debug!(event = "core.poll.cycle_skipped", reason = "in_flight");
            self.publish();
            return;
        }

        self.in_flight = true;
        self.cycles += 1;
        debug!(
            event = "core.poll.cycle_started",
            endpoint = %endpoint,
            cycle = self.cycles,
            trigger = ?trigger,
        );

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.commands.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&endpoint).await;
            let _ = tx.send(PollCommand::FetchCompleted { endpoint, result });
        });

        self.publish();
    }

    fn complete_cycle(&mut self, endpoint: &str, result: Result<FetchResponse, FetchError>) {
        self.in_flight = false;

        if !self.is_active {
            debug!(event = "core.poll.result_discarded", endpoint = endpoint);
            self.publish();
            return;
        }

        match evaluate(endpoint, result) {
            Ok(items) => {
                info!(
                    event = "core.poll.fetch_completed",
                    endpoint = endpoint,
                    count = items.len()
                );
                self.store.replace(items);
                self.backoff.reset();
                self.consecutive_failures = 0;
                self.last_success_at = Some(Utc::now());
                self.last_failure = None;
            }
            Err(failure) => {
                self.diagnostics.report(&failure);
                let next = self.backoff.grow();
                self.consecutive_failures += 1;
                debug!(
                    event = "core.poll.backoff_grown",
                    interval_ms = duration_millis(next),
                    consecutive_failures = self.consecutive_failures,
                );
                self.last_failure = Some(failure);
            }
        }

        self.reschedule();
    }

    fn reschedule(&mut self) {
        self.cancel_timer();
        if !self.is_active {
            return;
        }

        let delay = self.backoff.current();
        self.next_timer_id += 1;
        let id = self.next_timer_id;
        let handle = timer::schedule_after(
            delay,
            self.commands.clone(),
            PollCommand::RunCycle(CycleTrigger::Timer(id)),
        );
        self.pending_timer = Some((id, handle));

        debug!(
            event = "core.poll.cycle_scheduled",
            delay_ms = duration_millis(delay),
            timer_id = id
        );
        self.publish();
    }

    fn cancel_timer(&mut self) {
        if let Some((id, handle)) = self.pending_timer.take() {
            handle.cancel();
            debug!(event = "core.poll.timer_cancelled", timer_id = id);
        }
    }

    fn teardown(&mut self) {
        self.cancel_timer();
        if self.is_active {
            self.is_active = false;
            info!(
                event = "core.poll.deactivated",
                cycles = self.cycles,
                in_flight = self.in_flight
            );
        }
        self.publish();
    }

    fn publish(&self) {
        self.status.send_replace(PollStatus {
            active: self.is_active,
            interval: self.backoff.current(),
            timer_pending: self.pending_timer.is_some(),
            next_cycle_at: self.pending_timer.as_ref().map(|(_, handle)| handle.due()),
            in_flight: self.in_flight,
            consecutive_failures: self.consecutive_failures,
            cycles: self.cycles,
            last_success_at: self.last_success_at,
            last_failure: self.last_failure.clone(),
        });
    }
}

/// Classify a fetch outcome: the new card list, or why there is none.
fn evaluate(
    endpoint: &str,
    result: Result<FetchResponse, FetchError>,
) -> Result<Vec<CardData>, PollFailure> {
    let response = result.map_err(|e| PollFailure::Transport {
        endpoint: endpoint.to_string(),
        detail: e.to_string(),
    })?;

    if !response.is_success() {
        return Err(PollFailure::Status {
            endpoint: endpoint.to_string(),
            status: response.status,
        });
    }

    parse_payload(&response.body).map_err(|e| PollFailure::Malformed {
        endpoint: endpoint.to_string(),
        detail: e.to_string(),
    })
}
