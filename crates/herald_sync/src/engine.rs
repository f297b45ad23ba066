//! Sync run state machine.

use crate::config::SyncConfig;
use crate::dedupe;
use crate::error::{SyncError, SyncResult, TargetError};
use crate::filter;
use crate::source::ItemSource;
use crate::target::Publisher;
use herald_protocol::{Item, ItemFailure, PostReceipt, PublishedRecord, RunSummary};
use herald_store::StateStore;
use parking_lot::RwLock;

/// The current state of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run in progress.
    Idle,
    /// Fetching candidate pages from the source.
    Fetching,
    /// Selecting released items.
    Filtering,
    /// Dropping already-published items.
    Deduping,
    /// Publishing an item to the target.
    Publishing,
    /// Recording a confirmed publish in the state store.
    Recording,
    /// Assembling the run summary.
    Reporting,
    /// The last run completed.
    Completed,
    /// The last run failed.
    Failed,
}

impl RunState {
    /// Returns true if a run is actively progressing.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            RunState::Fetching
                | RunState::Filtering
                | RunState::Deduping
                | RunState::Publishing
                | RunState::Recording
                | RunState::Reporting
        )
    }

    /// Returns true if a new run can start.
    pub fn can_start_run(&self) -> bool {
        matches!(self, RunState::Idle | RunState::Completed | RunState::Failed)
    }
}

/// Statistics across the engine's lifetime.
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    /// Total number of completed runs.
    pub runs_completed: u64,
    /// Total number of items published.
    pub items_published: u64,
    /// Total number of publish retries.
    pub retries: u64,
    /// Last run-level error message.
    pub last_error: Option<String>,
}

/// What a run would do, without doing it.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Items fetched from the source, across all pages.
    pub fetched: usize,
    /// Items whose status matched the released label.
    pub released: usize,
    /// Items dropped by dedup.
    pub skipped: usize,
    /// Items that would be published, in order.
    pub pending: Vec<Item>,
}

/// The sync engine drives one source-to-target pipeline.
///
/// A run is sequential and single-threaded: one fetch pass, then in-order
/// publishing, one item at a time. Each confirmed publish is recorded and
/// persisted before the run advances, so a crash mid-run never loses
/// confirmed publications.
pub struct SyncEngine<S: ItemSource, P: Publisher, T: StateStore> {
    config: SyncConfig,
    source: S,
    publisher: P,
    store: T,
    state: RwLock<RunState>,
    stats: RwLock<EngineStats>,
}

impl<S: ItemSource, P: Publisher, T: StateStore> SyncEngine<S, P, T> {
    /// Creates a new sync engine.
    pub fn new(config: SyncConfig, source: S, publisher: P, store: T) -> Self {
        Self {
            config,
            source,
            publisher,
            store,
            state: RwLock::new(RunState::Idle),
            stats: RwLock::new(EngineStats::default()),
        }
    }

    /// Gets the current state.
    pub fn state(&self) -> RunState {
        *self.state.read()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> EngineStats {
        self.stats.read().clone()
    }

    /// Returns the state store backing this engine.
    pub fn store(&self) -> &T {
        &self.store
    }

    /// Returns the publisher backing this engine.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    fn set_state(&self, state: RunState) {
        *self.state.write() = state;
    }

    /// Performs a full run: fetch → filter → dedupe → publish → record.
    ///
    /// Per-item publish failures are collected in the summary; run-level
    /// failures (source, state store) abort with an error, retaining
    /// whatever was already recorded.
    pub fn run(&self) -> SyncResult<RunSummary> {
        if !self.state().can_start_run() {
            return Err(SyncError::InvalidStateTransition {
                from: format!("{:?}", self.state()),
                to: "run".into(),
            });
        }

        match self.run_inner() {
            Ok(summary) => {
                self.set_state(RunState::Completed);
                let mut stats = self.stats.write();
                stats.runs_completed += 1;
                stats.items_published += summary.published as u64;
                stats.last_error = None;
                Ok(summary)
            }
            Err(err) => {
                self.set_state(RunState::Failed);
                self.stats.write().last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Computes what a run would publish, without publishing or recording.
    pub fn plan(&self) -> SyncResult<RunPlan> {
        if !self.state().can_start_run() {
            return Err(SyncError::InvalidStateTransition {
                from: format!("{:?}", self.state()),
                to: "plan".into(),
            });
        }

        let result = self.collect_pending();
        match &result {
            Ok(_) => self.set_state(RunState::Completed),
            Err(_) => self.set_state(RunState::Failed),
        }
        result
    }

    /// Fetch, filter, and dedupe phases shared by `run` and `plan`.
    fn collect_pending(&self) -> SyncResult<RunPlan> {
        self.set_state(RunState::Fetching);
        let mut fetched = Vec::new();
        for item in self.source.items() {
            fetched.push(item?);
        }
        let fetched_count = fetched.len();
        tracing::debug!(fetched = fetched_count, "fetched candidate items");

        self.set_state(RunState::Filtering);
        let released = filter::select_released(fetched, &self.config.released_label);
        let released_count = released.len();

        self.set_state(RunState::Deduping);
        let (pending, skipped) = dedupe::dedupe(released, &self.store);

        Ok(RunPlan {
            fetched: fetched_count,
            released: released_count,
            skipped,
            pending,
        })
    }

    fn run_inner(&self) -> SyncResult<RunSummary> {
        let plan = self.collect_pending()?;

        let mut summary = RunSummary {
            fetched: plan.fetched,
            released: plan.released,
            published: 0,
            skipped: plan.skipped,
            failures: Vec::new(),
        };

        for item in &plan.pending {
            self.set_state(RunState::Publishing);
            match self.publish_with_retry(item) {
                Ok(receipt) => {
                    self.set_state(RunState::Recording);
                    self.store
                        .record(PublishedRecord::new(&item.id, receipt.post_id))?;
                    self.store.persist()?;
                    summary.published += 1;
                    tracing::info!(item_id = %item.id, "published item");
                }
                Err(err) => {
                    tracing::warn!(item_id = %item.id, %err, "skipping item");
                    summary.failures.push(ItemFailure::new(&item.id, err.to_string()));
                }
            }
        }

        self.set_state(RunState::Reporting);
        tracing::info!(
            fetched = summary.fetched,
            released = summary.released,
            published = summary.published,
            skipped = summary.skipped,
            failures = summary.failures.len(),
            "sync run complete"
        );

        Ok(summary)
    }

    /// Publishes one item, retrying transient failures with backoff.
    fn publish_with_retry(&self, item: &Item) -> Result<PostReceipt, TargetError> {
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let delay = retry.delay_for_attempt(attempt);
                tracing::debug!(item_id = %item.id, attempt, ?delay, "retrying publish");
                std::thread::sleep(delay);
                self.stats.write().retries += 1;
            }

            match self.publisher.publish(item) {
                Ok(receipt) => return Ok(receipt),
                Err(err) if err.is_retryable() && attempt + 1 < retry.max_attempts => {
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
