//! List screens.
//!
//! A [`Screen`] owns the list state of one resource and runs its reads and
//! writes on spawned tasks. Workers never touch the state: each one sends a
//! single [`ScreenEvent`] back through the screen's channel, and the owner
//! applies it in [`Screen::handle`]. Every operation carries a
//! [`Generation`]; an outcome whose generation has been superseded is
//! dropped, so the most recently issued fetch is the one that lands.
//!
//! While a mutation is pending, filter, paging and refresh requests are
//! refused with [`PasteleriaError::Busy`] and auto-refresh ticks are skipped.
//! A successful mutation triggers exactly one refresh with the filter that is
//! current when the success is handled.

pub mod auto_refresh;
pub mod fetch;
pub mod generation;
pub mod list_state;
pub mod mutation;

pub use generation::{Generation, Tracker};
pub use list_state::{ListState, Page, RangeLabel, Reconciliation};
pub use mutation::{Mutation, MutationStep};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{PasteleriaError, Result};
use crate::gateway::Gateway;
use crate::query::{self, FilterState, SortOrder};
use crate::resource::Resource;

const CHANNEL_CAPACITY: usize = 64;

/// Message from a worker (or the ticker) to the owning task.
#[derive(Debug)]
pub enum ScreenEvent<R> {
    Fetched {
        generation: Generation,
        outcome: Result<Page<R>>,
    },
    Mutated {
        generation: Generation,
        outcome: Result<()>,
    },
    Tick,
}

/// User-facing result of handling one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A page was applied.
    Loaded {
        shown: usize,
        total: u64,
        reconciliation: Reconciliation,
    },
    /// The latest fetch failed; the previous page is still in place.
    FetchFailed { message: String, status: Option<u16> },
    /// A mutation succeeded and a refresh was issued.
    Saved { label: String, refresh: Generation },
    /// A mutation failed; nothing was refreshed.
    MutationFailed {
        label: String,
        message: String,
        status: Option<u16>,
    },
    /// An auto-refresh tick issued a fetch.
    Refreshing(Generation),
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Loaded { shown, total, .. } => write!(f, "Loaded {shown} of {total}"),
            Notice::FetchFailed { message, .. } => write!(f, "fetch failed: {message}"),
            Notice::Saved { label, .. } => f.write_str(label),
            Notice::MutationFailed { label, message, .. } => {
                write!(f, "{label} failed: {message}")
            }
            Notice::Refreshing(_) => f.write_str("Refreshing"),
        }
    }
}

pub struct Screen<R: Resource> {
    gateway: Arc<dyn Gateway>,
    state: ListState<R>,
    fetches: Tracker,
    mutations: Tracker,
    fetch_task: Option<JoinHandle<()>>,
    mutation_task: Option<JoinHandle<()>>,
    pending_label: Option<String>,
    ticker: Option<JoinHandle<()>>,
    last_error: Option<PasteleriaError>,
    tx: mpsc::Sender<ScreenEvent<R>>,
    rx: mpsc::Receiver<ScreenEvent<R>>,
}

impl<R: Resource> Screen<R> {
    pub fn new(gateway: Arc<dyn Gateway>, filter: FilterState) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        Screen {
            gateway,
            state: ListState::new(filter),
            fetches: Tracker::new(),
            mutations: Tracker::new(),
            fetch_task: None,
            mutation_task: None,
            pending_label: None,
            ticker: None,
            last_error: None,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &ListState<R> {
        &self.state
    }

    pub fn filter(&self) -> &FilterState {
        self.state.filter()
    }

    /// A fetch or mutation is outstanding.
    pub fn is_loading(&self) -> bool {
        self.fetches.is_pending() || self.mutations.is_pending()
    }

    pub fn is_mutating(&self) -> bool {
        self.mutations.is_pending()
    }

    /// Error of the most recent failed operation, cleared by the next success.
    pub fn last_error(&self) -> Option<&PasteleriaError> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<PasteleriaError> {
        self.last_error.take()
    }

    /// Fetches issued so far, including superseded ones.
    pub fn fetches_issued(&self) -> u64 {
        self.fetches.issued()
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.mutations.is_pending() {
            Err(PasteleriaError::Busy)
        } else {
            Ok(())
        }
    }

    /// Reload the current page with the current filter.
    pub fn refresh(&mut self) -> Result<Generation> {
        self.ensure_idle()?;
        Ok(self.spawn_fetch())
    }

    pub fn search(&mut self, term: &str) -> Result<Generation> {
        self.ensure_idle()?;
        self.state.set_term(term);
        Ok(self.spawn_fetch())
    }

    pub fn set_statuses<I, S>(&mut self, statuses: I) -> Result<Generation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_idle()?;
        self.state.set_statuses(statuses);
        Ok(self.spawn_fetch())
    }

    pub fn toggle_status(&mut self, status: &str) -> Result<Generation> {
        self.ensure_idle()?;
        self.state.toggle_status(status);
        Ok(self.spawn_fetch())
    }

    pub fn set_category(&mut self, category: Option<i64>) -> Result<Generation> {
        self.ensure_idle()?;
        self.state.set_category(category);
        Ok(self.spawn_fetch())
    }

    pub fn set_sort(&mut self, sort: Option<SortOrder>) -> Result<Generation> {
        self.ensure_idle()?;
        self.state.set_sort(sort);
        Ok(self.spawn_fetch())
    }

    /// Fetch the next page. `None` when already at the last page.
    pub fn next_page(&mut self) -> Result<Option<Generation>> {
        self.ensure_idle()?;
        if !self.state.next_page() {
            return Ok(None);
        }
        Ok(Some(self.spawn_fetch()))
    }

    /// Fetch the previous page. `None` when already at the first page.
    pub fn previous_page(&mut self) -> Result<Option<Generation>> {
        self.ensure_idle()?;
        if !self.state.previous_page() {
            return Ok(None);
        }
        Ok(Some(self.spawn_fetch()))
    }

    /// Fetch a zero-based page number.
    pub fn go_to_page(&mut self, page: u64) -> Result<Generation> {
        self.ensure_idle()?;
        self.state.go_to_page(page);
        Ok(self.spawn_fetch())
    }

    /// Select a record on the current page.
    pub fn select(&mut self, id: i64) -> Result<&R> {
        if !self.state.select(id) {
            return Err(PasteleriaError::NotFound(format!(
                "{} {} on this page",
                R::TABLE,
                id
            )));
        }
        self.state
            .selected()
            .ok_or_else(|| PasteleriaError::NotFound(format!("{} {}", R::TABLE, id)))
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    pub fn selected(&self) -> Option<&R> {
        self.state.selected()
    }

    /// Dispatch a validated mutation. A pending mutation is superseded.
    pub fn mutate(&mut self, mutation: Mutation) -> Generation {
        let (generation, superseded) = self.mutations.issue();
        if let Some(old) = superseded {
            tracing::debug!(%old, "superseding pending mutation");
            if let Some(task) = self.mutation_task.take() {
                task.abort();
            }
        }
        tracing::debug!(%generation, mutation = mutation.label(), "dispatching mutation");

        self.pending_label = Some(mutation.label().to_string());
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        self.mutation_task = Some(tokio::spawn(async move {
            let outcome = mutation.execute(gateway.as_ref()).await;
            let _ = tx.send(ScreenEvent::Mutated { generation, outcome }).await;
        }));
        generation
    }

    fn spawn_fetch(&mut self) -> Generation {
        let (generation, superseded) = self.fetches.issue();
        if let Some(old) = superseded {
            tracing::debug!(%old, %generation, "superseding pending fetch");
            if let Some(task) = self.fetch_task.take() {
                task.abort();
            }
        }

        let filter = self.state.filter();
        let descriptor = query::build::<R>(filter);
        let (offset, limit) = (filter.offset(), filter.limit());
        tracing::debug!(%generation, path = %descriptor, "issuing fetch");

        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        self.fetch_task = Some(tokio::spawn(async move {
            let outcome =
                fetch::fetch_page::<R>(gateway.as_ref(), &descriptor, offset, limit).await;
            let _ = tx.send(ScreenEvent::Fetched { generation, outcome }).await;
        }));
        generation
    }

    /// Apply one event. Stale outcomes and skipped ticks return `None`.
    pub fn handle(&mut self, event: ScreenEvent<R>) -> Option<Notice> {
        match event {
            ScreenEvent::Fetched {
                generation,
                outcome,
            } => {
                if !self.fetches.resolve(generation) {
                    tracing::debug!(%generation, "discarding stale fetch");
                    return None;
                }
                self.fetch_task = None;
                match outcome {
                    Ok(page) => {
                        let reconciliation = self.state.replace_page(page);
                        self.last_error = None;
                        Some(Notice::Loaded {
                            shown: self.state.visible().len(),
                            total: self.state.total(),
                            reconciliation,
                        })
                    }
                    Err(err) => {
                        tracing::warn!(%generation, error = %err, "fetch failed");
                        let notice = Notice::FetchFailed {
                            message: err.to_string(),
                            status: err.status(),
                        };
                        self.last_error = Some(err);
                        Some(notice)
                    }
                }
            }
            ScreenEvent::Mutated {
                generation,
                outcome,
            } => {
                if !self.mutations.resolve(generation) {
                    tracing::debug!(%generation, "discarding stale mutation outcome");
                    return None;
                }
                self.mutation_task = None;
                let label = self.pending_label.take().unwrap_or_default();
                match outcome {
                    Ok(()) => {
                        self.last_error = None;
                        let refresh = self.spawn_fetch();
                        Some(Notice::Saved { label, refresh })
                    }
                    Err(err) => {
                        let notice = Notice::MutationFailed {
                            label,
                            message: err.to_string(),
                            status: err.status(),
                        };
                        self.last_error = Some(err);
                        Some(notice)
                    }
                }
            }
            ScreenEvent::Tick => {
                if self.is_loading() {
                    tracing::debug!("skipping auto-refresh tick, operation in flight");
                    return None;
                }
                Some(Notice::Refreshing(self.spawn_fetch()))
            }
        }
    }

    /// Wait for the next event. `None` only if every sender is gone, which
    /// cannot happen while the screen is alive.
    pub async fn next_event(&mut self) -> Option<ScreenEvent<R>> {
        self.rx.recv().await
    }

    /// Handle events until nothing is outstanding, returning the notices.
    pub async fn settle(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while self.is_loading() {
            let Some(event) = self.rx.recv().await else {
                break;
            };
            // Ticks arriving here are irrelevant: we are about to be idle
            if matches!(event, ScreenEvent::Tick) {
                continue;
            }
            if let Some(notice) = self.handle(event) {
                notices.push(notice);
            }
        }
        notices
    }

    /// Start posting refresh ticks every `period`.
    pub fn start_auto_refresh(&mut self, period: Duration) {
        self.stop_auto_refresh();
        self.ticker = Some(auto_refresh::spawn_ticker(self.tx.clone(), period));
    }

    pub fn stop_auto_refresh(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    /// Abort outstanding work. Late results are dropped with the channel.
    pub fn close(&mut self) {
        self.stop_auto_refresh();
        for task in [self.fetch_task.take(), self.mutation_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
        self.fetches.cancel();
        self.mutations.cancel();
        self.pending_label = None;
    }
}

impl<R: Resource> Drop for Screen<R> {
    fn drop(&mut self) {
        self.close();
    }
}
