//! Change notification - live updates over a pull-based store.
//!
//! Every mutating [`BudgetStore`](crate::store::BudgetStore) call publishes a
//! [`Change`] on a broadcast channel. A subscription runs its query once
//! straight away, then again whenever a change touches one of the collections
//! it watches, and hands the complete result to its callback each time.
//! An optional refresh interval re-runs the query on a fixed cadence as well,
//! which picks up writes made by other processes sharing the database file.

use crate::{entities::EntityKind, errors::Result};
use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
    time::{Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, warn};

/// Capacity of the change channel. Subscribers that fall further behind
/// than this refresh once instead of replaying every change.
pub const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// What happened to a collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// A row was inserted
    Created,
    /// A row was modified
    Updated,
    /// A row was removed
    Deleted,
    /// The collection was wiped or bulk-loaded
    Reset,
}

/// A single mutation notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Change {
    /// Collection that changed
    pub entity: EntityKind,
    /// Kind of change
    pub kind: ChangeKind,
    /// Affected row, when a single row was touched
    pub id: Option<i64>,
}

impl Change {
    /// Change to a single row.
    #[must_use]
    pub const fn row(entity: EntityKind, kind: ChangeKind, id: i64) -> Self {
        Self {
            entity,
            kind,
            id: Some(id),
        }
    }

    /// Bulk change to a whole collection.
    #[must_use]
    pub const fn reset(entity: EntityKind) -> Self {
        Self {
            entity,
            kind: ChangeKind::Reset,
            id: None,
        }
    }
}

/// Publishing side of the change channel. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<Change>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(CHANGE_CHANNEL_CAPACITY)
    }
}

impl ChangeNotifier {
    /// Creates a notifier whose channel holds up to `capacity` pending changes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a change to every current subscriber.
    pub fn publish(&self, change: Change) {
        // Err only means nobody is listening
        if let Ok(receivers) = self.sender.send(change) {
            debug!(?change, receivers, "Published change");
        }
    }

    /// Opens a raw receiver for changes published from now on.
    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<Change> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Options for [`subscribe`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Collections whose changes trigger a refresh
    pub watch: Vec<EntityKind>,
    /// Also refresh on this fixed cadence
    pub refresh_interval: Option<Duration>,
}

impl SubscribeOptions {
    /// Watch the given collections with no periodic refresh.
    #[must_use]
    pub fn watching(watch: &[EntityKind]) -> Self {
        Self {
            watch: watch.to_vec(),
            refresh_interval: None,
        }
    }

    /// Adds a periodic refresh.
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Option<Duration>) -> Self {
        self.refresh_interval = interval;
        self
    }
}

/// Handle to a running subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    handle: Option<JoinHandle<()>>,
    cancelled: Arc<AtomicBool>,
}

impl Subscription {
    /// Stops delivery. Safe to call any number of times. Once this returns
    /// the callback is not invoked again, even if a refresh was in flight.
    pub fn unsubscribe(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// True until [`Subscription::unsubscribe`] is called or the change
    /// channel closes. The channel only closes once every
    /// [`ChangeNotifier`] clone is dropped; subscriptions made through a
    /// `BudgetStore` hold one, so for them only `unsubscribe` ends it.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst)
            && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

async fn deliver<T, Q, Fut, F>(query: &Q, callback: &mut F, cancelled: &AtomicBool)
where
    Q: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
    F: FnMut(T),
{
    match query().await {
        Ok(_) if cancelled.load(Ordering::SeqCst) => {
            debug!("Subscription cancelled during refresh, dropping result");
        }
        Ok(value) => callback(value),
        Err(e) => warn!(error = %e, "Subscription query failed, skipping this refresh"),
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Runs `query` now and after every relevant change, passing each result to
/// `callback`.
///
/// The receiver is registered before this returns, so no change published
/// after `subscribe` is missed. A failing query is logged and skipped; the
/// subscription stays alive. Must be called from within a tokio runtime.
pub fn subscribe<T, Q, Fut, F>(
    notifier: &ChangeNotifier,
    options: SubscribeOptions,
    query: Q,
    mut callback: F,
) -> Subscription
where
    T: Send + 'static,
    Q: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    let mut changes = notifier.receiver();
    let SubscribeOptions {
        watch,
        refresh_interval,
    } = options;

    let cancelled = Arc::new(AtomicBool::new(false));
    let task_cancelled = Arc::clone(&cancelled);

    let handle = tokio::spawn(async move {
        deliver(&query, &mut callback, &task_cancelled).await;

        let mut ticker = refresh_interval.map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        loop {
            let refresh = tokio::select! {
                received = changes.recv() => match received {
                    Ok(change) => watch.contains(&change.entity),
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Subscriber lagged, refreshing once");
                        true
                    }
                    Err(RecvError::Closed) => break,
                },
                () = next_tick(&mut ticker) => true,
            };

            if refresh {
                deliver(&query, &mut callback, &task_cancelled).await;
            }
        }
        debug!("Change channel closed, subscription finished");
    });

    Subscription {
        handle: Some(handle),
        cancelled,
    }
}
