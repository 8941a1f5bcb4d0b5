use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::ClientError;

use super::entry::EntryState;
use super::subscription::Subscription;

/// Boxed future produced by a [`Loader`].
pub type LoadFuture<V> = Pin<Box<dyn Future<Output = Result<V, ClientError>> + Send>>;

/// Reusable fetch function, kept by the cache for background refresh.
pub type Loader<V> = Arc<dyn Fn() -> LoadFuture<V> + Send + Sync>;

type Listener<V> = Arc<dyn Fn(&EntryState<V>) + Send + Sync>;
type Waiter<V> = oneshot::Sender<Result<V, ClientError>>;

struct Refresh<V> {
    period: Duration,
    loader: Loader<V>,
    task: Option<JoinHandle<()>>,
}

struct Slot<V> {
    state: EntryState<V>,
    waiters: Vec<Waiter<V>>,
    /// Set when the key is invalidated while a request is in flight. The
    /// response is still delivered to its waiters but never stored.
    stale: bool,
    listeners: Vec<(u64, Listener<V>)>,
    refresh: Option<Refresh<V>>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            state: EntryState::Absent,
            waiters: Vec::new(),
            stale: false,
            listeners: Vec::new(),
            refresh: None,
        }
    }
}

impl<V: Clone> Slot<V> {
    fn notification(&self) -> Notification<V> {
        Notification {
            listeners: self.listeners.iter().map(|(_, l)| Arc::clone(l)).collect(),
            state: self.state.clone(),
        }
    }
}

/// Snapshot of a transition, delivered after the lock is released.
struct Notification<V> {
    listeners: Vec<Listener<V>>,
    state: EntryState<V>,
}

impl<V> Notification<V> {
    fn deliver(self) {
        for listener in &self.listeners {
            listener(&self.state);
        }
    }
}

struct Inner<K, V> {
    slots: HashMap<K, Slot<V>>,
    next_listener_id: u64,
}

enum Plan<V> {
    Hit(V),
    Join(oneshot::Receiver<Result<V, ClientError>>),
    /// Start the request; the receiver is this caller's own waiter.
    Lead(oneshot::Receiver<Result<V, ClientError>>),
}

/// Keyed store of remote resources with request de-duplication.
///
/// At most one request per key is in flight at any time: a read that finds
/// the key loading joins the pending request instead of issuing another.
/// Ready values are served without I/O until invalidated.
///
/// Requests run on their own task, so dropping any caller (including the
/// one that started the request) never cancels it. Its outcome still
/// reaches the other waiters and the cache.
pub struct ResourceCache<K, V> {
    inner: Arc<Mutex<Inner<K, V>>>,
}

impl<K, V> Clone for ResourceCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for ResourceCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ResourceCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                slots: HashMap::new(),
                next_listener_id: 0,
            })),
        }
    }

    /// Current state of `key`. Unknown keys are absent.
    pub fn state(&self, key: &K) -> EntryState<V> {
        self.inner
            .lock()
            .slots
            .get(key)
            .map(|slot| slot.state.clone())
            .unwrap_or_default()
    }

    /// Ready value for `key`, without triggering a request.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner
            .lock()
            .slots
            .get(key)
            .and_then(|slot| slot.state.value().cloned())
    }

    /// Return the cached value, join the request in flight, or run `loader`.
    ///
    /// `loader` is only called when this caller becomes the one issuing the
    /// request. A failed load leaves the key in the error state; the next
    /// fetch retries. Must be called from within a tokio runtime.
    pub async fn fetch<F, Fut>(&self, key: K, loader: F) -> Result<V, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ClientError>> + Send + 'static,
    {
        self.load(key, loader, false).await
    }

    /// Like [`fetch`](Self::fetch) but bypasses a ready value.
    ///
    /// A request already in flight is still joined rather than duplicated.
    pub async fn refresh<F, Fut>(&self, key: K, loader: F) -> Result<V, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ClientError>> + Send + 'static,
    {
        self.load(key, loader, true).await
    }

    async fn load<F, Fut>(&self, key: K, loader: F, force: bool) -> Result<V, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ClientError>> + Send + 'static,
    {
        let receiver = match self.plan(&key, force) {
            Plan::Hit(value) => return Ok(value),
            Plan::Join(receiver) => receiver,
            Plan::Lead(receiver) => {
                let flight = InFlight {
                    cache: self.clone(),
                    key,
                    done: false,
                };
                tokio::spawn(flight.run(loader()));
                receiver
            }
        };
        receiver.await.unwrap_or_else(|_| {
            Err(ClientError::network("request ended without a result"))
        })
    }

    fn plan(&self, key: &K, force: bool) -> Plan<V> {
        let (plan, notification) = {
            let mut inner = self.inner.lock();
            let slot = inner.slots.entry(key.clone()).or_default();

            let hit = match (&slot.state, force) {
                (EntryState::Ready(value), false) => Some(value.clone()),
                _ => None,
            };

            if let Some(value) = hit {
                (Plan::Hit(value), None)
            } else if slot.state.is_loading() {
                let (tx, rx) = oneshot::channel();
                slot.waiters.push(tx);
                (Plan::Join(rx), None)
            } else {
                let (tx, rx) = oneshot::channel();
                slot.waiters.push(tx);
                slot.state = EntryState::Loading;
                slot.stale = false;
                (Plan::Lead(rx), Some(slot.notification()))
            }
        };

        match &plan {
            Plan::Hit(_) => tracing::trace!(key = ?key, "Cache hit"),
            Plan::Join(_) => tracing::trace!(key = ?key, "Joining request in flight"),
            Plan::Lead(_) => tracing::debug!(key = ?key, "Cache miss, loading"),
        }

        if let Some(notification) = notification {
            notification.deliver();
        }
        plan
    }

    fn complete(&self, key: &K, result: Result<V, ClientError>) {
        let (waiters, notification) = {
            let mut inner = self.inner.lock();
            match inner.slots.get_mut(key) {
                Some(slot) => {
                    slot.state = if slot.stale {
                        tracing::debug!(key = ?key, "Dropping response invalidated in flight");
                        EntryState::Absent
                    } else {
                        match &result {
                            Ok(value) => EntryState::Ready(value.clone()),
                            Err(err) => EntryState::Error(err.clone()),
                        }
                    };
                    slot.stale = false;
                    (std::mem::take(&mut slot.waiters), Some(slot.notification()))
                }
                None => (Vec::new(), None),
            }
        };

        if let Err(err) = &result {
            tracing::debug!(key = ?key, error = %err, "Load failed");
        }

        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
        if let Some(notification) = notification {
            notification.deliver();
        }
    }

    /// The request task ended without a result (it panicked, or the
    /// runtime shut down under it).
    fn abandon(&self, key: &K) {
        let notification = {
            let mut inner = self.inner.lock();
            let Some(slot) = inner.slots.get_mut(key) else {
                return;
            };
            if !slot.state.is_loading() {
                return;
            }
            slot.state = EntryState::Absent;
            slot.stale = false;
            // Dropping the senders fails every joined reader.
            slot.waiters.clear();
            slot.notification()
        };
        tracing::warn!(key = ?key, "Request ended without a result");
        notification.deliver();
    }

    /// Mark `key` absent so the next read refetches.
    ///
    /// A request in flight for `key` still resolves for its callers, but its
    /// response is not stored.
    pub fn invalidate(&self, key: &K) {
        let notification = {
            let mut inner = self.inner.lock();
            let Some(slot) = inner.slots.get_mut(key) else {
                return;
            };
            match slot.state {
                EntryState::Absent => None,
                EntryState::Loading => {
                    slot.stale = true;
                    None
                }
                _ => {
                    slot.state = EntryState::Absent;
                    Some(slot.notification())
                }
            }
        };

        tracing::debug!(key = ?key, "Invalidated");
        if let Some(notification) = notification {
            notification.deliver();
        }
    }

    pub fn invalidate_many(&self, keys: &[K]) {
        for key in keys {
            self.invalidate(key);
        }
    }

    /// Invalidate every key. Listeners and refresh policies are kept.
    pub fn clear(&self) {
        let keys: Vec<K> = self.inner.lock().slots.keys().cloned().collect();
        self.invalidate_many(&keys);
    }

    /// Observe state transitions of `key` until the handle is dropped.
    pub fn subscribe<F>(&self, key: K, listener: F) -> Subscription
    where
        F: Fn(&EntryState<V>) + Send + Sync + 'static,
    {
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_listener_id;
            inner.next_listener_id += 1;
            inner
                .slots
                .entry(key.clone())
                .or_default()
                .listeners
                .push((id, Arc::new(listener)));
            id
        };

        self.ensure_refresh_task(&key);

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                ResourceCache { inner }.unsubscribe(&key, id);
            }
        })
    }

    pub fn subscriber_count(&self, key: &K) -> usize {
        self.inner
            .lock()
            .slots
            .get(key)
            .map(|slot| slot.listeners.len())
            .unwrap_or(0)
    }

    fn unsubscribe(&self, key: &K, id: u64) {
        let task = {
            let mut inner = self.inner.lock();
            let Some(slot) = inner.slots.get_mut(key) else {
                return;
            };
            slot.listeners.retain(|(listener_id, _)| *listener_id != id);
            if slot.listeners.is_empty() {
                slot.refresh.as_mut().and_then(|refresh| refresh.task.take())
            } else {
                None
            }
        };

        if let Some(task) = task {
            task.abort();
            tracing::debug!(key = ?key, "Background refresh stopped");
        }
    }

    /// Refetch `key` every `period` while it has at least one subscriber.
    ///
    /// Replaces any previous policy for the key. A zero period is ignored.
    pub fn set_refresh(&self, key: K, period: Duration, loader: Loader<V>) {
        if period.is_zero() {
            tracing::warn!(key = ?key, "Ignoring zero refresh interval");
            return;
        }

        let previous = {
            let mut inner = self.inner.lock();
            let slot = inner.slots.entry(key.clone()).or_default();
            let previous = slot.refresh.take().and_then(|refresh| refresh.task);
            slot.refresh = Some(Refresh {
                period,
                loader,
                task: None,
            });
            previous
        };

        if let Some(task) = previous {
            task.abort();
        }
        self.ensure_refresh_task(&key);
    }

    fn ensure_refresh_task(&self, key: &K) {
        let mut inner = self.inner.lock();
        let Some(slot) = inner.slots.get_mut(key) else {
            return;
        };
        if slot.listeners.is_empty() {
            return;
        }
        let Some(refresh) = slot.refresh.as_mut() else {
            return;
        };
        if refresh.task.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(key = ?key, "No async runtime, background refresh disabled");
            return;
        };

        let task = refresh_loop(
            Arc::downgrade(&self.inner),
            key.clone(),
            refresh.period,
            Arc::clone(&refresh.loader),
        );
        refresh.task = Some(runtime.spawn(task));
        tracing::debug!(key = ?key, period = ?refresh.period, "Background refresh started");
    }
}

async fn refresh_loop<K, V>(
    inner: Weak<Mutex<Inner<K, V>>>,
    key: K,
    period: Duration,
    loader: Loader<V>,
) where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let Some(inner) = inner.upgrade() else {
            break;
        };
        let cache = ResourceCache { inner };
        if cache.subscriber_count(&key) == 0 {
            break;
        }

        if let Err(err) = cache.refresh(key.clone(), || loader()).await {
            tracing::debug!(key = ?key, error = %err, "Background refresh failed");
        }
    }
}

/// Owns one request for a key and settles the slot when it finishes.
///
/// If the task is torn down before the request resolves, the key returns
/// to absent so a later read can start over.
struct InFlight<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    cache: ResourceCache<K, V>,
    key: K,
    done: bool,
}

impl<K, V> InFlight<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    async fn run<Fut>(mut self, request: Fut)
    where
        Fut: Future<Output = Result<V, ClientError>>,
    {
        let result = request.await;
        self.done = true;
        self.cache.complete(&self.key, result);
    }
}

impl<K, V> Drop for InFlight<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    fn drop(&mut self) {
        if !self.done {
            self.cache.abandon(&self.key);
        }
    }
}
