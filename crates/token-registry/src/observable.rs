use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

/// Handle returned by [`Observable::subscribe`]; unique across all observables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

impl SubscriptionId {
    fn next() -> Self {
        Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed))
    }
}

type Listener<T> = Box<dyn FnMut(&T) + Send>;

/// A value that notifies subscribers on every commit.
///
/// Callback subscribers are invoked synchronously, in registration order, once with the
/// current value on subscribe and then once per [`Observable::set`]. Watch receivers see
/// the latest value and may skip intermediate ones.
pub struct Observable<T> {
    value: T,
    tx: watch::Sender<T>,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        let (tx, _) = watch::channel(value.clone());
        Self {
            value,
            tx,
            listeners: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Commit a new value and notify every subscriber.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.tx.send_replace(self.value.clone());
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.value);
        }
    }

    pub fn subscribe<F>(&mut self, mut listener: F) -> SubscriptionId
    where
        F: FnMut(&T) + Send + 'static,
    {
        listener(&self.value);
        let id = SubscriptionId::next();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when `id` was not registered here.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn watch(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
