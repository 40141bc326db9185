//! The reactive cell itself: current value plus ordered subscribers
//!
//! A `Cell<T>` is the integration point between producers (pollers,
//! fetchers) and consumers (widgets, bridges). Producers call `set`;
//! consumers either read the current value with `get` or register a
//! callback with `subscribe`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identifies a subscriber registration, for later removal
///
/// Returned by `Cell::subscribe` and accepted by `Cell::unsubscribe`.
/// Ids are unique per cell and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Inner<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<(SubscriptionId, Callback<T>)>>,
    next_id: AtomicU64,
}

/// A holder of a current value that notifies subscribers on change
///
/// Cloning a `Cell` produces another handle to the same value; there is
/// no copy-on-write or snapshotting beyond the clone returned by `get`.
///
/// `set` replaces the value and then invokes every subscriber callback
/// synchronously, in registration order, with a reference to the new
/// value. Subscribers must not mutate the value in place - publishing a
/// derived value means calling `set` again.
///
/// # Example
///
/// ```rust
/// use cell_store::Cell;
///
/// let cell = Cell::new(10u8);
/// assert_eq!(cell.get(), 10);
///
/// cell.set(20);
/// assert_eq!(cell.get(), 20);
/// ```
pub struct Cell<T> {
    inner: Arc<Inner<T>>,
}

impl<T: Clone + Send + Sync + 'static> Cell<T> {
    /// Create a cell seeded with an initial value
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(initial),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Get a clone of the current value
    pub fn get(&self) -> T {
        self.inner
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current value and notify subscribers
    ///
    /// Notification is synchronous and runs in registration order. The
    /// value lock is released before callbacks run, so a callback may
    /// call `get`, `subscribe`, or `unsubscribe` on the same cell.
    pub fn set(&self, value: T) {
        {
            let mut current = self
                .inner
                .value
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *current = value.clone();
        }

        // Snapshot the subscriber list so callbacks can re-enter the cell
        let subscribers: Vec<Callback<T>> = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, f)| Arc::clone(f))
            .collect();

        for callback in subscribers {
            callback(&value);
        }
    }

    /// Register a callback invoked on every subsequent `set`
    ///
    /// The callback receives a reference to the newly published value.
    /// Returns an id that can be passed to `unsubscribe`.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscriber, returning whether it was registered
    ///
    /// After this returns, the callback is never invoked again. A `set`
    /// already notifying on another thread may still deliver one final
    /// value that was published before the removal.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() != before
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug + Clone + Send + Sync + 'static> std::fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("value", &self.get())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[test]
    fn test_get_set() {
        let cell = Cell::new(1);
        assert_eq!(cell.get(), 1);

        cell.set(2);
        assert_eq!(cell.get(), 2);
    }

    #[test]
    fn test_set_notifies_every_time() {
        let cell = Cell::new(5);
        let count = Arc::new(AtomicU64::new(0));

        let count_clone = Arc::clone(&count);
        cell.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        // Same value still notifies - no change suppression
        cell.set(5);
        cell.set(5);
        cell.set(6);
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_notification_order_is_registration_order() {
        let cell = Cell::new(0);
        let order: Arc<StdMutex<Vec<&'static str>>> = Arc::new(StdMutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            cell.subscribe(move |_| order.lock().unwrap().push(label));
        }

        cell.set(1);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe() {
        let cell = Cell::new(0);
        let count = Arc::new(AtomicU64::new(0));

        let count_clone = Arc::clone(&count);
        let id = cell.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        cell.set(1);
        assert!(cell.unsubscribe(id));
        cell.set(2);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(cell.subscriber_count(), 0);

        // Second removal is a no-op
        assert!(!cell.unsubscribe(id));
    }

    #[test]
    fn test_subscriber_can_reenter_cell() {
        let cell = Cell::new(0);
        let observed = Arc::new(AtomicU64::new(0));

        let handle = cell.clone();
        let observed_clone = Arc::clone(&observed);
        cell.subscribe(move |v: &u64| {
            // Reading back from inside the callback must not deadlock
            observed_clone.store(handle.get().max(*v), Ordering::SeqCst);
        });

        cell.set(11);
        assert_eq!(observed.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn test_subscriber_receives_new_value() {
        let cell = Cell::new(String::new());
        let last = Arc::new(StdMutex::new(String::new()));

        let last_clone = Arc::clone(&last);
        cell.subscribe(move |v: &String| {
            *last_clone.lock().unwrap() = v.clone();
        });

        cell.set("hello".to_string());
        assert_eq!(*last.lock().unwrap(), "hello");
    }
}
