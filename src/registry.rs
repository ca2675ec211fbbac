//! # Registry: fan-out over the live set of subscribers.
//!
//! A [`Registry`] holds the current set of [`Subscriber`](crate::Subscriber)
//! handles and forwards each dispatched payload to every one of them.
//!
//! ## What it guarantees
//! - `dispatch(payload)` returns immediately; it never waits on handler
//!   execution, only on the brief critical section around the handle list.
//! - Every subscriber registered when `dispatch` takes the lock receives the
//!   payload exactly once; a registration racing with an in-flight dispatch
//!   may or may not see it.
//! - Removal is by handle identity, so registering the same handle twice
//!   yields duplicate delivery until both entries are removed.
//!
//! ## What it does **not** guarantee
//! - No ordering across different subscribers (per-subscriber FIFO only).
//! - No delivery errors surface to the producer; handler faults stay inside
//!   the subscriber (see [`Fault`](crate::Fault)).
//!
//! Registries are plain values: construct one per process, or several
//! independent ones per test. There is no hidden global instance.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::payload::Payload;
use crate::subscriber::SubscriberRef;

/// Producer-facing entry point of the fan-out core.
///
/// Producers depend on `&dyn Publish` so an alternative transport can sit
/// underneath unchanged handler code.
pub trait Publish: Send + Sync {
    /// Hands one payload to every currently registered subscriber.
    fn publish(&self, payload: Payload);
}

/// Holds the live set of subscribers and performs fan-out.
#[derive(Default)]
pub struct Registry {
    subscribers: Mutex<Vec<SubscriberRef>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // The lock is held only for list reads/mutations, never across a handler
    // invocation, and no user code runs under it.
    fn subscribers(&self) -> MutexGuard<'_, Vec<SubscriberRef>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a subscriber handle to the active set.
    ///
    /// Purely structural: no dispatch is triggered. Registering the same
    /// handle twice is allowed and yields duplicate delivery.
    pub fn register(&self, subscriber: SubscriberRef) {
        self.subscribers().push(subscriber);
    }

    /// Removes all entries matching `subscriber` by identity.
    ///
    /// No-op if the handle was never registered.
    pub fn unregister(&self, subscriber: &SubscriberRef) {
        self.subscribers()
            .retain(|s| !Arc::ptr_eq(s, subscriber));
    }

    /// Hands `payload` to every currently registered subscriber.
    ///
    /// The payload is wrapped in a single `Arc`; each subscriber queue holds
    /// its own owning clone. Enqueueing is O(1) and non-blocking, so this
    /// returns in bounded time regardless of handler speed. No-op on an
    /// empty registry.
    pub fn dispatch(&self, payload: Payload) {
        let shared = Arc::new(payload);
        let subscribers = self.subscribers();
        for subscriber in subscribers.iter() {
            subscriber.enqueue(Arc::clone(&shared));
        }
    }

    /// Number of registered handles (duplicates counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers().len()
    }

    /// True if no subscribers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers().is_empty()
    }
}

impl Publish for Registry {
    fn publish(&self, payload: Payload) {
        self.dispatch(payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConsumeError;
    use crate::subscriber::{Consume, ConsumeFn, Subscriber};
    use std::time::Duration;
    use tokio::time::timeout;

    const TICK: Duration = Duration::from_secs(5);

    fn recorder(seen: Arc<Mutex<Vec<u64>>>) -> Arc<dyn Consume> {
        ConsumeFn::arc("recorder", move |p: Arc<Payload>| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push(p.id);
                Ok::<_, ConsumeError>(())
            }
        })
    }

    #[tokio::test]
    async fn test_fanout_reaches_all_subscribers_in_order() {
        let registry = Registry::new();

        let seen_a = Arc::new(Mutex::new(Vec::new()));
        let seen_b = Arc::new(Mutex::new(Vec::new()));
        let a = Subscriber::spawn(recorder(Arc::clone(&seen_a)));
        let b = Subscriber::spawn(recorder(Arc::clone(&seen_b)));
        registry.register(Arc::clone(&a));
        registry.register(Arc::clone(&b));

        registry.dispatch(Payload::new(1, "x"));
        registry.dispatch(Payload::new(2, "y"));

        timeout(TICK, a.shutdown()).await.unwrap();
        timeout(TICK, b.shutdown()).await.unwrap();

        assert_eq!(*seen_a.lock().unwrap(), vec![1, 2]);
        assert_eq!(*seen_b.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_unregistered_subscriber_stops_receiving() {
        let registry = Registry::new();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let a = Subscriber::spawn(recorder(Arc::clone(&seen)));
        registry.register(Arc::clone(&a));

        registry.dispatch(Payload::new(1, "x"));
        registry.unregister(&a);
        registry.dispatch(Payload::new(2, "y"));

        timeout(TICK, a.shutdown()).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_duplicate_registration_yields_duplicate_delivery() {
        let registry = Registry::new();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let a = Subscriber::spawn(recorder(Arc::clone(&seen)));
        registry.register(Arc::clone(&a));
        registry.register(Arc::clone(&a));
        assert_eq!(registry.len(), 2);

        registry.dispatch(Payload::new(1, "x"));

        // Identity-based removal drops both entries at once.
        registry.unregister(&a);
        assert!(registry.is_empty());
        registry.dispatch(Payload::new(2, "y"));

        timeout(TICK, a.shutdown()).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_unregister_of_unknown_handle_is_noop() {
        let registry = Registry::new();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let a = Subscriber::spawn(recorder(Arc::clone(&seen)));
        let stranger = Subscriber::spawn(recorder(Arc::new(Mutex::new(Vec::new()))));
        registry.register(Arc::clone(&a));

        registry.unregister(&stranger);
        assert_eq!(registry.len(), 1);

        registry.dispatch(Payload::new(1, "x"));
        timeout(TICK, a.shutdown()).await.unwrap();
        timeout(TICK, stranger.shutdown()).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_dispatch_on_empty_registry_is_noop() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        registry.dispatch(Payload::new(1, "x"));
    }

    #[tokio::test]
    async fn test_registries_are_independent() {
        let left = Registry::new();
        let right = Registry::new();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let a = Subscriber::spawn(recorder(Arc::clone(&seen)));
        left.register(Arc::clone(&a));

        right.dispatch(Payload::new(1, "x"));
        left.dispatch(Payload::new(2, "y"));

        timeout(TICK, a.shutdown()).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_publish_through_trait_object() {
        let registry = Registry::new();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let a = Subscriber::spawn(recorder(Arc::clone(&seen)));
        registry.register(Arc::clone(&a));

        let publisher: &dyn Publish = &registry;
        publisher.publish(Payload::new(7, "via trait"));

        timeout(TICK, a.shutdown()).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![7]);
    }
}
