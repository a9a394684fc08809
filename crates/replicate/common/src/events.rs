//! Event subscription/fan-out, shared by the server and client engines.
//!
//! Translated from the original source's `EventList<K, V>` (a mutex-
//! guarded map from event kind to a list of callbacks) into an idiomatic
//! shape: subscribers are boxed closures, keyed by an arbitrary `K`
//! (typically an event-kind enum), called synchronously under the lock —
//! matching source semantics. Handlers must not re-enter the same
//! `EventList`.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

/// A subscribable, callable event list keyed by `K`, invoking subscribers
/// with a `&A` payload.
pub struct EventList<K, A: ?Sized> {
    subscribers: Mutex<HashMap<K, Vec<Box<dyn Fn(&A) + Send + Sync>>>>,
}

impl<K, A: ?Sized> Default for EventList<K, A> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash, A: ?Sized> EventList<K, A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, event: K, callback: impl Fn(&A) + Send + Sync + 'static) {
        self.subscribers
            .lock()
            .unwrap()
            .entry(event)
            .or_default()
            .push(Box::new(callback));
    }

    /// Invokes every subscriber registered for `event` with `payload`,
    /// under the list's lock, matching the source's `Call` semantics.
    pub fn call(&self, event: K, payload: &A) {
        let subscribers = self.subscribers.lock().unwrap();
        if let Some(callbacks) = subscribers.get(&event) {
            for cb in callbacks {
                cb(payload);
            }
        }
    }

    pub fn clear(&self, event: &K) {
        self.subscribers.lock().unwrap().remove(event);
    }
}

#[cfg(test)]
mod test_events {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[derive(PartialEq, Eq, Hash)]
    enum Kind {
        Added,
    }

    #[test]
    fn call_invokes_every_subscriber() {
        let list: EventList<Kind, i32> = EventList::new();
        let total = Arc::new(AtomicI32::new(0));

        let t1 = total.clone();
        list.subscribe(Kind::Added, move |payload| {
            t1.fetch_add(*payload, Ordering::SeqCst);
        });
        let t2 = total.clone();
        list.subscribe(Kind::Added, move |payload| {
            t2.fetch_add(*payload * 10, Ordering::SeqCst);
        });

        list.call(Kind::Added, &3);
        assert_eq!(total.load(Ordering::SeqCst), 33);
    }

    #[test]
    fn call_with_no_subscribers_is_a_no_op() {
        let list: EventList<Kind, i32> = EventList::new();
        list.call(Kind::Added, &1); // must not panic
    }
}
