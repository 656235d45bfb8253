//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Event bus implementation

use super::types::{Event, EventType, GameEvent};
use crate::error::panic_message;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    handler: EventHandler,
}

/// Event bus for publishing and subscribing to game events
///
/// Delivery is synchronous: `publish` returns after every handler registered
/// for the event's type has run, in subscription order. Handlers are invoked
/// from a snapshot taken without holding the lock, so a handler may publish,
/// subscribe, or unsubscribe (itself included) while being dispatched. A
/// panicking handler is logged and skipped; the rest still receive the event.
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<EventType, Vec<Subscription>>>>,
    next_id: Arc<AtomicU64>,
    published: Arc<AtomicU64>,
    handler_faults: Arc<AtomicU64>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            published: Arc::new(AtomicU64::new(0)),
            handler_faults: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe a handler to one event type
    pub fn subscribe<F>(&self, event_type: EventType, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        handlers.entry(event_type).or_default().push(Subscription {
            id,
            handler: Arc::new(handler),
        });
        tracing::trace!("Subscription {:?} registered for {:?}", id, event_type);
        id
    }

    /// Remove a subscription; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        for subscriptions in handlers.values_mut() {
            if let Some(index) = subscriptions.iter().position(|s| s.id == id) {
                subscriptions.remove(index);
                return true;
            }
        }
        false
    }

    /// Deliver an event to every handler subscribed to its type
    ///
    /// Returns the number of handlers that completed without panicking.
    pub fn publish(&self, event: Event) -> usize {
        let event_type = event.event_type();
        let snapshot: Vec<(SubscriptionId, EventHandler)> = {
            let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            handlers
                .get(&event_type)
                .map(|subs| {
                    subs.iter()
                        .map(|s| (s.id, Arc::clone(&s.handler)))
                        .collect()
                })
                .unwrap_or_default()
        };

        self.published.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("sim.events_published").increment(1);

        let mut delivered = 0;
        for (id, handler) in snapshot {
            match catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    self.handler_faults.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(
                        "Event handler {:?} for {:?} panicked: {}",
                        id,
                        event_type,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        delivered
    }

    /// Shorthand for publishing a payload stamped with `timestamp_ms` and `source`
    pub fn emit(&self, payload: GameEvent, timestamp_ms: f64, source: &'static str) -> usize {
        self.publish(Event::new(payload, timestamp_ms).with_source(source))
    }

    /// Drop subscriptions for one event type, or all of them
    pub fn clear(&self, event_type: Option<EventType>) {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        match event_type {
            Some(event_type) => {
                handlers.remove(&event_type);
            }
            None => handlers.clear(),
        }
    }

    /// Number of handlers subscribed to an event type
    pub fn subscriber_count(&self, event_type: EventType) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.get(&event_type).map(Vec::len).unwrap_or(0)
    }

    /// Total events published through this bus and its clones
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Total handler panics caught during dispatch
    pub fn handler_fault_count(&self) -> u64 {
        self.handler_faults.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            next_id: Arc::clone(&self.next_id),
            published: Arc::clone(&self.published),
            handler_faults: Arc::clone(&self.handler_faults),
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("published", &self.published_count())
            .field("handler_faults", &self.handler_fault_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn custom(data: &str) -> Event {
        Event::new(
            GameEvent::Custom {
                event_type: "test".into(),
                data: data.into(),
            },
            0.0,
        )
    }

    #[test]
    fn test_event_bus() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        bus.subscribe(EventType::Custom, move |_event| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(bus.publish(custom("data")), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(bus.published_count(), 1);
    }

    #[test]
    fn test_handlers_only_receive_their_type() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        bus.subscribe(EventType::EntityDied, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(bus.publish(custom("ignored")), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_multiple_handlers_run_in_subscription_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..3 {
            let order = Arc::clone(&order);
            bus.subscribe(EventType::Custom, move |_| {
                order.lock().unwrap().push(n);
            });
        }

        bus.publish(custom("data"));
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        let id = bus.subscribe(EventType::Custom, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(custom("data"));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count(EventType::Custom), 0);
    }

    #[test]
    fn test_handler_can_unsubscribe_itself_during_dispatch() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let own_id: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let bus_clone = bus.clone();
        let c = Arc::clone(&counter);
        let slot = Arc::clone(&own_id);
        let id = bus.subscribe(EventType::Custom, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *slot.lock().unwrap() {
                bus_clone.unsubscribe(id);
            }
        });
        *own_id.lock().unwrap() = Some(id);

        let later = Arc::new(AtomicUsize::new(0));
        let l = Arc::clone(&later);
        bus.subscribe(EventType::Custom, move |_| {
            l.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(bus.publish(custom("first")), 2);
        assert_eq!(bus.publish(custom("second")), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(later.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handler_subscribed_during_dispatch_waits_for_next_publish() {
        let bus = EventBus::new();
        let added = Arc::new(AtomicUsize::new(0));
        let subscribed = Arc::new(AtomicUsize::new(0));

        let bus_clone = bus.clone();
        let a = Arc::clone(&added);
        let s = Arc::clone(&subscribed);
        bus.subscribe(EventType::Custom, move |_| {
            if s.fetch_add(1, Ordering::SeqCst) == 0 {
                let a = Arc::clone(&a);
                bus_clone.subscribe(EventType::Custom, move |_| {
                    a.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        assert_eq!(bus.publish(custom("first")), 1);
        assert_eq!(added.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count(EventType::Custom), 2);

        assert_eq!(bus.publish(custom("second")), 2);
        assert_eq!(added.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_can_publish_during_dispatch() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let bus_clone = bus.clone();
        bus.subscribe(EventType::Custom, move |event| {
            if let GameEvent::Custom { data, .. } = &event.payload {
                if data == "outer" {
                    bus_clone.publish(custom("inner"));
                }
            }
        });
        let s = Arc::clone(&seen);
        bus.subscribe(EventType::Custom, move |event| {
            if let GameEvent::Custom { data, .. } = &event.payload {
                s.lock().unwrap().push(data.clone());
            }
        });

        bus.publish(custom("outer"));
        assert_eq!(*seen.lock().unwrap(), vec!["inner", "outer"]);
    }

    #[test]
    fn test_panicking_handler_does_not_stop_delivery() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);

        bus.subscribe(EventType::Custom, |_| panic!("handler failure"));
        bus.subscribe(EventType::Custom, move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(bus.publish(custom("data")), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(bus.handler_fault_count(), 1);
    }

    #[test]
    fn test_clear() {
        let bus = EventBus::new();
        bus.subscribe(EventType::Custom, |_| {});
        bus.subscribe(EventType::EntityDied, |_| {});

        bus.clear(Some(EventType::Custom));
        assert_eq!(bus.subscriber_count(EventType::Custom), 0);
        assert_eq!(bus.subscriber_count(EventType::EntityDied), 1);

        bus.clear(None);
        assert_eq!(bus.subscriber_count(EventType::EntityDied), 0);
    }
}
