//! Named application events with one-shot subscriptions.
//!
//! A `OnceSubscription` receives at most one payload. Its listener is removed
//! from the bus on first delivery, and also when the subscription is dropped,
//! so an abandoned wait never leaks a listener.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tokio::sync::oneshot;

/// Error returned when a subscription ends without a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("event listener for '{event}' closed before delivery")]
pub struct SubscriptionClosed {
    pub event: String,
}

/// Source of named events.
pub trait EventBus: Send + Sync {
    /// Registers a listener that fires at most once for `event`.
    fn subscribe_once(&self, event: &str) -> OnceSubscription;
}

/// Pending one-shot listener.
///
/// Dropping it unregisters the listener.
#[derive(Debug)]
pub struct OnceSubscription {
    event: String,
    rx: oneshot::Receiver<Value>,
    _guard: Option<ListenerGuard>,
}

impl OnceSubscription {
    /// Builds a subscription from a raw receiver.
    ///
    /// Buses backed by other event systems use this; `guard` runs when the
    /// subscription is dropped.
    pub fn new(
        event: impl Into<String>,
        rx: oneshot::Receiver<Value>,
        guard: Option<ListenerGuard>,
    ) -> Self {
        Self {
            event: event.into(),
            rx,
            _guard: guard,
        }
    }

    /// Name of the event this subscription waits for.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Waits for the payload.
    ///
    /// # Errors
    /// Returns `SubscriptionClosed` if the bus dropped the listener.
    pub async fn recv(self) -> Result<Value, SubscriptionClosed> {
        let Self {
            event,
            rx,
            _guard: guard,
        } = self;
        let payload = rx.await.map_err(|_closed| SubscriptionClosed { event })?;
        drop(guard);
        Ok(payload)
    }
}

/// Runs a cleanup closure on drop.
pub struct ListenerGuard(Option<Box<dyn FnOnce() + Send>>);

impl ListenerGuard {
    pub fn new(cleanup: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(cleanup)))
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ListenerGuard")
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(cleanup) = self.0.take() {
            cleanup();
        }
    }
}

type Listeners = HashMap<String, Vec<(u64, oneshot::Sender<Value>)>>;

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    listeners: Listeners,
}

/// In-process event bus.
#[derive(Debug, Default, Clone)]
pub struct LocalEventBus {
    inner: Arc<Mutex<Registry>>,
}

impl LocalEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delivers `payload` to every pending listener of `event`.
    ///
    /// Listeners are consumed by the delivery. Returns how many received it.
    pub fn emit(&self, event: &str, payload: Value) -> usize {
        let pending = self.registry().listeners.remove(event).unwrap_or_default();
        let mut delivered = 0;
        for (_, tx) in pending {
            if tx.send(payload.clone()).is_ok() {
                delivered += 1;
            }
        }
        tracing::debug!(event, delivered, "event emitted");
        delivered
    }

    /// Number of listeners still waiting on `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry().listeners.get(event).map_or(0, Vec::len)
    }
}

impl EventBus for LocalEventBus {
    fn subscribe_once(&self, event: &str) -> OnceSubscription {
        let (tx, rx) = oneshot::channel();
        let id = {
            let mut registry = self.registry();
            let id = registry.next_id;
            registry.next_id = registry.next_id.wrapping_add(1);
            registry
                .listeners
                .entry(event.to_string())
                .or_default()
                .push((id, tx));
            id
        };

        let inner = Arc::clone(&self.inner);
        let name = event.to_string();
        let guard = ListenerGuard::new(move || {
            let mut registry = inner.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(list) = registry.listeners.get_mut(&name) {
                list.retain(|(listener_id, _)| *listener_id != id);
                if list.is_empty() {
                    registry.listeners.remove(&name);
                }
            }
        });

        OnceSubscription::new(event, rx, Some(guard))
    }
}
