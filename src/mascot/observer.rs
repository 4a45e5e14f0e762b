//! Observer registry — lets renderers react to position/state changes
//! without polling.
//!
//! Every registration gets its own [`SubscriptionId`]; the returned
//! [`Subscription`] removes exactly that listener when it is unsubscribed or
//! dropped. Callbacks run synchronously, in registration order, outside the
//! registry lock, so a callback may read the mascot or subscribe/unsubscribe
//! without deadlocking.

use super::decision::DecisionReason;
use super::state::{AnimationState, Position};
use super::triggers::TriggerKind;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

// ── Events ─────────────────────────────────────────────

/// Why the mascot changed state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeCause {
    /// The roaming policy picked a new action.
    Decision { reason: DecisionReason },
    /// A user interaction forced an action.
    Trigger { kind: TriggerKind },
    /// A timed action ran out and the mascot went back to idle.
    Revert,
    /// The forced nap ended.
    Wake,
}

/// Emitted on every state or position mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MascotEvent {
    /// Strictly increasing per mascot; lets renderers drop stale events.
    pub revision: u64,
    pub state: AnimationState,
    pub previous_state: AnimationState,
    pub position: Position,
    pub cause: ChangeCause,
    /// Unix timestamp in milliseconds.
    pub at_ms: i64,
}

// ── Registry ───────────────────────────────────────────

pub type ChangeCallback = Arc<dyn Fn(&MascotEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    listeners: Vec<(SubscriptionId, ChangeCallback)>,
}

impl RegistryInner {
    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}

#[derive(Clone, Default)]
pub struct ObserverRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Keep the returned handle alive for as long as
    /// the listener should receive events.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&MascotEvent) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.next_id += 1;
        let id = SubscriptionId(inner.next_id);
        let callback: ChangeCallback = Arc::new(callback);
        inner.listeners.push((id, callback));
        tracing::debug!(subscription = id.0, "listener registered");
        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every current listener, in registration order.
    pub fn notify(&self, event: &MascotEvent) {
        let listeners: Vec<ChangeCallback> = {
            let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.listeners.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for callback in listeners {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Ordered Delivery ───────────────────────────────────

/// Queue between the state lock and the listeners.
///
/// Producers `enqueue` while still holding the lock that assigned the
/// revision, so the queue is in revision order. `flush` then drains it
/// from one thread at a time; a caller that finds another thread already
/// draining returns at once and its events go out with that drain. Events
/// published from inside a listener are delivered after the current one.
#[derive(Default)]
pub struct EventOutbox {
    state: Mutex<OutboxState>,
}

#[derive(Default)]
struct OutboxState {
    queue: VecDeque<MascotEvent>,
    draining: bool,
}

impl EventOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, OutboxState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue(&self, event: MascotEvent) {
        self.lock().queue.push_back(event);
    }

    /// Deliver everything queued to `registry`, oldest first.
    pub fn flush(&self, registry: &ObserverRegistry) {
        {
            let mut state = self.lock();
            if state.draining {
                return;
            }
            state.draining = true;
        }
        let _unwind = DrainReset(self);
        loop {
            let next = {
                let mut state = self.lock();
                match state.queue.pop_front() {
                    Some(event) => event,
                    None => {
                        // Cleared under the same lock that saw the queue
                        // empty, so no enqueued event is left behind.
                        state.draining = false;
                        return;
                    }
                }
            };
            registry.notify(&next);
        }
    }

    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }
}

/// Releases the drain flag if a listener panics mid-flush.
struct DrainReset<'a>(&'a EventOutbox);

impl Drop for DrainReset<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.lock().draining = false;
        }
    }
}

/// Handle to one registered listener. Unsubscribes on drop.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<Mutex<RegistryInner>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the listener now. Returns `false` if it was already gone.
    pub fn unsubscribe(mut self) -> bool {
        self.detach_listener()
    }

    fn detach_listener(&mut self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        // Clear the weak pointer so Drop doesn't try again.
        self.registry = Weak::new();
        let removed = registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(self.id);
        if removed {
            tracing::debug!(subscription = self.id.0, "listener removed");
        }
        removed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_listener();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
