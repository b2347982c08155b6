//! The notification bus: one broadcast channel per operation kind.
//!
//! Each channel is an ordered list of subscriber callbacks keyed by a
//! [`SubscriptionId`]. Broadcasting calls every subscriber once, oldest
//! subscription first. Callbacks only receive a shared reference to the
//! event, so they can't reach back into the orchestrator mid-broadcast.

use std::collections::BTreeMap;
use std::fmt;

use lobbyforge_protocol::{JoinResult, SessionSearchResult};

/// Handle returned by [`EventChannel::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Callback<E> = Box<dyn Fn(&E) + Send>;

/// A fan-out channel for one event type.
pub struct EventChannel<E> {
    next_id: u64,
    subscribers: BTreeMap<SubscriptionId, Callback<E>>,
}

impl<E> EventChannel<E> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            subscribers: BTreeMap::new(),
        }
    }

    /// Adds a subscriber. Ids are never reused within a channel.
    pub fn subscribe(&mut self, callback: impl Fn(&E) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.insert(id, Box::new(callback));
        id
    }

    /// Removes a subscriber. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    /// Calls every subscriber with `event`. Returns how many were called.
    pub fn broadcast(&self, event: &E) -> usize {
        for callback in self.subscribers.values() {
            callback(event);
        }
        self.subscribers.len()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A create request finished. `false` also means "not created yet" when
/// an existing session is being torn down first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateComplete {
    pub success: bool,
}

/// A search finished. `results` is the provider's complete result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindComplete {
    pub results: Vec<SessionSearchResult>,
    pub success: bool,
}

/// A join attempt finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinComplete {
    /// Whatever connect address the provider resolved for the session,
    /// whether or not the join succeeded. Empty when nothing resolved, which
    /// never happens alongside [`JoinResult::Success`].
    pub address: String,
    pub result: JoinResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyComplete {
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartComplete {
    pub success: bool,
}

/// The five completion channels the orchestrator publishes on.
#[derive(Debug, Default)]
pub struct NotificationBus {
    pub on_create_complete: EventChannel<CreateComplete>,
    pub on_find_complete: EventChannel<FindComplete>,
    pub on_join_complete: EventChannel<JoinComplete>,
    pub on_destroy_complete: EventChannel<DestroyComplete>,
    pub on_start_complete: EventChannel<StartComplete>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total subscriptions across all channels.
    pub fn subscriber_count(&self) -> usize {
        self.on_create_complete.len()
            + self.on_find_complete.len()
            + self.on_join_complete.len()
            + self.on_destroy_complete.len()
            + self.on_start_complete.len()
    }
}
