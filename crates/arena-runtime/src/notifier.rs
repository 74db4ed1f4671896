//! Asynchronous, access-filtered event fan-out.
//!
//! # Topics
//!
//! Listeners subscribe per game name. Every league of that game publishes
//! on the same topic, and events of one topic are delivered in the order
//! they were fired. Different topics proceed independently.
//!
//! ```text
//! fire(game, event)
//!     │
//!     ▼
//! TaskChain[game] ──► deliver(event)
//!                        ├─ snapshot subscribers of `game`
//!                        ├─ for each user: Audience::may_read(user, target)?
//!                        └─ call each of the user's listeners
//!                              └─ fault ──► unsubscribe listener from every topic
//! ```
//!
//! # Delivery-Time Authorization
//!
//! Visibility is decided when an event is delivered, not when it is fired.
//! A player added to a restricted league's roster starts receiving that
//! league's events from the next delivery on, including events queued
//! before the change.

use crate::dispatch::{Dispatcher, TaskChain};
use arena_event::{ArenaEvent, ArenaListener, EventTarget};
use arena_types::{ListenerId, User};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Decides whether a user may see events about a target.
pub trait Audience: Send + Sync {
    fn may_read(&self, user: &User, target: EventTarget) -> bool;
}

type Subscribers = HashMap<User, Vec<Arc<dyn ArenaListener>>>;

#[derive(Default)]
struct Subscriptions {
    topics: HashMap<String, Subscribers>,
}

impl Subscriptions {
    fn remove_everywhere(&mut self, listener: ListenerId) -> usize {
        let mut removed = 0;
        for subscribers in self.topics.values_mut() {
            for listeners in subscribers.values_mut() {
                let before = listeners.len();
                listeners.retain(|l| l.id() != listener);
                removed += before - listeners.len();
            }
            subscribers.retain(|_, listeners| !listeners.is_empty());
        }
        removed
    }
}

struct Shared {
    audience: Arc<dyn Audience>,
    subscriptions: Mutex<Subscriptions>,
}

impl Shared {
    fn deliver(&self, topic: &str, event: &ArenaEvent) {
        let target = event.target();
        // Snapshot, then call out without the lock: listeners and the
        // audience may block or re-enter the notifier.
        let recipients: Vec<(User, Vec<Arc<dyn ArenaListener>>)> = {
            let subs = self.subscriptions.lock();
            match subs.topics.get(topic) {
                Some(subscribers) => subscribers
                    .iter()
                    .map(|(user, listeners)| (user.clone(), listeners.clone()))
                    .collect(),
                None => return,
            }
        };

        for (user, listeners) in recipients {
            if !self.audience.may_read(&user, target) {
                debug!(user = %user, target = %target, event = event.kind(), "Event withheld");
                continue;
            }
            for listener in listeners {
                if let Err(e) = event.deliver(listener.as_ref()) {
                    let id = listener.id();
                    warn!(
                        listener = %id,
                        user = %user,
                        topic,
                        error = %e,
                        "Listener failed, unsubscribing"
                    );
                    self.subscriptions.lock().remove_everywhere(id);
                }
            }
        }
    }
}

/// Per-topic ordered event fan-out.
pub struct EventNotifier {
    dispatcher: Dispatcher,
    shared: Arc<Shared>,
    chains: Mutex<HashMap<String, TaskChain>>,
}

impl EventNotifier {
    #[must_use]
    pub fn new(dispatcher: Dispatcher, audience: Arc<dyn Audience>) -> Self {
        Self {
            dispatcher,
            shared: Arc::new(Shared {
                audience,
                subscriptions: Mutex::new(Subscriptions::default()),
            }),
            chains: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribes `listener` on behalf of `user` to the `game` topic.
    ///
    /// A listener already subscribed for the same user and game is not
    /// added twice.
    pub fn add_listener(&self, game: &str, user: &User, listener: Arc<dyn ArenaListener>) {
        let id = listener.id();
        let mut subs = self.shared.subscriptions.lock();
        let listeners = subs
            .topics
            .entry(game.to_string())
            .or_default()
            .entry(user.clone())
            .or_default();
        if listeners.iter().any(|l| l.id() == id) {
            return;
        }
        listeners.push(listener);
        debug!(listener = %id, user = %user, topic = game, "Listener subscribed");
    }

    /// Unsubscribes a listener from one topic. Returns `true` if it was
    /// subscribed.
    pub fn remove_listener(&self, game: &str, listener: ListenerId) -> bool {
        let mut subs = self.shared.subscriptions.lock();
        let Some(subscribers) = subs.topics.get_mut(game) else {
            return false;
        };
        let mut removed = false;
        for listeners in subscribers.values_mut() {
            let before = listeners.len();
            listeners.retain(|l| l.id() != listener);
            removed |= listeners.len() != before;
        }
        subscribers.retain(|_, listeners| !listeners.is_empty());
        if removed {
            debug!(listener = %listener, topic = game, "Listener unsubscribed");
        }
        removed
    }

    /// Number of listeners subscribed to `game`.
    #[must_use]
    pub fn listener_count(&self, game: &str) -> usize {
        self.shared
            .subscriptions
            .lock()
            .topics
            .get(game)
            .map_or(0, |subs| subs.values().map(Vec::len).sum())
    }

    /// Queues `event` on the `game` topic.
    pub fn fire(&self, game: &str, event: ArenaEvent) {
        let chain = self
            .chains
            .lock()
            .entry(game.to_string())
            .or_insert_with(|| TaskChain::new(self.dispatcher.clone()))
            .clone();
        debug!(topic = game, event = event.kind(), target = %event.target(), "Event queued");

        let shared = Arc::clone(&self.shared);
        let topic = game.to_string();
        chain.push(move || shared.deliver(&topic, &event));
    }
}

impl std::fmt::Debug for EventNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventNotifier")
            .field("topics", &self.chains.lock().len())
            .finish_non_exhaustive()
    }
}
