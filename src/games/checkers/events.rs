//! Session events and their subscribers.
//!
//! Handlers are called synchronously, in subscription order, after the
//! state change an event describes has been committed.

use super::position::Position;
use super::types::Color;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Something that happened to a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A piece moved from one square to another.
    MoveMade {
        /// Source square.
        from: Position,
        /// Destination square.
        to: Position,
    },
    /// The game ended; `None` means a draw.
    GameOver {
        /// Winning color, if any.
        winner: Option<Color>,
    },
    /// The turn passed to the given color.
    PlayerChanged(Color),
    /// The session was reset or replaced.
    Restarted,
    /// The first move or move query of a game happened.
    Started,
}

/// Handle returned by [`GameSession::subscribe`](super::GameSession::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Boxed event handler.
pub type EventHandler = Box<dyn FnMut(&SessionEvent) + Send>;

/// Ordered collection of event handlers.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    handlers: Vec<(SubscriptionId, EventHandler)>,
}

impl Subscribers {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler at the end of the notification order.
    pub fn add(&mut self, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        debug!(?id, total = self.handlers.len(), "Subscriber added");
        id
    }

    /// Removes a handler. Returns false if the id was not subscribed.
    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        before != self.handlers.len()
    }

    /// Number of subscribed handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Delivers an event to every handler in order.
    #[instrument(skip(self), fields(subscribers = self.handlers.len()))]
    pub fn notify(&mut self, event: SessionEvent) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(&event);
        }
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.handlers.len())
            .finish()
    }
}
