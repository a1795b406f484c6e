//! Synchronous publish/subscribe event bus.
//!
//! The bus decouples the engine and timer from whatever renders the game.
//! It is deliberately minimal: single-threaded, in-memory, no queue.
//! `publish` invokes every handler registered for the event's kind, in
//! registration order, depth-first - a handler may itself publish, and the
//! nested publish runs to completion before control returns.
//!
//! The bus is a plain value, constructed by the session and passed by
//! `Rc` into everything that emits. There is no process-wide instance.
//!
//! Handlers registered during a publish are not invoked for the event
//! being published; they take effect from the next publish on.
//!
//! One re-entrancy rule for embedders: a handler for an engine-emitted
//! event must not publish `SlotSelected` from inside the callback, because
//! the engine is still mid-mutation at that point.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::event::{EventKind, GameEvent};

/// A subscribed event handler.
pub type Handler = Rc<dyn Fn(&GameEvent)>;

/// Synchronous, single-threaded pub/sub registry.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<FxHashMap<EventKind, Vec<Handler>>>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind.
    ///
    /// Handlers for the same kind run in registration order.
    pub fn subscribe(&self, kind: EventKind, handler: impl Fn(&GameEvent) + 'static) {
        self.handlers
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Rc::new(handler));
    }

    /// Publish an event to all handlers registered for its kind.
    ///
    /// Dispatch is depth-first: handlers run synchronously, and any events
    /// they publish resolve before this call returns. The handler list is
    /// snapshotted up front, so subscribing from inside a handler is safe.
    pub fn publish(&self, event: &GameEvent) {
        log::trace!("publish {}", event.kind());
        let snapshot: Vec<Handler> = match self.handlers.borrow().get(&event.kind()) {
            Some(list) => list.clone(),
            None => return,
        };
        for handler in snapshot {
            handler(event);
        }
    }

    /// Number of handlers registered for a kind. Test/debug aid.
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.handlers.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Drop every registered handler (session teardown).
    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.borrow();
        f.debug_struct("EventBus")
            .field("topics", &handlers.len())
            .field("handlers", &handlers.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}
