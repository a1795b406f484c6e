//! The round countdown.
//!
//! `RoundTimer` owns `remaining_secs` exclusively; the engine never touches
//! it, and the timer never touches the board. The two coordinate through
//! events only.
//!
//! The timer has no thread and no OS clock: an embedder calls
//! [`RoundTimer::tick`] once per second (a frame loop, a tokio interval, a
//! test driving it directly). Each tick decrements the remaining time,
//! floored at zero, and emits `Tick`; reaching zero emits `TimeUp` exactly
//! once and stops. Ticks after the stop are no-ops, not errors.

use std::rc::Rc;

use crate::events::{EventBus, GameEvent};

/// One-tick-per-second countdown for a round.
pub struct RoundTimer {
    limit_secs: u32,
    remaining_secs: u32,
    /// Set once `TimeUp` has been emitted; guards the single emission.
    expired: bool,
    bus: Rc<EventBus>,
}

impl RoundTimer {
    /// Create a timer armed at `limit_secs`.
    #[must_use]
    pub fn new(limit_secs: u32, bus: Rc<EventBus>) -> Self {
        Self {
            limit_secs,
            remaining_secs: limit_secs,
            expired: false,
            bus,
        }
    }

    /// Seconds left in the round.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Has the single `TimeUp` fired?
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Advance the countdown by one second.
    ///
    /// Emits `Tick` with the new remaining time, then `TimeUp` exactly
    /// once when the countdown reaches zero. No-op after expiry.
    pub fn tick(&mut self) {
        if self.expired {
            return;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.bus.publish(&GameEvent::Tick { remaining_secs: self.remaining_secs });

        if self.remaining_secs == 0 {
            self.expire();
        }
    }

    /// Force expiry: stop ticking and emit the single `TimeUp` now.
    ///
    /// Used by the session when the board is cleared under the `EndRound`
    /// policy. Idempotent.
    pub fn expire(&mut self) {
        if self.expired {
            return;
        }
        self.expired = true;
        log::debug!("round timer expired with {}s remaining", self.remaining_secs);
        self.bus.publish(&GameEvent::TimeUp);
    }

    /// Re-arm for a new round.
    pub fn restart(&mut self, limit_secs: u32) {
        self.limit_secs = limit_secs;
        self.remaining_secs = limit_secs;
        self.expired = false;
    }
}

impl std::fmt::Debug for RoundTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundTimer")
            .field("limit_secs", &self.limit_secs)
            .field("remaining_secs", &self.remaining_secs)
            .field("expired", &self.expired)
            .finish()
    }
}
