//! Game event types.
//!
//! Events are the only thing that crosses the engine/renderer boundary.
//! The engine emits outcome events (`Reveal`, `Conceal`, `Match`, ...);
//! an input adapter publishes `SlotSelected`; the timer emits `Tick` and
//! `TimeUp`. Renderers subscribe by `EventKind` and react - the engine
//! never touches a sprite, and no renderer mutates engine state.

use serde::{Deserialize, Serialize};

use crate::core::{SlotIndex, SymbolId};

/// Subscription topic: the discriminant of a `GameEvent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// An input adapter selected a slot.
    SlotSelected,
    /// A slot turned face-up.
    Reveal,
    /// A slot turned face-down again.
    Conceal,
    /// Two selected slots matched and were removed.
    Match,
    /// Every pair on the board has been matched.
    RoundComplete,
    /// A fresh board was dealt.
    Dealt,
    /// The countdown advanced one second.
    Tick,
    /// The countdown expired; the round is over.
    TimeUp,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A typed game event with its payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An input adapter selected a slot (the engine's input event).
    SlotSelected {
        /// The selected board position.
        slot: SlotIndex,
    },

    /// A slot turned face-up.
    Reveal {
        /// The revealed position.
        slot: SlotIndex,
        /// The face value now showing.
        symbol: SymbolId,
    },

    /// A slot turned face-down after a failed match.
    Conceal {
        /// The concealed position.
        slot: SlotIndex,
    },

    /// Two slots matched and were removed from play.
    Match {
        /// First slot of the pair, in selection order.
        first: SlotIndex,
        /// Second slot of the pair.
        second: SlotIndex,
        /// The shared face value.
        symbol: SymbolId,
        /// Pairs solved so far this deal, including this one.
        solved_pairs: usize,
    },

    /// Every pair on the current board has been matched.
    RoundComplete,

    /// A fresh board was dealt (round start or auto-redeal).
    Dealt {
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        columns: usize,
        /// Pairs on the new board.
        pair_count: usize,
    },

    /// The countdown advanced.
    Tick {
        /// Seconds left in the round.
        remaining_secs: u32,
    },

    /// The countdown expired. Emitted exactly once per round.
    TimeUp,
}

impl GameEvent {
    /// The subscription topic this event belongs to.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::SlotSelected { .. } => EventKind::SlotSelected,
            GameEvent::Reveal { .. } => EventKind::Reveal,
            GameEvent::Conceal { .. } => EventKind::Conceal,
            GameEvent::Match { .. } => EventKind::Match,
            GameEvent::RoundComplete => EventKind::RoundComplete,
            GameEvent::Dealt { .. } => EventKind::Dealt,
            GameEvent::Tick { .. } => EventKind::Tick,
            GameEvent::TimeUp => EventKind::TimeUp,
        }
    }
}
