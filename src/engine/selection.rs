//! The in-progress turn: which slots are revealed and unresolved.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::SlotIndex;

/// Where the per-turn selection cursor stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionCursor {
    /// Nothing revealed; the next selection starts a turn.
    Idle,
    /// One slot revealed, waiting for its partner.
    OneRevealed,
    /// Two slots revealed; the outcome is being judged. Either a match is
    /// pending its resolution delay, or a mismatch is showing until the
    /// next selection resets it.
    Resolving,
}

/// Ordered sequence of at most two revealed, unresolved slots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    slots: SmallVec<[SlotIndex; 2]>,
}

impl Selection {
    /// Empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selected slots (0..=2).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Is nothing selected?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Is this slot already part of the selection?
    #[must_use]
    pub fn contains(&self, slot: SlotIndex) -> bool {
        self.slots.contains(&slot)
    }

    /// The selected slots in selection order.
    #[must_use]
    pub fn slots(&self) -> &[SlotIndex] {
        &self.slots
    }

    /// The first and second selected slots, once both are set.
    #[must_use]
    pub fn pair(&self) -> Option<(SlotIndex, SlotIndex)> {
        match self.slots.as_slice() {
            &[first, second] => Some((first, second)),
            _ => None,
        }
    }

    /// Add a slot. Panics in debug builds past two; the engine's state
    /// machine never pushes a third.
    pub fn push(&mut self, slot: SlotIndex) {
        debug_assert!(self.slots.len() < 2, "selection can hold at most two slots");
        self.slots.push(slot);
    }

    /// Drop all selected slots.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
