//! The logical board: a fixed grid of slots.
//!
//! The board is the authoritative card layout for one round. It knows
//! nothing about sprites or pixels; a renderer maps slot indices to visual
//! objects on its own side of the event boundary.
//!
//! Invariant established at deal time and preserved by every mutator: the
//! multiset of symbols on the board equals the configured symbol set
//! duplicated once. Matching never deletes slots - removed slots stay in
//! the grid with `removed = true` so positions remain stable for the round.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

use super::slot::{Slot, SlotIndex, SlotPosition, SymbolId};

/// Fixed-size grid of card slots for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: usize,
    columns: usize,
    slots: Vec<Slot>,
}

impl Board {
    /// Create a board from a dealt symbol sequence.
    ///
    /// The sequence is laid out row-major. Fails with
    /// `GameError::Configuration` if the sequence does not fill the grid
    /// exactly or if any symbol does not appear exactly twice.
    pub fn deal(rows: usize, columns: usize, symbols: &[SymbolId]) -> GameResult<Self> {
        if rows == 0 || columns == 0 {
            return Err(GameError::configuration("board must have at least one row and column"));
        }
        if symbols.len() != rows * columns {
            return Err(GameError::configuration(format!(
                "dealt {} symbols for a {}x{} board",
                symbols.len(),
                rows,
                columns
            )));
        }
        if symbols.len() > u8::MAX as usize + 1 {
            return Err(GameError::configuration("board exceeds the addressable slot range"));
        }

        // Pairing invariant: each symbol exactly twice.
        let mut sorted: Vec<SymbolId> = symbols.to_vec();
        sorted.sort_unstable();
        for pair in sorted.chunks(2) {
            if pair.len() != 2 || pair[0] != pair[1] {
                return Err(GameError::configuration(format!(
                    "symbol {} does not appear exactly twice",
                    pair[0]
                )));
            }
        }
        if sorted.windows(3).any(|w| w[0] == w[2]) {
            return Err(GameError::configuration("a symbol appears more than twice"));
        }

        Ok(Self {
            rows,
            columns,
            slots: symbols.iter().map(|&s| Slot::face_down(s)).collect(),
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of pairs dealt onto the board.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.slots.len() / 2
    }

    /// Look up a slot, if the index is on the board.
    #[must_use]
    pub fn slot(&self, index: SlotIndex) -> Option<&Slot> {
        self.slots.get(index.raw() as usize)
    }

    /// Look up a slot, rejecting out-of-range indices.
    pub fn checked_slot(&self, index: SlotIndex) -> GameResult<&Slot> {
        self.slot(index).ok_or(GameError::InvalidSlot {
            index: index.raw() as usize,
            slot_count: self.slots.len(),
        })
    }

    /// Flatten a (row, column) position, rejecting positions off the grid.
    pub fn index_at(&self, position: SlotPosition) -> GameResult<SlotIndex> {
        if position.row >= self.rows || position.column >= self.columns {
            return Err(GameError::InvalidSlot {
                index: position.row * self.columns + position.column,
                slot_count: self.slots.len(),
            });
        }
        Ok(position.index(self.columns))
    }

    /// The face value at a slot. Index must already be validated.
    #[must_use]
    pub fn symbol_at(&self, index: SlotIndex) -> Option<SymbolId> {
        self.slot(index).map(|s| s.symbol)
    }

    /// Turn a slot face-up.
    pub fn reveal(&mut self, index: SlotIndex) {
        if let Some(slot) = self.slots.get_mut(index.raw() as usize) {
            slot.revealed = true;
        }
    }

    /// Turn a slot face-down again (failed match).
    pub fn conceal(&mut self, index: SlotIndex) {
        if let Some(slot) = self.slots.get_mut(index.raw() as usize) {
            slot.revealed = false;
        }
    }

    /// Permanently clear a matched slot.
    pub fn remove(&mut self, index: SlotIndex) {
        if let Some(slot) = self.slots.get_mut(index.raw() as usize) {
            slot.removed = true;
            slot.revealed = false;
        }
    }

    /// Have all pairs been matched?
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.slots.iter().all(|s| s.removed)
    }

    /// Iterate slots in index order.
    pub fn slots(&self) -> impl Iterator<Item = (SlotIndex, &Slot)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| (SlotIndex::new(i as u8), s))
    }

    /// Indices of all currently revealed, in-play slots. Test/debug aid.
    #[must_use]
    pub fn revealed_indices(&self) -> Vec<SlotIndex> {
        self.slots()
            .filter(|(_, s)| s.revealed && s.in_play())
            .map(|(i, _)| i)
            .collect()
    }
}
