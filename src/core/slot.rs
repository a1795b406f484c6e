//! Slot and symbol identification.
//!
//! Every card position on the board is a *slot*, addressed either by a flat
//! 0-based `SlotIndex` or by a `SlotPosition` (row, column). Each slot holds
//! a `SymbolId` - the card's face value - plus two booleans tracking whether
//! the slot is currently revealed and whether it has been removed by a match.
//!
//! The engine never interprets symbol values; they are opaque identifiers.
//! A renderer assigns meaning (texture names, card art) on its side of the
//! event boundary.

use serde::{Deserialize, Serialize};

/// Identifier of a card's face value.
///
/// Exactly two slots share each value on a freshly dealt board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Create a new symbol ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Flat 0-based board position.
///
/// Slots are numbered row-major: index `row * columns + column`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotIndex(pub u8);

impl SlotIndex {
    /// Create a new slot index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the raw index value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Convert to a (row, column) position on a board with `columns` columns.
    #[must_use]
    pub const fn position(self, columns: usize) -> SlotPosition {
        SlotPosition {
            row: self.0 as usize / columns,
            column: self.0 as usize % columns,
        }
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot({})", self.0)
    }
}

/// A (row, column) board position, as an input adapter sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotPosition {
    /// 0-based row.
    pub row: usize,
    /// 0-based column.
    pub column: usize,
}

impl SlotPosition {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Flatten to a slot index on a board with `columns` columns.
    ///
    /// Does not range-check the row; the board validates on lookup.
    #[must_use]
    pub const fn index(self, columns: usize) -> SlotIndex {
        SlotIndex((self.row * columns + self.column) as u8)
    }
}

impl std::fmt::Display for SlotPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// One card position on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// The card's face value.
    pub symbol: SymbolId,

    /// Is the face currently showing?
    pub revealed: bool,

    /// Has this slot been cleared by a match? Removed slots stay in the
    /// grid (positions are fixed for the round) but accept no input.
    pub removed: bool,
}

impl Slot {
    /// Create a face-down, in-play slot.
    #[must_use]
    pub const fn face_down(symbol: SymbolId) -> Self {
        Self { symbol, revealed: false, removed: false }
    }

    /// Can this slot still take part in a selection?
    #[must_use]
    pub const fn in_play(&self) -> bool {
        !self.removed
    }
}
