//! Crate error taxonomy.
//!
//! Two error classes exist:
//! - `Configuration`: a round cannot be created from the given settings.
//!   Fatal at round start; the session refuses to deal a corrupt board.
//! - `InvalidSlot`: a selection referenced a position outside the board.
//!   Recoverable; rejected with no state mutation.
//!
//! Everything else the player can do wrong (re-clicking the sole revealed
//! slot, clicking a removed slot, clicking while a match is resolving) is a
//! defined no-op, not an error.

use thiserror::Error;

/// Errors produced by round creation and slot selection.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// The round configuration cannot produce a valid board.
    #[error("invalid round configuration: {reason}")]
    Configuration {
        /// Human-readable explanation of the rejected setting.
        reason: String,
    },

    /// A selection referenced a slot outside the board.
    #[error("slot {index} out of range for a board of {slot_count} slots")]
    InvalidSlot {
        /// The offending flat slot index.
        index: usize,
        /// Number of slots on the current board.
        slot_count: usize,
    },
}

impl GameError {
    /// Build a configuration error from any displayable reason.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration { reason: reason.into() }
    }
}

/// Convenience alias used throughout the crate.
pub type GameResult<T> = Result<T, GameError>;
