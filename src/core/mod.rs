//! Core engine types: slots, symbols, the board, configuration, RNG.
//!
//! This module contains the fundamental building blocks the rest of the
//! crate is assembled from. Nothing here knows about events or timing.

pub mod board;
pub mod config;
pub mod rng;
pub mod slot;

pub use board::Board;
pub use config::{
    CompletionPolicy, RoundConfig, DEFAULT_MATCH_DELAY_MS, DEFAULT_TIME_LIMIT_SECS,
};
pub use rng::{GameRng, GameRngState};
pub use slot::{Slot, SlotIndex, SlotPosition, SymbolId};
