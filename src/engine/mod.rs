//! The match engine: selection state machine and reveal resolution.

pub mod match_engine;
pub mod selection;

pub use match_engine::MatchEngine;
pub use selection::{Selection, SelectionCursor};
