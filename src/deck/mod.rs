//! Deck dealing.

pub mod generator;

pub use generator::generate;
