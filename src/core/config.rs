//! Round configuration.
//!
//! A `RoundConfig` fully describes one round: which symbols get paired onto
//! the board, the grid shape, the countdown limit, the deferred
//! match-resolution delay, and what happens when the last pair is cleared.
//!
//! Configs are validated before a board is dealt; a misconfigured round
//! refuses to start rather than dealing a corrupt board.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

use super::slot::SymbolId;

/// Reference countdown limit, in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30;

/// Reference delay between the second reveal of a matching pair and the
/// `Match` event, in milliseconds. Lets the renderer show the second face
/// before the pair disappears.
pub const DEFAULT_MATCH_DELAY_MS: u64 = 250;

/// What happens when every pair on the board has been matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionPolicy {
    /// Deal a fresh board and keep playing; the round timer keeps counting
    /// and only its expiry ends the session.
    #[default]
    Redeal,
    /// The round ends: the session stops the timer, which emits its single
    /// `TimeUp`.
    EndRound,
}

/// Complete configuration for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Distinct face values; each is dealt onto exactly two slots.
    pub symbols: Vec<SymbolId>,

    /// Grid rows.
    pub rows: usize,

    /// Grid columns.
    pub columns: usize,

    /// Countdown limit in seconds.
    pub time_limit_secs: u32,

    /// Deferred match-resolution delay in milliseconds.
    pub match_delay_ms: u64,

    /// Board-cleared policy.
    pub completion: CompletionPolicy,

    /// Seed for the deal RNG. Same seed, same deal.
    pub seed: u64,
}

impl Default for RoundConfig {
    /// The reference setup: 5 symbols on a 2x5 board, 30 second limit.
    fn default() -> Self {
        Self {
            symbols: (0..5).map(SymbolId::new).collect(),
            rows: 2,
            columns: 5,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            match_delay_ms: DEFAULT_MATCH_DELAY_MS,
            completion: CompletionPolicy::default(),
            seed: 0,
        }
    }
}

impl RoundConfig {
    /// Create a config for the given symbols and grid shape, reference
    /// timing, default completion policy.
    pub fn new(symbols: Vec<SymbolId>, rows: usize, columns: usize) -> Self {
        Self { symbols, rows, columns, ..Self::default() }
    }

    /// Set the countdown limit.
    #[must_use]
    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Set the deferred match-resolution delay.
    #[must_use]
    pub fn with_match_delay(mut self, ms: u64) -> Self {
        self.match_delay_ms = ms;
        self
    }

    /// Set the board-cleared policy.
    #[must_use]
    pub fn with_completion(mut self, policy: CompletionPolicy) -> Self {
        self.completion = policy;
        self
    }

    /// Set the deal seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Total slots on the grid.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Check that this config can produce a valid board.
    ///
    /// Rejected configs: empty symbol set, odd slot count, a grid that does
    /// not hold exactly two of each symbol, duplicate symbols, a grid too
    /// large to address, a zero time limit.
    pub fn validate(&self) -> GameResult<()> {
        if self.symbols.is_empty() {
            return Err(GameError::configuration("symbol set is empty"));
        }
        let slot_count = self.slot_count();
        if slot_count % 2 != 0 {
            return Err(GameError::configuration(format!(
                "{}x{} grid has an odd number of slots",
                self.rows, self.columns
            )));
        }
        if slot_count != 2 * self.symbols.len() {
            return Err(GameError::configuration(format!(
                "{} symbols cannot pair onto {} slots",
                self.symbols.len(),
                slot_count
            )));
        }
        if slot_count > u8::MAX as usize + 1 {
            return Err(GameError::configuration("grid exceeds the addressable slot range"));
        }
        let mut seen = self.symbols.clone();
        seen.sort_unstable();
        if seen.windows(2).any(|w| w[0] == w[1]) {
            return Err(GameError::configuration("symbol set contains duplicates"));
        }
        if self.time_limit_secs == 0 {
            return Err(GameError::configuration("time limit must be at least one second"));
        }
        Ok(())
    }
}
