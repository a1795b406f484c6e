//! Deck generation: pairing symbols onto shuffled slots.
//!
//! The generator duplicates each symbol once, then deals by repeatedly
//! drawing a uniformly random remaining element and appending it. The
//! draw-and-remove loop is O(n²) but distributionally equivalent to
//! Fisher-Yates: every permutation of the duplicated multiset is reachable
//! and equally likely. Boards are at most a few hundred slots, so the
//! quadratic cost is irrelevant.

use crate::core::{GameRng, SymbolId};
use crate::error::{GameError, GameResult};

/// Produce a shuffled assignment of paired symbols to `slot_count` slots.
///
/// Each symbol in `symbols` appears exactly twice in the output; the output
/// length equals `slot_count`, which must be `2 * symbols.len()`.
///
/// Errors with `GameError::Configuration` on an empty symbol set, an odd
/// `slot_count`, a count that does not pair the symbols exactly, or
/// duplicate entries in the symbol set.
pub fn generate(
    symbols: &[SymbolId],
    slot_count: usize,
    rng: &mut GameRng,
) -> GameResult<Vec<SymbolId>> {
    if symbols.is_empty() {
        return Err(GameError::configuration("symbol set is empty"));
    }
    if slot_count % 2 != 0 {
        return Err(GameError::configuration(format!(
            "slot count {} is odd, cannot hold pairs",
            slot_count
        )));
    }
    if slot_count != 2 * symbols.len() {
        return Err(GameError::configuration(format!(
            "{} symbols cannot pair onto {} slots",
            symbols.len(),
            slot_count
        )));
    }
    let mut distinct = symbols.to_vec();
    distinct.sort_unstable();
    if distinct.windows(2).any(|w| w[0] == w[1]) {
        return Err(GameError::configuration("symbol set contains duplicates"));
    }

    let mut pool: Vec<SymbolId> = Vec::with_capacity(slot_count);
    for &symbol in symbols {
        pool.push(symbol);
        pool.push(symbol);
    }

    let mut dealt = Vec::with_capacity(slot_count);
    while !pool.is_empty() {
        let drawn = rng.gen_index(pool.len());
        dealt.push(pool.remove(drawn));
    }

    Ok(dealt)
}
