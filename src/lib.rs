//! # match-pairs
//!
//! A timed card-matching (memory) game engine, fully decoupled from
//! rendering.
//!
//! A deck of paired symbols is dealt face-down onto a fixed grid; the
//! player reveals two slots per turn; matching pairs are removed and
//! scored; the round ends on timeout or, policy permitting, redeals when
//! the board is cleared. The crate owns the logical game state only -
//! renderers and input adapters sit on the other side of a typed event
//! bus.
//!
//! ## Design Principles
//!
//! 1. **Events at the boundary**: the engine exposes logical slot
//!    identities and emits `Reveal`/`Conceal`/`Match`/... events; it never
//!    touches a sprite, and nothing on the renderer side mutates engine
//!    state.
//!
//! 2. **No globals**: the `EventBus` is a plain value constructed by the
//!    session and injected by `Rc` into everything that emits.
//!
//! 3. **Deterministic**: all shuffle randomness flows through a seeded
//!    `GameRng`; deferred match resolution runs on a logical clock the
//!    embedder advances. Same seed and same inputs, same round.
//!
//! ## Modules
//!
//! - `core`: slots, symbols, the board, configuration, RNG
//! - `deck`: paired-symbol deck generation
//! - `events`: typed events and the synchronous pub/sub bus
//! - `engine`: the match engine (selection state machine, scoring)
//! - `timer`: the round countdown
//! - `session`: session controller wiring it all together
//!
//! ## Quick Start
//!
//! ```
//! use match_pairs::{EventKind, GameSession, RoundConfig, SlotIndex};
//!
//! let session = GameSession::new();
//! session.bus().subscribe(EventKind::Match, |event| {
//!     println!("matched: {:?}", event);
//! });
//!
//! session.start_round(RoundConfig::default().with_seed(42)).unwrap();
//! session.select_slot(SlotIndex::new(0)).unwrap();
//! session.select_slot(SlotIndex::new(5)).unwrap();
//! session.advance(250).unwrap(); // fires a pending match, if any
//! session.tick();                // one second off the countdown
//! ```

pub mod core;
pub mod deck;
pub mod engine;
pub mod error;
pub mod events;
pub mod session;
pub mod timer;

// Re-export commonly used types
pub use crate::core::{
    Board, CompletionPolicy, GameRng, GameRngState, RoundConfig, Slot, SlotIndex, SlotPosition,
    SymbolId, DEFAULT_MATCH_DELAY_MS, DEFAULT_TIME_LIMIT_SECS,
};
pub use crate::engine::{MatchEngine, Selection, SelectionCursor};
pub use crate::error::{GameError, GameResult};
pub use crate::events::{EventBus, EventKind, GameEvent, Handler};
pub use crate::session::GameSession;
pub use crate::timer::RoundTimer;
