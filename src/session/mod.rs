//! Session controller: wires the bus, the engine, and the timer.
//!
//! `GameSession` is the thin orchestration layer an embedder talks to. It
//! constructs the shared `EventBus`, relays `SlotSelected` input events to
//! the engine, drives both logical clocks (`advance` for the match delay,
//! `tick` for the countdown), and applies the cross-component coordination
//! the components themselves stay ignorant of:
//!
//! - on `TimeUp`, the engine is told to stop accepting input;
//! - when the board is cleared under `CompletionPolicy::EndRound`, the
//!   timer is expired so its single `TimeUp` fires.
//!
//! Subscribe renderer handlers on [`GameSession::bus`] before calling
//! [`GameSession::start_round`], or the initial `Dealt` goes unseen.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{Board, RoundConfig, SlotIndex, SlotPosition};
use crate::engine::MatchEngine;
use crate::error::{GameError, GameResult};
use crate::events::{EventBus, EventKind, GameEvent};
use crate::timer::RoundTimer;

/// One game session: a bus plus the current round's engine and timer.
pub struct GameSession {
    bus: Rc<EventBus>,
    engine: Rc<RefCell<Option<MatchEngine>>>,
    timer: Rc<RefCell<Option<RoundTimer>>>,
    config: RefCell<Option<RoundConfig>>,
    /// Deals started so far; mixed into the seed so `reset_round` shuffles
    /// differently while the whole session stays reproducible.
    deals: RefCell<u64>,
}

impl GameSession {
    /// Create a session with an empty bus and no round in progress.
    #[must_use]
    pub fn new() -> Self {
        let bus = Rc::new(EventBus::new());
        let engine: Rc<RefCell<Option<MatchEngine>>> = Rc::new(RefCell::new(None));
        let timer: Rc<RefCell<Option<RoundTimer>>> = Rc::new(RefCell::new(None));

        // Input adapters may publish SlotSelected instead of calling
        // select_slot; relay those to the engine. The engine borrow is
        // released before the timer is touched, so the handler stays safe
        // under the bus's depth-first dispatch.
        {
            let engine = Rc::clone(&engine);
            let timer = Rc::clone(&timer);
            bus.subscribe(EventKind::SlotSelected, move |event| {
                let GameEvent::SlotSelected { slot } = event else {
                    return;
                };
                {
                    let mut engine = engine.borrow_mut();
                    let Some(engine) = engine.as_mut() else {
                        log::warn!("slot selected with no round in progress");
                        return;
                    };
                    if let Err(err) = engine.select_slot(*slot) {
                        log::warn!("rejected selection: {}", err);
                        return;
                    }
                }
                Self::sync_completion(&engine, &timer);
            });
        }

        Self {
            bus,
            engine,
            timer,
            config: RefCell::new(None),
            deals: RefCell::new(0),
        }
    }

    /// The session's event bus, for renderer subscriptions and input
    /// adapters.
    #[must_use]
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// Start a round: validate the config, deal a board, arm the timer.
    ///
    /// Replaces any round in progress, discarding its pending match
    /// resolution and countdown. On a config error the previous round is
    /// left untouched.
    pub fn start_round(&self, config: RoundConfig) -> GameResult<()> {
        let deal_seed = config.seed.wrapping_add(*self.deals.borrow());
        let round = config.clone().with_seed(deal_seed);

        // Emits Dealt on success.
        let engine = MatchEngine::new(round, Rc::clone(&self.bus))?;

        *self.engine.borrow_mut() = Some(engine);
        *self.timer.borrow_mut() = Some(RoundTimer::new(config.time_limit_secs, Rc::clone(&self.bus)));
        *self.config.borrow_mut() = Some(config);
        *self.deals.borrow_mut() += 1;
        Ok(())
    }

    /// Redeal with the same configuration but a fresh shuffle, and a
    /// freshly armed timer.
    pub fn reset_round(&self) -> GameResult<()> {
        let config = self
            .config
            .borrow()
            .clone()
            .ok_or_else(|| GameError::configuration("no round has been started"))?;
        self.start_round(config)
    }

    /// Select a slot by flat index.
    ///
    /// No round in progress is a no-op; out-of-range indices are rejected
    /// with `GameError::InvalidSlot`.
    pub fn select_slot(&self, index: SlotIndex) -> GameResult<()> {
        {
            let mut engine = self.engine.borrow_mut();
            let Some(engine) = engine.as_mut() else {
                return Ok(());
            };
            engine.select_slot(index)?;
        }
        Self::sync_completion(&self.engine, &self.timer);
        Ok(())
    }

    /// Select a slot by (row, column).
    pub fn select_at(&self, row: usize, column: usize) -> GameResult<()> {
        {
            let mut engine = self.engine.borrow_mut();
            let Some(engine) = engine.as_mut() else {
                return Ok(());
            };
            engine.select_position(SlotPosition::new(row, column))?;
        }
        Self::sync_completion(&self.engine, &self.timer);
        Ok(())
    }

    /// Advance the engine's logical clock (fires a due match resolution).
    pub fn advance(&self, elapsed_ms: u64) -> GameResult<()> {
        {
            let mut engine = self.engine.borrow_mut();
            let Some(engine) = engine.as_mut() else {
                return Ok(());
            };
            engine.advance(elapsed_ms)?;
        }
        Self::sync_completion(&self.engine, &self.timer);
        Ok(())
    }

    /// Advance the countdown by one second. On expiry the engine stops
    /// accepting input.
    pub fn tick(&self) {
        let expired = {
            let mut timer = self.timer.borrow_mut();
            let Some(timer) = timer.as_mut() else {
                return;
            };
            timer.tick();
            timer.is_expired()
        };
        if expired {
            if let Some(engine) = self.engine.borrow_mut().as_mut() {
                engine.finish();
            }
        }
    }

    /// Is the current round over (timed out or ended by completion)?
    #[must_use]
    pub fn is_round_over(&self) -> bool {
        self.engine
            .borrow()
            .as_ref()
            .map_or(true, MatchEngine::is_finished)
    }

    /// Seconds left in the current round.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        self.timer.borrow().as_ref().map(RoundTimer::remaining_secs)
    }

    /// Pairs solved on the current deal.
    #[must_use]
    pub fn solved_pairs(&self) -> Option<usize> {
        self.engine.borrow().as_ref().map(MatchEngine::solved_pairs)
    }

    /// Snapshot of the current logical board, for harness assertions.
    #[must_use]
    pub fn board_snapshot(&self) -> Option<Board> {
        self.engine.borrow().as_ref().map(|e| e.board().clone())
    }

    /// Under `EndRound` the cleared board ends the round: force the
    /// timer's single `TimeUp`. Idempotent, and a no-op under `Redeal`
    /// because the engine never finishes itself there.
    fn sync_completion(
        engine: &Rc<RefCell<Option<MatchEngine>>>,
        timer: &Rc<RefCell<Option<RoundTimer>>>,
    ) {
        let finished = engine.borrow().as_ref().is_some_and(MatchEngine::is_finished);
        if finished {
            if let Some(timer) = timer.borrow_mut().as_mut() {
                timer.expire();
            }
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("round_in_progress", &self.engine.borrow().is_some())
            .field("remaining_secs", &self.remaining_secs())
            .field("solved_pairs", &self.solved_pairs())
            .finish()
    }
}
