//! Event protocol between the engine, the timer, and a renderer.

pub mod bus;
pub mod event;

pub use bus::{EventBus, Handler};
pub use event::{EventKind, GameEvent};
