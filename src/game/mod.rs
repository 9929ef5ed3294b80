//! Poker game engine: cards, hand evaluation, the betting state
//! machine, and pot settlement.
//!
//! Everything in here is synchronous and transport-free. The `table`
//! module owns pacing, delivery, and the per-match actor.

pub mod constants;
pub mod entities;
pub mod eval;
pub mod settle;
pub mod state_machine;

pub use settle::{HandResult, Settlement};
pub use state_machine::{
    ActionError, ActionOutcome, EngineError, MatchError, MatchOutcome, MatchState,
};
