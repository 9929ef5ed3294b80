//! # Heads-Up Poker
//!
//! A heads-up (two-player) Texas Hold'em match engine: shuffling and
//! dealing, the four-street betting state machine, a full
//! best-5-of-7 hand evaluator, pot settlement with all-in refunds,
//! dealer rotation, and match termination when a stack hits zero.
//!
//! The crate is deliberately transport-free. A session collaborator
//! supplies each player's opaque id and a delivery channel; the engine
//! publishes structured per-player snapshots and terminal notices, and
//! consumes fold/call/raise actions. Rendering, registration, and
//! matchmaking live elsewhere.
//!
//! ## Architecture
//!
//! - [`game`]: the synchronous engine. [`MatchState`] centralizes every
//!   legal betting transition in one function and reports explicit
//!   outcomes; [`game::eval`] scores hands; [`game::settle`] dismantles
//!   the pot.
//! - [`table`]: one tokio actor per match. The actor serializes all
//!   mutation through its inbox, paces all-in fast-forwards and
//!   showdowns with cancellable scheduled continuations, and broadcasts
//!   per-player views. [`MatchManager`] is the owned registry of live
//!   matches.
//!
//! ## Example
//!
//! ```
//! use heads_up_poker::{Blinds, MatchState, PlayerId};
//!
//! let ids = [PlayerId::new(), PlayerId::new()];
//! let mut state = MatchState::new(ids, 1000, Blinds::from_big(20));
//! state.start_hand().expect("a fresh deck deals a full hand");
//! // Blinds are up: dealer posted 10, the other seat posted 20.
//! assert_eq!(state.pot(), 30);
//! ```

/// Core game logic: entities, evaluation, betting, settlement.
pub mod game;
pub use game::{
    constants,
    entities::{self, Action, Blinds, Card, Chips, Deck, PlayerId, Seat, Street, Suit, Value},
    eval::{self, BestHand, HandCategory, HandScore},
    settle::{HandResult, Settlement},
    state_machine::{
        ActionError, ActionOutcome, EngineError, MatchError, MatchOutcome, MatchState,
    },
};

/// Match orchestration: per-match actors, messages, and the registry.
pub mod table;
pub use table::{
    ActionReceipt, MatchActor, MatchConfig, MatchHandle, MatchId, MatchManager, MatchMessage,
    MatchUpdate, PlayerChannel, TableSnapshot,
};
