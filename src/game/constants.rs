//! Reference economy and deck geometry constants.

use super::entities::Chips;

/// Number of contestants in a match. The settlement algorithm is only
/// valid for exactly two.
pub const SEATS: usize = 2;

/// Chips each player starts a match with.
pub const STARTING_STACK: Chips = 1000;

/// Forced opening bet posted by the non-dealer. Also the minimum raise
/// increment for a raise that doesn't put the raiser all-in.
pub const BIG_BLIND: Chips = 20;

/// Posted by the dealer, who acts first preflop.
pub const SMALL_BLIND: Chips = BIG_BLIND / 2;

pub const DECK_SIZE: usize = 52;
pub const HOLE_CARDS: usize = 2;
pub const BOARD_SIZE: usize = 5;

/// Worst case cards consumed by one heads-up hand: 2x2 hole cards,
/// 5 board cards, 3 burns.
pub const CARDS_PER_HAND: usize = SEATS * HOLE_CARDS + BOARD_SIZE + 3;
