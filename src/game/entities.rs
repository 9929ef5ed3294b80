use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::constants::{DECK_SIZE, SMALL_BLIND};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Club, Self::Spade, Self::Diamond, Self::Heart];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

/// A card is a tuple of a uInt8 value (2=2u8 ... ace=14u8) and a suit.
/// Aces are always high; the evaluator handles the ace-low straight
/// without a second ace value.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    #[must_use]
    pub const fn value(&self) -> Value {
        self.0
    }

    #[must_use]
    pub const fn suit(&self) -> Suit {
        self.1
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            14 => "A",
            13 => "K",
            12 => "Q",
            11 => "J",
            v => &v.to_string(),
        };
        write!(f, "{value}{}", self.1)
    }
}

/// An ordered run of cards owned by the active hand, consumed from the
/// back. A fresh deck holds all 52 distinct cards.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// All 52 cards, uniformly shuffled (Fisher-Yates).
    #[must_use]
    pub fn shuffled() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for value in 2..=14 {
            for suit in Suit::ALL {
                cards.push(Card(value, suit));
            }
        }
        cards.shuffle(&mut rand::rng());
        Self { cards }
    }

    /// A deck with a fixed order. The last card is dealt first. Used to
    /// rig deals in tests.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::shuffled()
    }
}

/// Type alias for whole chips. All bets and player stacks are whole
/// chips; there are no fractional bets.
pub type Chips = u32;

/// Stable opaque identifier for a player, assigned by the session
/// collaborator when the player connects.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(Uuid);

impl PlayerId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One of the two chairs at the table. Seats are fixed for the life of a
/// match; the dealer button moves between them.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::First => "seat 1",
            Self::Second => "seat 2",
        };
        write!(f, "{repr}")
    }
}

/// Betting phases of a hand, in order, plus the two terminal phases.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Settled,
}

impl Street {
    /// The street dealt after this one's betting completes, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Preflop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River | Self::Showdown | Self::Settled => None,
        }
    }

    /// Board cards dealt when this street opens.
    #[must_use]
    pub const fn cards_dealt(self) -> usize {
        match self {
            Self::Flop => 3,
            Self::Turn | Self::River => 1,
            Self::Preflop | Self::Showdown | Self::Settled => 0,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "pre-flop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
            Self::Settled => "settled",
        };
        write!(f, "{repr}")
    }
}

/// A betting decision submitted by the turn holder.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Action {
    Fold,
    /// Pays whatever is owed against the current street bet; doubles as
    /// a check when nothing is owed.
    Call,
    /// Increment over the current street bet.
    Raise(Chips),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "fold".to_string(),
            Self::Call => "call".to_string(),
            Self::Raise(delta) => format!("raise +${delta}"),
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blinds {
    pub small: Chips,
    pub big: Chips,
}

impl Blinds {
    /// The small blind is always half the big blind.
    #[must_use]
    pub const fn from_big(big: Chips) -> Self {
        Self { small: big / 2, big }
    }
}

impl Default for Blinds {
    fn default() -> Self {
        Self {
            small: SMALL_BLIND,
            big: SMALL_BLIND * 2,
        }
    }
}

impl fmt::Display for Blinds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "${}/{}", self.small, self.big)
    }
}

/// Per-seat state for the hand in progress. Mutated only by the betting
/// state machine during that player's turn and by settlement.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlayerHand {
    pub id: PlayerId,
    pub chips: Chips,
    pub hole: Vec<Card>,
    /// Chips committed during the current street.
    pub street_bet: Chips,
    /// Chips committed over the whole hand, across streets.
    pub committed: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub has_acted: bool,
}

impl PlayerHand {
    #[must_use]
    pub fn new(id: PlayerId, chips: Chips) -> Self {
        Self {
            id,
            chips,
            hole: Vec::with_capacity(2),
            street_bet: 0,
            committed: 0,
            folded: false,
            all_in: false,
            has_acted: false,
        }
    }

    pub fn reset_for_hand(&mut self) {
        self.hole.clear();
        self.street_bet = 0;
        self.committed = 0;
        self.folded = false;
        self.all_in = false;
        self.has_acted = false;
    }

    pub fn reset_for_street(&mut self) {
        self.street_bet = 0;
        self.has_acted = false;
    }

    /// Whether this player still has betting decisions to make.
    #[must_use]
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }

    /// Move up to `amount` chips from the stack toward the pot, clamped
    /// to the stack. An exhausted stack marks the player all-in. Returns
    /// the amount actually paid.
    pub(crate) fn commit(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.street_bet += paid;
        self.committed += paid;
        if self.chips == 0 {
            self.all_in = true;
        }
        paid
    }
}
