//! Match actor message types.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::game::entities::{Action, Card, Chips, PlayerId, Seat, Street};
use crate::game::eval::BestHand;
use crate::game::state_machine::{ActionError, MatchOutcome, MatchState};

/// Identifier for one live match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct MatchId(Uuid);

impl MatchId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A player's identity plus the delivery channel the session
/// collaborator opened for them. The engine only ever "delivers an
/// update to player X" through this.
#[derive(Clone, Debug)]
pub struct PlayerChannel {
    pub id: PlayerId,
    pub updates: mpsc::Sender<MatchUpdate>,
}

/// Messages that can be sent to a `MatchActor`.
#[derive(Debug)]
pub enum MatchMessage {
    /// A betting action from a player. The receipt says whether the
    /// engine accepted it; rejections name the specific reason and are
    /// not broadcast to the opponent.
    TakeAction {
        player: PlayerId,
        action: Action,
        response: oneshot::Sender<ActionReceipt>,
    },

    /// Re-send the player's current view.
    GetSnapshot {
        player: PlayerId,
        response: oneshot::Sender<Option<TableSnapshot>>,
    },

    /// The session collaborator reports this player gone. The match
    /// resolves immediately in favor of the opponent.
    Disconnect { player: PlayerId },

    /// Internal: a scheduled continuation fired. Stale generations are
    /// ignored, which is what makes cancellation safe.
    Advance { generation: u64 },
}

/// Outcome of submitting an action.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ActionReceipt {
    Accepted,
    /// User-correctable; nothing changed. Retry with a corrected
    /// action.
    Rejected(ActionError),
    /// An engine defect was detected; the match is being torn down.
    Failed,
}

impl ActionReceipt {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// An update pushed to one player. Snapshots are addressed per
/// recipient so each player's own hole cards stay private until
/// showdown.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum MatchUpdate {
    /// The match as this player may see it right now.
    Snapshot(TableSnapshot),

    /// A hand finished and the pot was dismantled.
    HandSettled {
        /// `None` on a drawn hand.
        winner: Option<PlayerId>,
        main_pot: Chips,
        /// Uncalled-bet refund returned to this recipient; distinct
        /// from winnings.
        refund: Chips,
        chips: Chips,
        opponent_chips: Chips,
    },

    /// The match is over; no further actions are accepted.
    MatchEnded {
        outcome: MatchOutcome,
        chips: Chips,
        opponent_chips: Chips,
        /// The winner's revealed best five, where a showdown produced
        /// one.
        winning_hand: Option<BestHand>,
    },
}

/// The match as seen from one player's side of the table.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub hand_no: u32,
    pub street: Street,
    pub hole: Vec<Card>,
    pub community: Vec<Card>,
    pub chips: Chips,
    pub opponent_chips: Chips,
    pub pot: Chips,
    pub street_bet: Chips,
    /// What this player must pay to stay in.
    pub amount_to_call: Chips,
    pub dealer: PlayerId,
    pub turn: Option<PlayerId>,
    /// True only at showdown and after settlement.
    pub reveal_opponent: bool,
    /// Populated only when `reveal_opponent` is set.
    pub opponent_hole: Vec<Card>,
    /// This player's best five, once a showdown evaluated it.
    pub best_hand: Option<BestHand>,
    /// The opponent's best five, gated like their hole cards.
    pub opponent_best_hand: Option<BestHand>,
}

impl TableSnapshot {
    /// Build the view for one seat.
    #[must_use]
    pub fn for_seat(state: &MatchState, seat: Seat) -> Self {
        let me = state.player(seat);
        let opponent = state.player(seat.other());
        let reveal = matches!(state.street(), Street::Showdown | Street::Settled);

        Self {
            hand_no: state.hand_no(),
            street: state.street(),
            hole: me.hole.clone(),
            community: state.community().to_vec(),
            chips: me.chips,
            opponent_chips: opponent.chips,
            pot: state.pot(),
            street_bet: state.street_bet(),
            amount_to_call: state.amount_to_call(seat),
            dealer: state.player(state.dealer()).id,
            turn: state.turn().map(|turn| state.player(turn).id),
            reveal_opponent: reveal,
            opponent_hole: if reveal { opponent.hole.clone() } else { Vec::new() },
            best_hand: state.best_hand(seat).copied(),
            opponent_best_hand: if reveal {
                state.best_hand(seat.other()).copied()
            } else {
                None
            },
        }
    }
}
