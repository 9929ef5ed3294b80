//! Pot settlement for exactly two contestants.
//!
//! Settlement is the only place chips flow back out of the pot. During
//! betting, chips only ever move from a stack into the pot; here the
//! contested main pot is awarded, uncalled excess is refunded, and the
//! pot returns to zero with total chips preserved exactly.

use serde::{Deserialize, Serialize};

use super::entities::{Chips, PlayerHand, Seat};
use super::state_machine::EngineError;

/// How a hand was decided.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum HandResult {
    Winner(Seat),
    Draw,
}

/// Outcome of dismantling the pot.
///
/// `refunds` are uncalled-bet returns to whoever over-committed (only
/// possible when one side went all-in for less than the other wagered).
/// They are not winnings and are reported separately from the main pot.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Settlement {
    pub result: HandResult,
    /// The contested portion, paid entirely to the winner; on a draw,
    /// the whole pot.
    pub main_pot: Chips,
    /// Per-seat refunds, indexed by `Seat::index`.
    pub refunds: [Chips; 2],
}

/// Dismantle the pot according to `result`.
///
/// On a draw the pot splits in half, with an odd leftover chip going to
/// the dealer (fixed tie-break, never randomized). With a single winner
/// the main pot is twice the smaller commitment; commitment above that
/// flows back to whoever over-committed.
///
/// Rejects a pot that disagrees with the recorded commitments: betting
/// only ever moves chips alongside the commitment counters, so a
/// mismatch here is a defect, not a game state.
pub(crate) fn settle(
    players: &mut [PlayerHand; 2],
    pot: &mut Chips,
    dealer: Seat,
    result: HandResult,
) -> Result<Settlement, EngineError> {
    let committed = [players[0].committed, players[1].committed];
    if committed[0] + committed[1] != *pot {
        return Err(EngineError::CommitmentMismatch {
            pot: *pot,
            committed: committed[0] + committed[1],
        });
    }

    let settlement = match result {
        HandResult::Draw => {
            let half = *pot / 2;
            players[0].chips += half;
            players[1].chips += half;
            if *pot % 2 == 1 {
                players[dealer.index()].chips += 1;
            }
            Settlement {
                result,
                main_pot: *pot,
                refunds: [0, 0],
            }
        }
        HandResult::Winner(winner) => {
            let effective = committed[0].min(committed[1]);
            let main_pot = 2 * effective;
            players[winner.index()].chips += main_pot;

            let refunds = [committed[0] - effective, committed[1] - effective];
            players[0].chips += refunds[0];
            players[1].chips += refunds[1];

            Settlement {
                result,
                main_pot,
                refunds,
            }
        }
    };

    *pot = 0;
    Ok(settlement)
}
