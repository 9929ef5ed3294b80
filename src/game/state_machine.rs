//! Heads-up match state machine.
//!
//! All betting legality, street sequencing, and hand lifecycle logic is
//! centralized in [`MatchState::apply_action`], which returns an explicit
//! [`ActionOutcome`] for the orchestrator to act on. The state machine is
//! fully synchronous; pacing and delivery live in the `table` module.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::entities::{Action, Blinds, Card, Chips, Deck, PlayerHand, PlayerId, Seat, Street};
use super::eval::{self, BestHand};
use super::settle::{self, HandResult, Settlement};

/// User-correctable rejections. The match is left unchanged and the
/// reason goes back to the actor alone; the opponent sees nothing.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ActionError {
    #[error("not your turn")]
    OutOfTurn,
    #[error("no action is awaited right now")]
    NotAwaitingAction,
    #[error("unknown player")]
    UnknownPlayer,
    #[error("raise of ${delta} is below the ${min} minimum")]
    RaiseBelowMinimum { delta: Chips, min: Chips },
    #[error("raise needs ${required} but only ${available} behind")]
    RaiseExceedsStack { required: Chips, available: Chips },
    #[error("match is over")]
    MatchOver,
}

/// Conditions that cannot occur under correct sequencing. They are
/// detected and surfaced as defects rather than silently tolerated; the
/// orchestrator treats them as fatal to the match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum EngineError {
    #[error("deck exhausted while dealing")]
    DeckExhausted,
    #[error("pot ${pot} disagrees with recorded commitments ${committed}")]
    CommitmentMismatch { pot: Chips, committed: Chips },
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Explicit outcome of one accepted action (or of starting a hand).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionOutcome {
    /// Betting continues on this street; the turn moved to the seat
    /// held in `MatchState::turn`.
    TurnPassed,
    /// The street's betting completed and the next street was dealt.
    StreetDealt(Street),
    /// Betting is finished for the hand with a live all-in before the
    /// river: the remaining streets must be dealt with no further
    /// betting, paced by the orchestrator via
    /// [`MatchState::deal_next_street`].
    FastForward,
    /// The river's betting completed; the hand awaits
    /// [`MatchState::resolve_showdown`].
    ShowdownReached,
    /// The hand ended on a fold; settlement has already run.
    HandFolded(Settlement),
}

/// Terminal result of a whole match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MatchOutcome {
    Winner(PlayerId),
    /// Both stacks at zero simultaneously.
    Draw,
}

/// One heads-up match: two fixed seats, a rotating dealer button, and
/// the state of the hand in progress.
///
/// Owned exclusively by its orchestrator. Only one in-flight action is
/// ever valid (the current turn holder's); everything else is rejected,
/// never queued.
#[derive(Clone, Debug)]
pub struct MatchState {
    players: [PlayerHand; 2],
    deck: Deck,
    community: Vec<Card>,
    pot: Chips,
    /// Highest commitment on the current street.
    street_bet: Chips,
    street: Street,
    dealer: Seat,
    turn: Option<Seat>,
    blinds: Blinds,
    starting_stack: Chips,
    hand_no: u32,
    result: Option<HandResult>,
    best_hands: Option<[BestHand; 2]>,
}

impl MatchState {
    /// A match between two players, each starting with
    /// `starting_stack`. Seat one holds the button for the first hand;
    /// no hand is in progress until [`Self::start_hand`].
    #[must_use]
    pub fn new(ids: [PlayerId; 2], starting_stack: Chips, blinds: Blinds) -> Self {
        Self {
            players: [
                PlayerHand::new(ids[0], starting_stack),
                PlayerHand::new(ids[1], starting_stack),
            ],
            deck: Deck::from_cards(Vec::new()),
            community: Vec::with_capacity(5),
            pot: 0,
            street_bet: 0,
            street: Street::Settled,
            dealer: Seat::First,
            turn: None,
            blinds,
            starting_stack,
            hand_no: 0,
            result: None,
            best_hands: None,
        }
    }

    /// Begin the next hand with a freshly shuffled deck.
    pub fn start_hand(&mut self) -> Result<ActionOutcome, EngineError> {
        self.start_hand_with_deck(Deck::shuffled())
    }

    /// Begin the next hand from an explicit deck. Clears all per-hand
    /// state, alternates the dealer button (after the first hand), deals
    /// hole cards, and posts blinds: the small blind from the dealer,
    /// the big blind from the other seat, either clamped to a short
    /// stack as a forced all-in.
    ///
    /// Usually returns [`ActionOutcome::TurnPassed`] with the dealer (or
    /// the first seat still able to act) up; returns
    /// [`ActionOutcome::FastForward`] when the blinds alone end the
    /// betting.
    pub fn start_hand_with_deck(&mut self, deck: Deck) -> Result<ActionOutcome, EngineError> {
        self.deck = deck;
        self.community.clear();
        self.pot = 0;
        self.street_bet = 0;
        self.street = Street::Preflop;
        self.result = None;
        self.best_hands = None;
        for player in &mut self.players {
            player.reset_for_hand();
        }

        if self.hand_no > 0 {
            self.dealer = self.dealer.other();
        }
        self.hand_no += 1;

        for seat in Seat::ALL {
            for _ in 0..2 {
                let card = self.deck.draw().ok_or(EngineError::DeckExhausted)?;
                self.players[seat.index()].hole.push(card);
            }
        }

        let small = self.post_blind(self.dealer, self.blinds.small);
        let big = self.post_blind(self.dealer.other(), self.blinds.big);
        self.street_bet = self.players[0].street_bet.max(self.players[1].street_bet);

        info!(
            "hand {} started: dealer {} posts ${small}, {} posts ${big}",
            self.hand_no,
            self.dealer,
            self.dealer.other(),
        );

        // A short blind can leave one seat (or both) without any
        // decision to make before anyone acts.
        if self.betting_complete() {
            self.turn = None;
            self.reset_street_bets();
            return Ok(ActionOutcome::FastForward);
        }
        let first = if self.players[self.dealer.index()].can_act() {
            self.dealer
        } else {
            self.dealer.other()
        };
        self.turn = Some(first);
        Ok(ActionOutcome::TurnPassed)
    }

    fn post_blind(&mut self, seat: Seat, blind: Chips) -> Chips {
        let paid = self.players[seat.index()].commit(blind);
        self.pot += paid;
        paid
    }

    /// Process one betting action from `player`. This is the single
    /// legal-transition function: it validates turn order and bet
    /// sizing, mutates the match, and reports what the orchestrator
    /// must do next. Rejections leave the match untouched.
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: Action,
    ) -> Result<ActionOutcome, MatchError> {
        let seat = self.seat_of(player).ok_or(ActionError::UnknownPlayer)?;
        if self.street == Street::Settled {
            let error = if self.match_outcome().is_some() {
                ActionError::MatchOver
            } else {
                ActionError::NotAwaitingAction
            };
            return Err(error.into());
        }
        if self.turn != Some(seat) {
            let error = if self.turn.is_none() {
                ActionError::NotAwaitingAction
            } else {
                ActionError::OutOfTurn
            };
            return Err(error.into());
        }

        debug!("hand {}: {seat} {action}", self.hand_no);
        match action {
            Action::Fold => {
                self.players[seat.index()].folded = true;
                let settlement = self.finish_hand(HandResult::Winner(seat.other()))?;
                Ok(ActionOutcome::HandFolded(settlement))
            }
            Action::Call => {
                let owed = self.amount_to_call(seat);
                let paid = self.players[seat.index()].commit(owed);
                self.pot += paid;
                self.players[seat.index()].has_acted = true;
                self.advance_betting(seat).map_err(MatchError::from)
            }
            Action::Raise(delta) => {
                let target = self.street_bet.saturating_add(delta);
                let required = target - self.players[seat.index()].street_bet;
                let available = self.players[seat.index()].chips;
                if required > available {
                    return Err(ActionError::RaiseExceedsStack { required, available }.into());
                }
                // Anything short of all-in must raise by at least one
                // big blind.
                if delta < self.blinds.big && required < available {
                    return Err(ActionError::RaiseBelowMinimum {
                        delta,
                        min: self.blinds.big,
                    }
                    .into());
                }
                let paid = self.players[seat.index()].commit(required);
                self.pot += paid;
                self.street_bet = target;
                self.players[seat.index()].has_acted = true;
                self.players[seat.other().index()].has_acted = false;
                self.advance_betting(seat).map_err(MatchError::from)
            }
        }
    }

    /// Street-completion rule: betting on a street is done once both
    /// players have acted or are all-in, and either their street bets
    /// are equal or the short side is all-in with the other side at
    /// least at the street bet.
    fn betting_complete(&self) -> bool {
        let [first, second] = &self.players;
        if first.folded || second.folded {
            return true;
        }
        if !(first.has_acted || first.all_in) || !(second.has_acted || second.all_in) {
            return false;
        }
        first.street_bet == second.street_bet
            || (first.all_in && second.street_bet >= self.street_bet)
            || (second.all_in && first.street_bet >= self.street_bet)
    }

    fn advance_betting(&mut self, actor: Seat) -> Result<ActionOutcome, EngineError> {
        if !self.betting_complete() {
            self.turn = Some(actor.other());
            return Ok(ActionOutcome::TurnPassed);
        }

        self.reset_street_bets();
        self.turn = None;

        let live_all_in = self.players.iter().any(|p| !p.folded && p.all_in);
        if live_all_in && self.street < Street::River {
            debug!("hand {}: all-in, fast-forwarding board", self.hand_no);
            return Ok(ActionOutcome::FastForward);
        }

        if self.street == Street::River {
            self.street = Street::Showdown;
            return Ok(ActionOutcome::ShowdownReached);
        }

        let next = self.deal_next_street()?;
        // Post-flop the non-dealer opens the betting.
        self.turn = Some(self.dealer.other());
        Ok(ActionOutcome::StreetDealt(next))
    }

    fn reset_street_bets(&mut self) {
        for player in &mut self.players {
            player.reset_for_street();
        }
        self.street_bet = 0;
    }

    /// Deal the next street (one burn, then three cards for the flop or
    /// one for the turn/river); from the river this steps to showdown
    /// without dealing. Used on normal street completion and by the
    /// orchestrator to pace an all-in fast-forward.
    pub fn deal_next_street(&mut self) -> Result<Street, EngineError> {
        let Some(next) = self.street.next() else {
            if self.street == Street::River {
                self.street = Street::Showdown;
            }
            return Ok(self.street);
        };

        self.deck.draw().ok_or(EngineError::DeckExhausted)?;
        for _ in 0..next.cards_dealt() {
            let card = self.deck.draw().ok_or(EngineError::DeckExhausted)?;
            self.community.push(card);
        }
        self.street = next;
        debug!(
            "hand {}: dealt {next}, board now {} cards",
            self.hand_no,
            self.community.len(),
        );
        Ok(next)
    }

    /// Compare both live hands against the full board, record the best
    /// fives, and settle the pot.
    pub fn resolve_showdown(&mut self) -> Result<Settlement, EngineError> {
        let best = [
            eval::find_best_hand(&self.players[0].hole, &self.community),
            eval::find_best_hand(&self.players[1].hole, &self.community),
        ];
        let result = match best[0].score.cmp(&best[1].score) {
            std::cmp::Ordering::Greater => HandResult::Winner(Seat::First),
            std::cmp::Ordering::Less => HandResult::Winner(Seat::Second),
            std::cmp::Ordering::Equal => HandResult::Draw,
        };
        self.best_hands = Some(best);
        self.finish_hand(result)
    }

    /// Resolve the hand immediately in favor of `winner`, without a
    /// showdown. Used when the opponent vanishes mid-hand.
    pub fn award_by_default(&mut self, winner: Seat) -> Result<Option<Settlement>, EngineError> {
        if self.street == Street::Settled {
            return Ok(None);
        }
        self.finish_hand(HandResult::Winner(winner)).map(Some)
    }

    fn finish_hand(&mut self, result: HandResult) -> Result<Settlement, EngineError> {
        let settlement = settle::settle(&mut self.players, &mut self.pot, self.dealer, result)?;
        self.result = Some(result);
        self.street = Street::Settled;
        self.turn = None;
        info!(
            "hand {} settled: {result:?}, stacks ${} / ${}",
            self.hand_no, self.players[0].chips, self.players[1].chips,
        );
        Ok(settlement)
    }

    /// Whether the settled hand ended the match: a bankrupt player
    /// loses, and two simultaneously empty stacks draw the match.
    /// `None` while chips remain on both sides or a hand is in flight.
    #[must_use]
    pub fn match_outcome(&self) -> Option<MatchOutcome> {
        if self.street != Street::Settled {
            return None;
        }
        match (self.players[0].chips, self.players[1].chips) {
            (0, 0) => Some(MatchOutcome::Draw),
            (0, _) => Some(MatchOutcome::Winner(self.players[1].id)),
            (_, 0) => Some(MatchOutcome::Winner(self.players[0].id)),
            _ => None,
        }
    }

    #[must_use]
    pub fn seat_of(&self, player: PlayerId) -> Option<Seat> {
        Seat::ALL
            .into_iter()
            .find(|seat| self.players[seat.index()].id == player)
    }

    /// What `seat` still owes against the current street bet.
    #[must_use]
    pub fn amount_to_call(&self, seat: Seat) -> Chips {
        self.street_bet
            .saturating_sub(self.players[seat.index()].street_bet)
    }

    /// Total chips in sight. Invariant: always twice the starting stack.
    #[must_use]
    pub fn total_chips(&self) -> Chips {
        self.players[0].chips + self.players[1].chips + self.pot
    }

    #[must_use]
    pub fn player(&self, seat: Seat) -> &PlayerHand {
        &self.players[seat.index()]
    }

    #[must_use]
    pub fn community(&self) -> &[Card] {
        &self.community
    }

    #[must_use]
    pub fn pot(&self) -> Chips {
        self.pot
    }

    #[must_use]
    pub fn street_bet(&self) -> Chips {
        self.street_bet
    }

    #[must_use]
    pub fn street(&self) -> Street {
        self.street
    }

    #[must_use]
    pub fn dealer(&self) -> Seat {
        self.dealer
    }

    #[must_use]
    pub fn turn(&self) -> Option<Seat> {
        self.turn
    }

    #[must_use]
    pub fn blinds(&self) -> Blinds {
        self.blinds
    }

    #[must_use]
    pub fn hand_no(&self) -> u32 {
        self.hand_no
    }

    #[must_use]
    pub fn result(&self) -> Option<HandResult> {
        self.result
    }

    #[must_use]
    pub fn best_hand(&self, seat: Seat) -> Option<&BestHand> {
        self.best_hands.as_ref().map(|hands| &hands[seat.index()])
    }

    #[must_use]
    pub fn starting_stack(&self) -> Chips {
        self.starting_stack
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "hand {} [{}] pot ${} stacks ${}/${}",
            self.hand_no, self.street, self.pot, self.players[0].chips, self.players[1].chips,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::{BIG_BLIND, SMALL_BLIND, STARTING_STACK};
    use crate::game::entities::Suit;
    use crate::game::eval::HandCategory;

    fn new_match(stack: Chips) -> MatchState {
        MatchState::new(
            [PlayerId::new(), PlayerId::new()],
            stack,
            Blinds::from_big(BIG_BLIND),
        )
    }

    fn id(state: &MatchState, seat: Seat) -> PlayerId {
        state.player(seat).id
    }

    /// Deck that deals `cards` in the given order (first listed is
    /// drawn first).
    fn rigged(cards: Vec<Card>) -> Deck {
        Deck::from_cards(cards.into_iter().rev().collect())
    }

    /// Deal order: seat one's hole pair, seat two's hole pair, then
    /// burn-flop(3), burn-turn, burn-river.
    fn rigged_full_hand(hole_one: [Card; 2], hole_two: [Card; 2], board: [Card; 5]) -> Deck {
        rigged(vec![
            hole_one[0],
            hole_one[1],
            hole_two[0],
            hole_two[1],
            Card(2, Suit::Club),
            board[0],
            board[1],
            board[2],
            Card(3, Suit::Club),
            board[3],
            Card(4, Suit::Club),
            board[4],
        ])
    }

    #[test]
    fn test_start_hand_posts_blinds_and_dealer_acts_first() {
        let mut state = new_match(STARTING_STACK);
        let outcome = state.start_hand().unwrap();

        assert_eq!(outcome, ActionOutcome::TurnPassed);
        assert_eq!(state.street(), Street::Preflop);
        assert_eq!(state.dealer(), Seat::First);
        assert_eq!(state.turn(), Some(Seat::First));
        assert_eq!(state.player(Seat::First).street_bet, SMALL_BLIND);
        assert_eq!(state.player(Seat::Second).street_bet, BIG_BLIND);
        assert_eq!(state.pot(), SMALL_BLIND + BIG_BLIND);
        assert_eq!(state.amount_to_call(Seat::First), SMALL_BLIND);
        assert_eq!(state.player(Seat::First).hole.len(), 2);
        assert_eq!(state.player(Seat::Second).hole.len(), 2);
        assert_eq!(state.total_chips(), 2 * STARTING_STACK);
    }

    #[test]
    fn test_dealer_alternates_between_hands() {
        let mut state = new_match(STARTING_STACK);
        state.start_hand().unwrap();
        assert_eq!(state.dealer(), Seat::First);

        let folder = id(&state, Seat::First);
        state.apply_action(folder, Action::Fold).unwrap();

        state.start_hand().unwrap();
        assert_eq!(state.dealer(), Seat::Second);
    }

    #[test]
    fn test_fold_awards_pot_to_opponent() {
        let mut state = new_match(STARTING_STACK);
        state.start_hand().unwrap();

        let outcome = state
            .apply_action(id(&state, Seat::First), Action::Fold)
            .unwrap();

        let ActionOutcome::HandFolded(settlement) = outcome else {
            panic!("expected fold to end the hand, got {outcome:?}");
        };
        // Only the small blind was matched; the big blind's excess
        // comes back.
        assert_eq!(settlement.main_pot, 2 * SMALL_BLIND);
        assert_eq!(settlement.refunds, [0, SMALL_BLIND]);
        assert_eq!(state.street(), Street::Settled);
        assert_eq!(state.result(), Some(HandResult::Winner(Seat::Second)));
        assert_eq!(state.player(Seat::First).chips, STARTING_STACK - SMALL_BLIND);
        assert_eq!(state.player(Seat::Second).chips, STARTING_STACK + SMALL_BLIND);
        assert_eq!(state.total_chips(), 2 * STARTING_STACK);
    }

    #[test]
    fn test_out_of_turn_action_changes_nothing() {
        let mut state = new_match(STARTING_STACK);
        state.start_hand().unwrap();
        let before = state.clone();

        let err = state
            .apply_action(id(&state, Seat::Second), Action::Call)
            .unwrap_err();

        assert!(matches!(err, MatchError::Action(ActionError::OutOfTurn)));
        assert_eq!(state.pot(), before.pot());
        assert_eq!(state.turn(), before.turn());
        assert_eq!(
            state.player(Seat::Second).street_bet,
            before.player(Seat::Second).street_bet,
        );
    }

    #[test]
    fn test_unknown_player_rejected() {
        let mut state = new_match(STARTING_STACK);
        state.start_hand().unwrap();

        let err = state.apply_action(PlayerId::new(), Action::Call).unwrap_err();
        assert!(matches!(err, MatchError::Action(ActionError::UnknownPlayer)));
    }

    #[test]
    fn test_preflop_call_leaves_big_blind_the_option() {
        let mut state = new_match(STARTING_STACK);
        state.start_hand().unwrap();

        let outcome = state
            .apply_action(id(&state, Seat::First), Action::Call)
            .unwrap();

        // The big blind has not acted yet, so the street is not over.
        assert_eq!(outcome, ActionOutcome::TurnPassed);
        assert_eq!(state.turn(), Some(Seat::Second));
        assert_eq!(state.street(), Street::Preflop);
    }

    #[test]
    fn test_check_around_deals_the_flop() {
        let mut state = new_match(STARTING_STACK);
        state.start_hand().unwrap();

        state.apply_action(id(&state, Seat::First), Action::Call).unwrap();
        let outcome = state
            .apply_action(id(&state, Seat::Second), Action::Call)
            .unwrap();

        assert_eq!(outcome, ActionOutcome::StreetDealt(Street::Flop));
        assert_eq!(state.street(), Street::Flop);
        assert_eq!(state.community().len(), 3);
        // Post-flop the non-dealer opens.
        assert_eq!(state.turn(), Some(Seat::Second));
        assert_eq!(state.street_bet(), 0);
        assert_eq!(state.player(Seat::First).street_bet, 0);
    }

    #[test]
    fn test_full_hand_of_checks_reaches_showdown() {
        let mut state = new_match(STARTING_STACK);
        state.start_hand().unwrap();

        state.apply_action(id(&state, Seat::First), Action::Call).unwrap();
        state.apply_action(id(&state, Seat::Second), Action::Call).unwrap();
        for expected in [Street::Turn, Street::River] {
            state.apply_action(id(&state, Seat::Second), Action::Call).unwrap();
            let outcome = state
                .apply_action(id(&state, Seat::First), Action::Call)
                .unwrap();
            assert_eq!(outcome, ActionOutcome::StreetDealt(expected));
        }
        state.apply_action(id(&state, Seat::Second), Action::Call).unwrap();
        let outcome = state
            .apply_action(id(&state, Seat::First), Action::Call)
            .unwrap();

        assert_eq!(outcome, ActionOutcome::ShowdownReached);
        assert_eq!(state.street(), Street::Showdown);
        assert_eq!(state.community().len(), 5);
        assert_eq!(state.turn(), None);
        assert_eq!(state.total_chips(), 2 * STARTING_STACK);
    }

    #[test]
    fn test_raise_reopens_betting_for_opponent() {
        let mut state = new_match(STARTING_STACK);
        state.start_hand().unwrap();

        state.apply_action(id(&state, Seat::First), Action::Call).unwrap();
        let outcome = state
            .apply_action(id(&state, Seat::Second), Action::Raise(40))
            .unwrap();

        assert_eq!(outcome, ActionOutcome::TurnPassed);
        assert_eq!(state.street_bet(), BIG_BLIND + 40);
        assert_eq!(state.turn(), Some(Seat::First));
        assert!(!state.player(Seat::First).has_acted);
        assert!(state.player(Seat::Second).has_acted);
        assert_eq!(state.amount_to_call(Seat::First), 40);
    }

    #[test]
    fn test_raise_below_minimum_rejected() {
        let mut state = new_match(STARTING_STACK);
        state.start_hand().unwrap();
        let pot_before = state.pot();

        let err = state
            .apply_action(id(&state, Seat::First), Action::Raise(BIG_BLIND - 1))
            .unwrap_err();

        assert!(matches!(
            err,
            MatchError::Action(ActionError::RaiseBelowMinimum { min: BIG_BLIND, .. }),
        ));
        assert_eq!(state.pot(), pot_before);
        assert_eq!(state.turn(), Some(Seat::First));
    }

    #[test]
    fn test_raise_beyond_stack_rejected() {
        let mut state = new_match(STARTING_STACK);
        state.start_hand().unwrap();

        let err = state
            .apply_action(id(&state, Seat::First), Action::Raise(STARTING_STACK * 2))
            .unwrap_err();

        assert!(matches!(
            err,
            MatchError::Action(ActionError::RaiseExceedsStack { .. }),
        ));
        assert_eq!(state.turn(), Some(Seat::First));
    }

    #[test]
    fn test_all_in_raise_below_big_blind_is_legal() {
        let mut state = new_match(STARTING_STACK);
        state.players[1].chips = 35;
        state.start_hand().unwrap();

        state.apply_action(id(&state, Seat::First), Action::Call).unwrap();
        // The big blind shoves its last 15, less than a full raise but
        // legal because it uses the whole stack.
        let outcome = state
            .apply_action(id(&state, Seat::Second), Action::Raise(15))
            .unwrap();

        assert!(state.player(Seat::Second).all_in);
        assert_eq!(state.street_bet(), 35);
        assert_eq!(outcome, ActionOutcome::TurnPassed);
        assert!(!state.player(Seat::First).has_acted);

        let outcome = state
            .apply_action(id(&state, Seat::First), Action::Call)
            .unwrap();
        assert_eq!(outcome, ActionOutcome::FastForward);
    }

    #[test]
    fn test_under_call_all_in_fast_forwards() {
        let mut state = new_match(STARTING_STACK);
        // Seat two is short.
        state.players[1].chips = 100;
        state.start_hand().unwrap();

        state
            .apply_action(id(&state, Seat::First), Action::Raise(300))
            .unwrap();
        let outcome = state
            .apply_action(id(&state, Seat::Second), Action::Call)
            .unwrap();

        assert_eq!(outcome, ActionOutcome::FastForward);
        assert!(state.player(Seat::Second).all_in);
        assert_eq!(state.player(Seat::Second).committed, 100);
        assert_eq!(state.turn(), None);
    }

    #[test]
    fn test_fast_forward_deals_out_the_board() {
        let mut state = new_match(STARTING_STACK);
        state.players[1].chips = 100;
        state.start_hand().unwrap();
        state
            .apply_action(id(&state, Seat::First), Action::Raise(300))
            .unwrap();
        state.apply_action(id(&state, Seat::Second), Action::Call).unwrap();

        assert_eq!(state.deal_next_street().unwrap(), Street::Flop);
        assert_eq!(state.deal_next_street().unwrap(), Street::Turn);
        assert_eq!(state.deal_next_street().unwrap(), Street::River);
        assert_eq!(state.deal_next_street().unwrap(), Street::Showdown);
        assert_eq!(state.community().len(), 5);
        assert_eq!(state.street(), Street::Showdown);

        let settlement = state.resolve_showdown().unwrap();
        assert_eq!(state.street(), Street::Settled);
        assert_eq!(state.total_chips(), 2 * STARTING_STACK);
        // The deep stack's uncalled 220 comes back regardless of who
        // won the 200-chip main pot.
        assert_eq!(settlement.main_pot, 200);
        assert_eq!(settlement.refunds[0], 220);
    }

    #[test]
    fn test_short_blind_forces_all_in_and_skips_dead_turn() {
        let mut state = new_match(STARTING_STACK);
        // The dealer cannot even cover the small blind.
        state.players[0].chips = 4;
        state.start_hand().unwrap();

        assert!(state.player(Seat::First).all_in);
        assert_eq!(state.player(Seat::First).committed, 4);
        // The all-in dealer has no decision; the big blind is up.
        assert_eq!(state.turn(), Some(Seat::Second));
    }

    #[test]
    fn test_showdown_with_rigged_deck_picks_the_right_winner() {
        let mut state = new_match(STARTING_STACK);
        let deck = rigged_full_hand(
            [Card(14, Suit::Spade), Card(14, Suit::Heart)],
            [Card(7, Suit::Diamond), Card(8, Suit::Diamond)],
            [
                Card(14, Suit::Diamond),
                Card(14, Suit::Club),
                Card(13, Suit::Spade),
                Card(2, Suit::Heart),
                Card(3, Suit::Diamond),
            ],
        );
        state.start_hand_with_deck(deck).unwrap();

        state.apply_action(id(&state, Seat::First), Action::Call).unwrap();
        state.apply_action(id(&state, Seat::Second), Action::Call).unwrap();
        for _ in 0..3 {
            state.apply_action(id(&state, Seat::Second), Action::Call).unwrap();
            state.apply_action(id(&state, Seat::First), Action::Call).unwrap();
        }

        let settlement = state.resolve_showdown().unwrap();
        assert_eq!(settlement.result, HandResult::Winner(Seat::First));
        let best = state.best_hand(Seat::First).unwrap();
        assert_eq!(best.score.category, HandCategory::FourOfAKind);
        assert_eq!(best.score.tiebreaks, [14, 13, 0, 0, 0]);
        assert_eq!(state.player(Seat::First).chips, STARTING_STACK + BIG_BLIND);
    }

    #[test]
    fn test_showdown_draw_splits_the_pot() {
        let mut state = new_match(STARTING_STACK);
        // The board plays for both sides: a royal flush on the board.
        let deck = rigged_full_hand(
            [Card(2, Suit::Heart), Card(3, Suit::Heart)],
            [Card(2, Suit::Diamond), Card(3, Suit::Diamond)],
            [
                Card(10, Suit::Spade),
                Card(11, Suit::Spade),
                Card(12, Suit::Spade),
                Card(13, Suit::Spade),
                Card(14, Suit::Spade),
            ],
        );
        state.start_hand_with_deck(deck).unwrap();

        state.apply_action(id(&state, Seat::First), Action::Call).unwrap();
        state.apply_action(id(&state, Seat::Second), Action::Call).unwrap();
        for _ in 0..3 {
            state.apply_action(id(&state, Seat::Second), Action::Call).unwrap();
            state.apply_action(id(&state, Seat::First), Action::Call).unwrap();
        }

        let settlement = state.resolve_showdown().unwrap();
        assert_eq!(settlement.result, HandResult::Draw);
        assert_eq!(state.player(Seat::First).chips, STARTING_STACK);
        assert_eq!(state.player(Seat::Second).chips, STARTING_STACK);
    }

    #[test]
    fn test_chip_conservation_through_a_raise_war() {
        let mut state = new_match(STARTING_STACK);
        state.start_hand().unwrap();

        state.apply_action(id(&state, Seat::First), Action::Raise(40)).unwrap();
        assert_eq!(state.total_chips(), 2 * STARTING_STACK);
        state
            .apply_action(id(&state, Seat::Second), Action::Raise(100))
            .unwrap();
        assert_eq!(state.total_chips(), 2 * STARTING_STACK);
        state.apply_action(id(&state, Seat::First), Action::Call).unwrap();
        assert_eq!(state.total_chips(), 2 * STARTING_STACK);
        assert_eq!(state.street(), Street::Flop);

        state.apply_action(id(&state, Seat::Second), Action::Fold).unwrap();
        assert_eq!(state.total_chips(), 2 * STARTING_STACK);
        assert_eq!(state.pot(), 0);
    }

    #[test]
    fn test_actions_rejected_once_match_is_over() {
        let mut state = new_match(STARTING_STACK);
        state.players[1].chips = SMALL_BLIND;
        // Seat two's whole stack goes in as a short big blind, the
        // dealer checks it back, and the board runs out.
        state.start_hand().unwrap();
        state.apply_action(id(&state, Seat::First), Action::Call).unwrap();
        while state.street() < Street::Showdown {
            state.deal_next_street().unwrap();
        }
        state.resolve_showdown().unwrap();

        let err = state
            .apply_action(id(&state, Seat::First), Action::Call)
            .unwrap_err();
        if state.match_outcome().is_some() {
            assert!(matches!(err, MatchError::Action(ActionError::MatchOver)));
        } else {
            assert!(matches!(
                err,
                MatchError::Action(ActionError::NotAwaitingAction),
            ));
        }
    }

    #[test]
    fn test_match_outcome_on_bankruptcy() {
        let mut state = new_match(STARTING_STACK);
        state.players[1].chips = BIG_BLIND;
        state.start_hand().unwrap();

        // The big blind is all-in from the forced post; the dealer
        // calls and the board runs out.
        state.apply_action(id(&state, Seat::First), Action::Call).unwrap();
        while state.street() < Street::Showdown {
            state.deal_next_street().unwrap();
        }
        let settlement = state.resolve_showdown().unwrap();

        match settlement.result {
            HandResult::Winner(Seat::First) => {
                assert_eq!(
                    state.match_outcome(),
                    Some(MatchOutcome::Winner(id(&state, Seat::First))),
                );
            }
            HandResult::Winner(Seat::Second) | HandResult::Draw => {
                // The short stack survived; the match goes on.
                assert!(state.player(Seat::Second).chips > 0);
                assert_eq!(state.match_outcome(), None);
            }
        }
    }

    #[test]
    fn test_deck_underflow_is_engine_fatal() {
        let mut state = new_match(STARTING_STACK);
        let err = state
            .start_hand_with_deck(rigged(vec![Card(2, Suit::Club)]))
            .unwrap_err();
        assert_eq!(err, EngineError::DeckExhausted);
    }
}
