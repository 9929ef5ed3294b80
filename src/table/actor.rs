//! Match actor implementation with async message handling.
//!
//! One actor task owns one match. Every mutation flows through the
//! inbox, so only one action is ever in flight; presentation pacing is
//! done with scheduled continuations (a timer task posting an internal
//! `Advance` back to the inbox) so no delay ever holds the actor, and a
//! disconnect can cancel a pending continuation cleanly.

use log::{debug, info, warn};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::config::MatchConfig;
use super::messages::{
    ActionReceipt, MatchId, MatchMessage, MatchUpdate, PlayerChannel, TableSnapshot,
};
use crate::game::entities::{Action, PlayerId, Seat, Street};
use crate::game::settle::{HandResult, Settlement};
use crate::game::state_machine::{
    ActionOutcome, EngineError, MatchError, MatchOutcome, MatchState,
};

/// Match actor handle for sending messages
#[derive(Clone)]
pub struct MatchHandle {
    sender: mpsc::Sender<MatchMessage>,
    match_id: MatchId,
}

impl MatchHandle {
    pub fn new(sender: mpsc::Sender<MatchMessage>, match_id: MatchId) -> Self {
        Self { sender, match_id }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Send a message to the match
    pub async fn send(&self, message: MatchMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "Match is closed".to_string())
    }

    /// Submit a betting action and wait for the engine's receipt.
    pub async fn take_action(
        &self,
        player: PlayerId,
        action: Action,
    ) -> Result<ActionReceipt, String> {
        let (response, receipt) = oneshot::channel();
        self.send(MatchMessage::TakeAction {
            player,
            action,
            response,
        })
        .await?;
        receipt.await.map_err(|_| "Match is closed".to_string())
    }

    /// Ask for the player's current view.
    pub async fn snapshot(&self, player: PlayerId) -> Result<Option<TableSnapshot>, String> {
        let (response, snapshot) = oneshot::channel();
        self.send(MatchMessage::GetSnapshot { player, response })
            .await?;
        snapshot.await.map_err(|_| "Match is closed".to_string())
    }

    /// Report a vanished player.
    pub async fn disconnect(&self, player: PlayerId) -> Result<(), String> {
        self.send(MatchMessage::Disconnect { player }).await
    }
}

/// What the actor is pacing toward, if anything.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    /// Waiting on the turn holder; no continuation pending.
    AwaitingAction,
    /// Dealing out the board after an all-in.
    FastForwarding,
    /// Showdown revealed; the next advance settles the pot.
    RevealingShowdown,
    /// Hand settled; the next advance deals the next hand.
    BetweenHands,
}

/// Match actor managing a single heads-up match
pub struct MatchActor {
    id: MatchId,

    config: MatchConfig,

    /// The synchronous engine state.
    state: MatchState,

    /// Message inbox
    inbox: mpsc::Receiver<MatchMessage>,

    /// For continuation timers posting back to our own inbox.
    self_sender: mpsc::Sender<MatchMessage>,

    /// Per-seat delivery channels, indexed by `Seat::index`.
    channels: [PlayerChannel; 2],

    /// Generation of the continuation currently allowed to fire; a
    /// bumped generation orphans anything already in flight.
    generation: u64,

    /// The timer task behind the pending continuation.
    pending: Option<JoinHandle<()>>,

    phase: Phase,

    over: bool,
}

impl MatchActor {
    /// Create a new match actor and its handle. The first hand is not
    /// dealt until [`Self::run`].
    pub fn new(
        id: MatchId,
        players: [PlayerChannel; 2],
        config: MatchConfig,
    ) -> (Self, MatchHandle) {
        let (sender, inbox) = mpsc::channel(64);

        let state = MatchState::new(
            [players[0].id, players[1].id],
            config.starting_stack,
            config.blinds(),
        );

        let actor = Self {
            id,
            config,
            state,
            inbox,
            self_sender: sender.clone(),
            channels: players,
            generation: 0,
            pending: None,
            phase: Phase::AwaitingAction,
            over: false,
        };

        let handle = MatchHandle::new(sender, id);

        (actor, handle)
    }

    /// Run the match actor event loop until the match ends.
    pub async fn run(mut self) {
        info!(
            "match {} starting: {} vs {}",
            self.id, self.channels[0].id, self.channels[1].id,
        );

        if let Err(error) = self.begin_hand() {
            self.defect(error);
            return;
        }

        while !self.over {
            let Some(message) = self.inbox.recv().await else {
                break;
            };
            if let Err(error) = self.handle_message(message) {
                self.defect(error);
                break;
            }
        }

        self.cancel_pending();
        info!("match {} closed", self.id);
    }

    fn handle_message(&mut self, message: MatchMessage) -> Result<(), EngineError> {
        match message {
            MatchMessage::TakeAction {
                player,
                action,
                response,
            } => match self.state.apply_action(player, action) {
                Ok(outcome) => {
                    let _ = response.send(ActionReceipt::Accepted);
                    self.follow_up(outcome)?;
                }
                Err(MatchError::Action(error)) => {
                    debug!("match {}: rejected {player}: {error}", self.id);
                    let _ = response.send(ActionReceipt::Rejected(error));
                }
                Err(MatchError::Engine(error)) => {
                    let _ = response.send(ActionReceipt::Failed);
                    return Err(error);
                }
            },

            MatchMessage::GetSnapshot { player, response } => {
                let snapshot = self
                    .state
                    .seat_of(player)
                    .map(|seat| TableSnapshot::for_seat(&self.state, seat));
                let _ = response.send(snapshot);
            }

            MatchMessage::Disconnect { player } => {
                self.handle_disconnect(player)?;
            }

            MatchMessage::Advance { generation } => {
                self.handle_advance(generation)?;
            }
        }

        Ok(())
    }

    /// React to the engine's explicit outcome for an accepted action
    /// (or a freshly started hand).
    fn follow_up(&mut self, outcome: ActionOutcome) -> Result<(), EngineError> {
        match outcome {
            ActionOutcome::TurnPassed | ActionOutcome::StreetDealt(_) => {
                self.phase = Phase::AwaitingAction;
                self.broadcast_and_check()
            }
            ActionOutcome::FastForward => {
                self.broadcast_and_check()?;
                if !self.over {
                    self.schedule(self.config.deal_pause, Phase::FastForwarding);
                }
                Ok(())
            }
            ActionOutcome::ShowdownReached => {
                self.broadcast_and_check()?;
                if !self.over {
                    self.schedule(self.config.showdown_pause, Phase::RevealingShowdown);
                }
                Ok(())
            }
            ActionOutcome::HandFolded(settlement) => self.finish_hand(settlement),
        }
    }

    fn handle_advance(&mut self, generation: u64) -> Result<(), EngineError> {
        if generation != self.generation {
            debug!("match {}: ignoring stale continuation", self.id);
            return Ok(());
        }
        self.pending = None;

        match self.phase {
            Phase::AwaitingAction => Ok(()),
            Phase::FastForwarding => {
                let street = self.state.deal_next_street()?;
                self.broadcast_and_check()?;
                if self.over {
                    return Ok(());
                }
                if street == Street::Showdown {
                    self.schedule(self.config.showdown_pause, Phase::RevealingShowdown);
                } else {
                    self.schedule(self.config.deal_pause, Phase::FastForwarding);
                }
                Ok(())
            }
            Phase::RevealingShowdown => {
                let settlement = self.state.resolve_showdown()?;
                self.finish_hand(settlement)
            }
            Phase::BetweenHands => self.begin_hand(),
        }
    }

    fn begin_hand(&mut self) -> Result<(), EngineError> {
        let outcome = self.state.start_hand()?;
        debug!("match {}: {}", self.id, self.state);
        self.follow_up(outcome)
    }

    /// Dismantled pot: tell both players, then either end the match or
    /// schedule the next hand.
    fn finish_hand(&mut self, settlement: Settlement) -> Result<(), EngineError> {
        // Final snapshots first so the revealed cards and chip counts
        // read consistently, then the structured settlement notice.
        self.broadcast_and_check()?;
        if self.over {
            return Ok(());
        }

        let winner = match settlement.result {
            HandResult::Winner(seat) => Some(self.state.player(seat).id),
            HandResult::Draw => None,
        };
        for seat in Seat::ALL {
            let update = MatchUpdate::HandSettled {
                winner,
                main_pot: settlement.main_pot,
                refund: settlement.refunds[seat.index()],
                chips: self.state.player(seat).chips,
                opponent_chips: self.state.player(seat.other()).chips,
            };
            self.deliver(seat, update);
        }

        if let Some(outcome) = self.state.match_outcome() {
            self.send_match_ended(outcome);
            self.over = true;
            return Ok(());
        }

        self.schedule(self.config.next_hand_pause, Phase::BetweenHands);
        Ok(())
    }

    fn handle_disconnect(&mut self, player: PlayerId) -> Result<(), EngineError> {
        if self.over {
            return Ok(());
        }
        let Some(seat) = self.state.seat_of(player) else {
            warn!("match {}: disconnect for unknown player {player}", self.id);
            return Ok(());
        };

        let remaining = seat.other();
        info!(
            "match {}: {player} disconnected, {} wins by default",
            self.id,
            self.channels[remaining.index()].id,
        );

        self.cancel_pending();
        self.state.award_by_default(remaining)?;
        self.send_match_ended(MatchOutcome::Winner(self.state.player(remaining).id));
        self.over = true;
        Ok(())
    }

    fn send_match_ended(&mut self, outcome: MatchOutcome) {
        info!("match {} ended: {outcome:?}", self.id);
        let winning_hand = match outcome {
            MatchOutcome::Winner(id) => self
                .state
                .seat_of(id)
                .and_then(|seat| self.state.best_hand(seat))
                .copied(),
            MatchOutcome::Draw => None,
        };
        for seat in Seat::ALL {
            let update = MatchUpdate::MatchEnded {
                outcome,
                chips: self.state.player(seat).chips,
                opponent_chips: self.state.player(seat.other()).chips,
                winning_hand,
            };
            self.deliver(seat, update);
        }
    }

    /// Push fresh views to both players; a closed channel means that
    /// player vanished, which resolves the match for the opponent.
    fn broadcast_and_check(&mut self) -> Result<(), EngineError> {
        if let Some(gone) = self.broadcast_snapshots() {
            self.handle_disconnect(gone)?;
        }
        Ok(())
    }

    fn broadcast_snapshots(&self) -> Option<PlayerId> {
        for seat in Seat::ALL {
            let snapshot = TableSnapshot::for_seat(&self.state, seat);
            if !self.deliver(seat, MatchUpdate::Snapshot(snapshot)) {
                return Some(self.channels[seat.index()].id);
            }
        }
        None
    }

    /// Deliver one update; returns false if the channel is closed.
    fn deliver(&self, seat: Seat, update: MatchUpdate) -> bool {
        match self.channels[seat.index()].updates.try_send(update) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    "match {}: {} update channel full, dropping update",
                    self.id,
                    self.channels[seat.index()].id,
                );
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Schedule the next continuation. The previous one, if any, is
    /// aborted and its generation orphaned.
    fn schedule(&mut self, delay: Duration, phase: Phase) {
        self.cancel_pending();
        self.phase = phase;
        let generation = self.generation;
        let sender = self.self_sender.clone();
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = sender.send(MatchMessage::Advance { generation }).await;
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    fn defect(&mut self, error: EngineError) {
        log::error!("match {}: engine defect: {error}", self.id);
        self.cancel_pending();
        self.over = true;
    }
}
