//! Match manager for spawning and tracking match actors.
//!
//! The one owned registry of live matches, keyed by match id and
//! consulted only through this API; there is no ambient global state.

use log::info;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

use super::{
    actor::{MatchActor, MatchHandle},
    config::MatchConfig,
    messages::{ActionReceipt, MatchId, PlayerChannel, TableSnapshot},
};
use crate::game::entities::{Action, PlayerId};

/// Spawns one actor task per match and routes player traffic to it.
pub struct MatchManager {
    config: MatchConfig,

    /// Active match handles.
    matches: Arc<RwLock<HashMap<MatchId, MatchHandle>>>,

    /// Which match each player is seated in.
    seats: Arc<RwLock<HashMap<PlayerId, MatchId>>>,
}

impl MatchManager {
    /// Create a manager whose matches all use `config`.
    pub fn new(config: MatchConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(Self {
            config,
            matches: Arc::new(RwLock::new(HashMap::new())),
            seats: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Pair two players into a fresh match and start it. The first
    /// channel's player holds the button for the first hand. The
    /// registry entry is disposed when the match ends.
    pub async fn create_match(&self, players: [PlayerChannel; 2]) -> MatchId {
        let id = MatchId::new();
        let player_ids = [players[0].id, players[1].id];
        let (actor, handle) = MatchActor::new(id, players, self.config.clone());

        self.matches.write().await.insert(id, handle);
        {
            let mut seats = self.seats.write().await;
            for player_id in player_ids {
                seats.insert(player_id, id);
            }
        }

        let matches = Arc::clone(&self.matches);
        let seats = Arc::clone(&self.seats);
        tokio::spawn(async move {
            actor.run().await;
            matches.write().await.remove(&id);
            let mut seats = seats.write().await;
            for player_id in player_ids {
                seats.remove(&player_id);
            }
            info!("match {id} disposed");
        });

        id
    }

    /// Handle for a live match.
    pub async fn handle(&self, id: MatchId) -> Option<MatchHandle> {
        self.matches.read().await.get(&id).cloned()
    }

    /// The match a player is currently seated in.
    pub async fn match_of(&self, player: PlayerId) -> Option<MatchId> {
        self.seats.read().await.get(&player).copied()
    }

    /// Route a betting action to the player's match.
    pub async fn submit_action(
        &self,
        player: PlayerId,
        action: Action,
    ) -> Result<ActionReceipt, String> {
        let handle = self
            .handle_for_player(player)
            .await
            .ok_or_else(|| "Player is not in a match".to_string())?;
        handle.take_action(player, action).await
    }

    /// Fetch the player's current view of their match.
    pub async fn snapshot(&self, player: PlayerId) -> Result<Option<TableSnapshot>, String> {
        let handle = self
            .handle_for_player(player)
            .await
            .ok_or_else(|| "Player is not in a match".to_string())?;
        handle.snapshot(player).await
    }

    /// Report a vanished player; their match, if any, resolves for the
    /// opponent. A no-op for players not seated anywhere.
    pub async fn disconnect(&self, player: PlayerId) {
        if let Some(handle) = self.handle_for_player(player).await {
            let _ = handle.disconnect(player).await;
        }
    }

    pub async fn active_match_count(&self) -> usize {
        self.matches.read().await.len()
    }

    async fn handle_for_player(&self, player: PlayerId) -> Option<MatchHandle> {
        let id = self.match_of(player).await?;
        self.handle(id).await
    }
}
