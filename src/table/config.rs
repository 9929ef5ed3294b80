//! Match configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::game::constants::{BIG_BLIND, STARTING_STACK};
use crate::game::entities::{Blinds, Chips};

/// Configuration for one match: the economy plus presentation pacing.
///
/// The pauses exist purely so observers can see intermediate state
/// (each fast-forward deal, the showdown, the gap between hands). They
/// are not correctness-relevant and never block other matches.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MatchConfig {
    /// Chips each player starts with.
    pub starting_stack: Chips,

    /// Big blind; the small blind is always half of it.
    pub big_blind: Chips,

    /// Pause between community deals while fast-forwarding an all-in.
    pub deal_pause: Duration,

    /// Pause at showdown with both hands revealed, before settling.
    pub showdown_pause: Duration,

    /// Pause between a settled hand and the next deal.
    pub next_hand_pause: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            starting_stack: STARTING_STACK,
            big_blind: BIG_BLIND,
            deal_pause: Duration::from_millis(800),
            showdown_pause: Duration::from_millis(2000),
            next_hand_pause: Duration::from_millis(3000),
        }
    }
}

impl MatchConfig {
    /// The default economy with zero pacing, for tests and simulations.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            deal_pause: Duration::ZERO,
            showdown_pause: Duration::ZERO,
            next_hand_pause: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.big_blind == 0 {
            return Err("Big blind must be greater than zero".to_string());
        }

        if self.big_blind % 2 != 0 {
            return Err("Big blind must be even so the small blind is exact".to_string());
        }

        if self.starting_stack < self.big_blind {
            return Err(format!(
                "Starting stack must cover the big blind ({})",
                self.big_blind
            ));
        }

        Ok(())
    }

    #[must_use]
    pub fn blinds(&self) -> Blinds {
        Blinds::from_big(self.big_blind)
    }
}
