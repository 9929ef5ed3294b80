//! Match orchestration with an async actor model.
//!
//! This module implements:
//! - `MatchActor`: async actor driving a single heads-up match
//! - `MatchManager`: owned registry spawning and tracking match actors
//! - Message-based communication with tokio channels
//! - Match configuration (economy + presentation pacing)
//!
//! ## Architecture
//!
//! Each match runs in its own tokio task with an mpsc inbox, so
//! matches share nothing and proceed fully in parallel. Betting
//! actions answer over a oneshot with an [`ActionReceipt`]; state
//! changes fan out per player over the delivery channels the session
//! collaborator supplied, keeping each player's hole cards private
//! until showdown. Presentation pauses (fast-forward deals, showdown,
//! the gap between hands) are cancellable scheduled continuations, not
//! locks held across a delay.
//!
//! ## Example
//!
//! ```no_run
//! use heads_up_poker::table::{MatchConfig, MatchManager, PlayerChannel};
//! use heads_up_poker::PlayerId;
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = MatchManager::new(MatchConfig::default()).unwrap();
//!
//!     let (tx_a, _updates_a) = mpsc::channel(32);
//!     let (tx_b, _updates_b) = mpsc::channel(32);
//!     let a = PlayerChannel { id: PlayerId::new(), updates: tx_a };
//!     let b = PlayerChannel { id: PlayerId::new(), updates: tx_b };
//!
//!     let id = manager.create_match([a, b]).await;
//!     println!("match {id} running");
//! }
//! ```

pub mod actor;
pub mod config;
pub mod manager;
pub mod messages;

pub use actor::{MatchActor, MatchHandle};
pub use config::MatchConfig;
pub use manager::MatchManager;
pub use messages::{
    ActionReceipt, MatchId, MatchMessage, MatchUpdate, PlayerChannel, TableSnapshot,
};
