use holdem_core::{Chips, ID};
use holdem_gameplay::{Hand, Player};
use serde::{Deserialize, Serialize};

/// Auto-materialised the moment a `HandCompleted` event is appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandSummary {
    pub hand_id: ID<Hand>,
    pub hand_number: u64,
    pub winners: Vec<ID<Player>>,
    pub total_pot: Chips,
    pub duration_ms: u64,
    pub player_count: usize,
    pub went_to_showdown: bool,
    pub completed_at_ms: u64,
}
