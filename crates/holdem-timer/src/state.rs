use crate::{Player, Table};
use holdem_core::ID;

/// Per-table timer bookkeeping (spec §3's `TimerState` entity). At most
/// one of these exists per table; starting a new timer for that table
/// replaces it.
#[derive(Debug, Clone)]
pub struct TimerState {
    pub hand_id: ID<crate::Hand>,
    pub table_id: ID<Table>,
    pub player_id: ID<Player>,
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub bank_enabled: bool,
    pub bank_active: bool,
    pub bank_remaining_seconds: u32,
    pub warning_sent: bool,
    pub paused: bool,
}

impl TimerState {
    pub fn new(
        hand_id: ID<crate::Hand>,
        table_id: ID<Table>,
        player_id: ID<Player>,
        action_seconds: u32,
        bank_enabled: bool,
        bank_seconds: u32,
    ) -> Self {
        Self {
            hand_id,
            table_id,
            player_id,
            total_seconds: action_seconds,
            remaining_seconds: action_seconds,
            bank_enabled,
            bank_active: false,
            bank_remaining_seconds: bank_seconds,
            warning_sent: false,
            paused: false,
        }
    }

    /// True once the main timer has bottomed out, whether or not the
    /// time bank is covering it.
    pub fn main_timer_expired(&self) -> bool {
        self.remaining_seconds == 0
    }
}
