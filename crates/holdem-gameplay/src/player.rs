use holdem_core::{Chips, Position, ID};
use holdem_cards::Hole;

/// A player as seen by the core engine. Identity, seating, and display name
/// are the lobby's concern; this is only the subset of player state a hand
/// reads and mutates.
pub struct Player;

/// A player's status within the current hand.
///
/// `AllIn` implies `stack == 0`; `Active` and `AllIn` are the only statuses
/// that still contest pots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerStatus {
    Waiting,
    Active,
    Folded,
    AllIn,
    Away,
}

impl PlayerStatus {
    /// True if this player is still contesting pots this hand.
    pub fn is_contesting(&self) -> bool {
        matches!(self, Self::Active | Self::AllIn)
    }
}

/// A seated participant as the engine tracks them across a hand.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seat {
    id: ID<Player>,
    seat: Position,
    stack: Chips,
    status: PlayerStatus,
    hole: Option<Hole>,
    round_bet: Chips,
    hand_bet: Chips,
    time_bank_seconds: u32,
    hands_sat_out: u32,
    owes_missed_blinds: bool,
}

impl Seat {
    pub fn new(id: ID<Player>, seat: Position, stack: Chips) -> Self {
        Self {
            id,
            seat,
            stack,
            status: PlayerStatus::Waiting,
            hole: None,
            round_bet: 0,
            hand_bet: 0,
            time_bank_seconds: 0,
            hands_sat_out: 0,
            owes_missed_blinds: false,
        }
    }

    pub fn id(&self) -> ID<Player> {
        self.id
    }
    pub fn seat(&self) -> Position {
        self.seat
    }
    pub fn stack(&self) -> Chips {
        self.stack
    }
    pub fn status(&self) -> PlayerStatus {
        self.status
    }
    pub fn hole(&self) -> Option<Hole> {
        self.hole
    }
    /// Chips committed on the current betting street.
    pub fn round_bet(&self) -> Chips {
        self.round_bet
    }
    /// Chips committed across the whole hand so far.
    pub fn hand_bet(&self) -> Chips {
        self.hand_bet
    }
    pub fn time_bank_seconds(&self) -> u32 {
        self.time_bank_seconds
    }
    pub fn hands_sat_out(&self) -> u32 {
        self.hands_sat_out
    }
    pub fn owes_missed_blinds(&self) -> bool {
        self.owes_missed_blinds
    }

    pub fn set_status(&mut self, status: PlayerStatus) {
        self.status = status;
    }
    pub fn set_hole(&mut self, hole: Hole) {
        self.hole = Some(hole);
    }
    pub fn clear_hole(&mut self) {
        self.hole = None;
    }
    pub fn set_time_bank_seconds(&mut self, seconds: u32) {
        self.time_bank_seconds = seconds;
    }
    pub fn mark_sat_out(&mut self) {
        self.hands_sat_out += 1;
    }
    pub fn mark_seated(&mut self) {
        self.hands_sat_out = 0;
    }
    pub fn set_owes_missed_blinds(&mut self, owed: bool) {
        self.owes_missed_blinds = owed;
    }

    /// Commits `amount` from the stack into the pot. If it exhausts the
    /// stack the seat becomes `AllIn`.
    pub fn commit(&mut self, amount: Chips) {
        debug_assert!(amount <= self.stack, "commit exceeds stack");
        self.stack -= amount;
        self.round_bet += amount;
        self.hand_bet += amount;
        if self.stack == 0 && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }
    }
    pub fn award(&mut self, amount: Chips) {
        self.stack += amount;
    }
    pub fn fold(&mut self) {
        self.status = PlayerStatus::Folded;
    }
    /// Resets per-street bet tracking; called when a new betting round
    /// begins.
    pub fn reset_round_bet(&mut self) {
        self.round_bet = 0;
    }
    /// Resets per-hand bet tracking and status for a fresh hand.
    pub fn reset_for_new_hand(&mut self) {
        self.round_bet = 0;
        self.hand_bet = 0;
        self.hole = None;
        self.status = if self.stack > 0 {
            PlayerStatus::Active
        } else {
            PlayerStatus::Away
        };
    }
}
