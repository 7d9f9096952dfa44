use holdem_cards::{Card, Hole};
use holdem_core::{Chips, Position, ID};
use holdem_gameplay::{ActionKind, Hand, Player, PlayerStatus, Table};
use serde::{Deserialize, Serialize};

/// The tagged union of everything that can happen during a hand.
/// Every variant's envelope (hand id, sequence, timestamp) lives in
/// [`Record`], not here — the payload is what distinguishes events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HandEvent {
    HandStarted {
        table_id: ID<Table>,
        hand_number: u64,
        button_seat: Position,
        sb_seat: Position,
        bb_seat: Position,
        sb_amount: Chips,
        bb_amount: Chips,
        player_ids: Vec<ID<Player>>,
        is_bomb_pot: bool,
        double_board: bool,
        ante_amount: Chips,
    },
    BlindsPosted {
        sb_player: ID<Player>,
        sb_amount: Chips,
        bb_player: ID<Player>,
        bb_amount: Chips,
        pot_total: Chips,
    },
    AntePosted {
        player: ID<Player>,
        amount: Chips,
        remaining_stack: Chips,
        pot_total: Chips,
    },
    HoleCardsDealt {
        hole_cards: Vec<(ID<Player>, Hole)>,
    },
    PlayerActed {
        player: ID<Player>,
        action: ActionKind,
        amount: Chips,
        phase: String,
        remaining_stack: Chips,
        pot_total: Chips,
        current_bet: Chips,
        timeout: bool,
    },
    BettingRoundCompleted {
        phase: String,
        pot_amount: Chips,
        active_player_count: usize,
    },
    CommunityCardsDealt {
        phase: String,
        dealt: Vec<Card>,
        board: Vec<Card>,
        board_index: u8,
    },
    PlayerShowedCards {
        player: ID<Player>,
        hole: Hole,
        category: String,
        description: String,
        best_five: Vec<Card>,
        show_order: usize,
        /// Which board this hand strength was evaluated against — 0 for a
        /// single-board hand or a double board's first board, 1 for its
        /// second. Mirrors `CommunityCardsDealt.board_index`.
        board_index: u8,
    },
    PlayerMuckedCards {
        player: ID<Player>,
        auto_muck: bool,
        show_order: usize,
        board_index: u8,
    },
    PotAwarded {
        pot_id: u32,
        kind: String,
        amount: Chips,
        winners: Vec<ID<Player>>,
        per_winner: Vec<(ID<Player>, Chips)>,
        winning_description: Option<String>,
        won_by_fold: bool,
        board_index: u8,
    },
    HandCompleted {
        total_pot: Chips,
        duration_ms: u64,
        player_count: usize,
        went_to_showdown: bool,
        final_phase: String,
        net_result: Vec<(ID<Player>, Chips)>,
        winners: Vec<ID<Player>>,
    },
}

impl HandEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            HandEvent::HandStarted { .. } => "HandStarted",
            HandEvent::BlindsPosted { .. } => "BlindsPosted",
            HandEvent::AntePosted { .. } => "AntePosted",
            HandEvent::HoleCardsDealt { .. } => "HoleCardsDealt",
            HandEvent::PlayerActed { .. } => "PlayerActed",
            HandEvent::BettingRoundCompleted { .. } => "BettingRoundCompleted",
            HandEvent::CommunityCardsDealt { .. } => "CommunityCardsDealt",
            HandEvent::PlayerShowedCards { .. } => "PlayerShowedCards",
            HandEvent::PlayerMuckedCards { .. } => "PlayerMuckedCards",
            HandEvent::PotAwarded { .. } => "PotAwarded",
            HandEvent::HandCompleted { .. } => "HandCompleted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, HandEvent::HandCompleted { .. })
    }
}

/// One logged event: its payload plus the envelope every event carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub hand_id: ID<Hand>,
    pub sequence: u64,
    pub timestamp_ms: u64,
    pub event: HandEvent,
}
