use holdem_core::{Chips, Position, ID};
use holdem_gameplay::{Hand, Player};
use std::collections::BTreeMap;

/// A table's seated players and the rules they're sitting under — a
/// fully-populated snapshot the core consumes but never owns. Seating,
/// buy-ins, and host configuration are the lobby subsystem's
/// responsibility (spec §1's explicit out-of-scope boundary); this is
/// only the subset the orchestrator needs to start and drive a hand.
pub struct Table {
    id: ID<crate::TableTag>,
    small_blind: Chips,
    big_blind: Chips,
    action_seconds: u32,
    time_bank_enabled: bool,
    time_bank_seconds: u32,
    button: Position,
    /// Seated players, keyed by seat position, in clockwise order.
    seats: BTreeMap<Position, SeatedPlayer>,
    current_hand: Option<Hand>,
    hand_count: u64,
}

/// One seated player as the lobby hands them to the core: identity,
/// stack, and whether they're sitting out.
#[derive(Debug, Clone)]
pub struct SeatedPlayer {
    pub id: ID<Player>,
    pub stack: Chips,
    pub sitting_out: bool,
}

impl Table {
    pub fn new(
        id: ID<crate::TableTag>,
        small_blind: Chips,
        big_blind: Chips,
        action_seconds: u32,
        time_bank_enabled: bool,
        time_bank_seconds: u32,
    ) -> Self {
        Self {
            id,
            small_blind,
            big_blind,
            action_seconds,
            time_bank_enabled,
            time_bank_seconds,
            button: 0,
            seats: BTreeMap::new(),
            current_hand: None,
            hand_count: 0,
        }
    }

    pub fn id(&self) -> ID<crate::TableTag> {
        self.id
    }
    pub fn small_blind(&self) -> Chips {
        self.small_blind
    }
    pub fn big_blind(&self) -> Chips {
        self.big_blind
    }
    pub fn action_seconds(&self) -> u32 {
        self.action_seconds
    }
    pub fn time_bank_enabled(&self) -> bool {
        self.time_bank_enabled
    }
    pub fn time_bank_seconds(&self) -> u32 {
        self.time_bank_seconds
    }
    pub fn button(&self) -> Position {
        self.button
    }
    pub fn seats(&self) -> &BTreeMap<Position, SeatedPlayer> {
        &self.seats
    }
    pub fn hand(&self) -> Option<&Hand> {
        self.current_hand.as_ref()
    }
    pub fn hand_mut(&mut self) -> Option<&mut Hand> {
        self.current_hand.as_mut()
    }
    pub fn hand_count(&self) -> u64 {
        self.hand_count
    }

    pub fn seat_player(&mut self, position: Position, player: SeatedPlayer) {
        self.seats.insert(position, player);
    }
    pub fn remove_player(&mut self, position: Position) {
        self.seats.remove(&position);
    }

    pub fn active_player_count(&self) -> usize {
        self.seats.values().filter(|p| !p.sitting_out && p.stack > 0).count()
    }

    /// The next seated, non-sitting-out position clockwise from `from`
    /// (exclusive), wrapping around the table.
    pub fn next_active_seat(&self, from: Position) -> Option<Position> {
        let positions: Vec<Position> = self.seats.keys().copied().collect();
        if positions.is_empty() {
            return None;
        }
        let start = positions.iter().position(|&p| p > from).unwrap_or(0);
        for offset in 0..positions.len() {
            let idx = (start + offset) % positions.len();
            let pos = positions[idx];
            if let Some(player) = self.seats.get(&pos) {
                if !player.sitting_out && player.stack > 0 {
                    return Some(pos);
                }
            }
        }
        None
    }

    pub fn advance_button(&mut self) {
        if let Some(next) = self.next_active_seat(self.button) {
            self.button = next;
        }
    }

    pub fn set_hand(&mut self, hand: Hand) {
        self.hand_count += 1;
        self.current_hand = Some(hand);
    }
    pub fn clear_hand(&mut self) {
        self.current_hand = None;
    }
}
