use crate::betting_round::BettingRound;
use crate::phase::Phase;
use crate::player::{Player, Seat};
use crate::pot::{build_pots, Pot};
use holdem_cards::Board;
use holdem_core::{Chips, Position, ID};
use std::collections::{HashMap, HashSet};

/// A single hand in progress at a table: the phase it's in, its board(s),
/// the betting round for the current street, the pots sealed from
/// earlier streets, and the seats contesting it. Owned exclusively by
/// the orchestrator driving that table.
pub struct Hand {
    id: ID<Hand>,
    table_id: ID<crate::Table>,
    hand_number: u64,
    phase: Phase,
    button: Position,
    seats: Vec<Seat>,
    small_blind: Chips,
    big_blind: Chips,
    board: Board,
    /// Second board for a double-board bomb pot; empty otherwise.
    second_board: Board,
    round: BettingRound,
    sealed_pots: Vec<Pot>,
    current_to_act: Option<ID<Player>>,
    is_bomb_pot: bool,
}

impl Hand {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        table_id: ID<crate::Table>,
        hand_number: u64,
        button: Position,
        seats: Vec<Seat>,
        small_blind: Chips,
        big_blind: Chips,
    ) -> Self {
        Self {
            id: ID::new(),
            table_id,
            hand_number,
            phase: Phase::Waiting,
            button,
            seats,
            small_blind,
            big_blind,
            board: Board::new(),
            second_board: Board::new(),
            round: BettingRound::new(big_blind),
            sealed_pots: Vec::new(),
            current_to_act: None,
            is_bomb_pot: false,
        }
    }

    pub fn id(&self) -> ID<Hand> {
        self.id
    }
    pub fn table_id(&self) -> ID<crate::Table> {
        self.table_id
    }
    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn button(&self) -> Position {
        self.button
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn second_board(&self) -> &Board {
        &self.second_board
    }
    pub fn is_bomb_pot(&self) -> bool {
        self.is_bomb_pot
    }
    pub fn round(&self) -> &BettingRound {
        &self.round
    }
    pub fn round_mut(&mut self) -> &mut BettingRound {
        &mut self.round
    }
    /// Replaces the round wholesale — used to seed the preflop round with
    /// blinds already credited via [`BettingRound::preflop`].
    pub fn set_round(&mut self, round: BettingRound) {
        self.round = round;
    }
    pub fn current_to_act(&self) -> Option<ID<Player>> {
        self.current_to_act
    }
    pub fn small_blind(&self) -> Chips {
        self.small_blind
    }
    pub fn big_blind(&self) -> Chips {
        self.big_blind
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn seat(&self, id: ID<Player>) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id() == id)
    }
    pub fn seat_mut(&mut self, id: ID<Player>) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.id() == id)
    }

    pub fn set_current_to_act(&mut self, id: Option<ID<Player>>) {
        self.current_to_act = id;
    }
    pub fn set_bomb_pot(&mut self, bomb: bool) {
        self.is_bomb_pot = bomb;
    }

    /// Count of seats still contesting (Active or AllIn).
    pub fn contesting_count(&self) -> usize {
        self.seats.iter().filter(|s| s.status().is_contesting()).count()
    }
    /// Count of seats not folded (Active, AllIn, or Waiting-mid-deal).
    pub fn non_folded_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| s.status() != crate::player::PlayerStatus::Folded)
            .count()
    }

    /// Seals the current street's bets into pots, folding them into
    /// `sealed_pots`. Called on round completion, before advancing phase.
    pub fn close_betting_round(&mut self) {
        let contributions: HashMap<ID<Player>, Chips> = self
            .seats
            .iter()
            .map(|s| (s.id(), s.round_bet()))
            .collect();
        let folded: HashSet<ID<Player>> = self
            .seats
            .iter()
            .filter(|s| s.status() == crate::player::PlayerStatus::Folded)
            .map(|s| s.id())
            .collect();
        let all_in: HashSet<ID<Player>> = self
            .seats
            .iter()
            .filter(|s| s.status() == crate::player::PlayerStatus::AllIn)
            .map(|s| s.id())
            .collect();
        let new_pots = build_pots(&contributions, &folded, &all_in);
        self.merge_pots(new_pots);
        for seat in &mut self.seats {
            seat.reset_round_bet();
        }
    }

    fn merge_pots(&mut self, new_pots: Vec<Pot>) {
        for mut pot in new_pots {
            if let Some(existing) = self.sealed_pots.iter_mut().find(|p| p.eligible == pot.eligible) {
                existing.amount += pot.amount;
            } else {
                pot.sequence = self.sealed_pots.len() as u32;
                self.sealed_pots.push(pot);
            }
        }
    }

    pub fn pots(&self) -> &[Pot] {
        &self.sealed_pots
    }

    pub fn total_pot(&self) -> Chips {
        self.sealed_pots.iter().map(|p| p.amount).sum()
    }

    /// Enters `next`, resetting the betting round when it's a new street.
    pub fn enter_phase(&mut self, next: Phase) -> Result<(), holdem_core::Error> {
        let board_len = self.board.len();
        let validated = self.phase.transition_to(next, board_len)?;
        if matches!(validated, Phase::Flop | Phase::Turn | Phase::River) {
            self.round = self.round.next_street();
        }
        self.phase = validated;
        Ok(())
    }

    pub fn deal_community(&mut self, cards: impl IntoIterator<Item = holdem_cards::Card>) {
        self.board.extend(cards);
    }
    pub fn deal_second_board(&mut self, cards: impl IntoIterator<Item = holdem_cards::Card>) {
        self.second_board.extend(cards);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerStatus;
    use crate::Table;

    fn seat(stack: Chips) -> Seat {
        let mut seat = Seat::new(ID::new(), 0, stack);
        seat.set_status(PlayerStatus::Active);
        seat
    }

    #[test]
    fn close_betting_round_builds_pots_and_resets_bets() {
        let mut a = seat(100);
        let mut b = seat(100);
        a.commit(10);
        b.commit(10);
        let mut hand = Hand::new(ID::<Table>::new(), 1, 0, vec![a, b], 1, 2);
        hand.close_betting_round();
        assert_eq!(hand.total_pot(), 20);
        assert_eq!(hand.pots().len(), 1);
        assert_eq!(hand.seats()[0].round_bet(), 0);
    }

    #[test]
    fn enter_flop_resets_round_and_requires_correct_phase() {
        let mut hand = Hand::new(ID::<Table>::new(), 1, 0, vec![seat(100), seat(100)], 1, 2);
        hand.enter_phase(Phase::Preflop).unwrap();
        hand.round.record_raise(hand.seats()[0].id(), 10);
        hand.deal_community([]); // no-op, board still empty
        let err = hand.enter_phase(Phase::Flop);
        assert!(err.is_ok());
        assert_eq!(hand.round().current_bet(), 0);
    }
}
