use crate::event::{HandEvent, Record};
use holdem_cards::Card;
use holdem_core::{Chips, Error, Position, ID};
use holdem_gameplay::{ActionKind, Hand, Player};
use std::collections::HashMap;

/// One logged action, reconstructed from a `PlayerActed` event.
#[derive(Debug, Clone)]
pub struct ActedEntry {
    pub player: ID<Player>,
    pub action: ActionKind,
    pub amount: Chips,
    pub phase: String,
    pub timeout: bool,
}

/// Hand state re-derived by folding a hand's event log, per spec §4.7 ("the
/// core re-derives Hand state by folding events"). Reconstructs everything
/// observable from the log itself — the log does not carry starting stacks
/// or seat assignments (those live in the Table snapshot, an external
/// collaborator), so this is a projection of the log, not a byte-for-byte
/// rebuild of the live `holdem_gameplay::Hand`.
#[derive(Debug, Clone, Default)]
pub struct ReplayState {
    pub hand_id: Option<ID<Hand>>,
    pub hand_number: u64,
    pub button_seat: Position,
    pub player_ids: Vec<ID<Player>>,
    pub board: Vec<Card>,
    pub second_board: Vec<Card>,
    pub final_phase: String,
    pub actions: Vec<ActedEntry>,
    pub pot_awards: Vec<(u32, Vec<(ID<Player>, Chips)>)>,
    pub total_pot: Chips,
    pub is_complete: bool,
}

/// Folds `records` (already ordered by sequence) into the state they
/// describe. Mirrors the teacher's `Recall::head` fold-from-root pattern,
/// with `HandStarted` standing in for the root and every later event
/// playing the role of an `Action`.
pub fn replay(records: &[Record]) -> Result<ReplayState, Error> {
    let mut state = ReplayState::default();
    let mut expected = 1u64;

    for record in records {
        if record.sequence != expected {
            return Err(Error::invalid_state(format!(
                "gap in hand history: expected sequence {expected}, found {}",
                record.sequence
            )));
        }
        expected += 1;
        apply_event(&mut state, record);
    }
    Ok(state)
}

fn apply_event(state: &mut ReplayState, record: &Record) {
    state.hand_id = Some(record.hand_id);
    match &record.event {
        HandEvent::HandStarted {
            hand_number,
            button_seat,
            player_ids,
            ..
        } => {
            state.hand_number = *hand_number;
            state.button_seat = *button_seat;
            state.player_ids = player_ids.clone();
            state.final_phase = "Preflop".to_string();
        }
        HandEvent::BlindsPosted { pot_total, .. } | HandEvent::AntePosted { pot_total, .. } => {
            state.total_pot = *pot_total;
        }
        HandEvent::HoleCardsDealt { .. } => {}
        HandEvent::PlayerActed {
            player,
            action,
            amount,
            phase,
            pot_total,
            timeout,
            ..
        } => {
            state.total_pot = *pot_total;
            state.final_phase = phase.clone();
            state.actions.push(ActedEntry {
                player: *player,
                action: *action,
                amount: *amount,
                phase: phase.clone(),
                timeout: *timeout,
            });
        }
        HandEvent::BettingRoundCompleted { phase, pot_amount, .. } => {
            state.final_phase = phase.clone();
            state.total_pot = *pot_amount;
        }
        HandEvent::CommunityCardsDealt { phase, board, board_index, .. } => {
            state.final_phase = phase.clone();
            if *board_index == 0 {
                state.board = board.clone();
            } else {
                state.second_board = board.clone();
            }
        }
        HandEvent::PlayerShowedCards { .. } | HandEvent::PlayerMuckedCards { .. } => {}
        HandEvent::PotAwarded {
            pot_id, per_winner, ..
        } => {
            state.pot_awards.push((*pot_id, per_winner.clone()));
        }
        HandEvent::HandCompleted {
            total_pot,
            final_phase,
            ..
        } => {
            state.total_pot = *total_pot;
            state.final_phase = final_phase.clone();
            state.is_complete = true;
        }
    }
}

/// Per-player chip delta across a replayed hand: positive for a net
/// winner, negative for a net loser, derived from `PlayerActed` amounts
/// against `PotAwarded` credits.
pub fn net_results(state: &ReplayState) -> HashMap<ID<Player>, Chips> {
    let mut net: HashMap<ID<Player>, Chips> = HashMap::new();
    for entry in &state.actions {
        *net.entry(entry.player).or_insert(0) -= entry.amount;
    }
    for (_, winners) in &state.pot_awards {
        for (player, amount) in winners {
            *net.entry(*player).or_insert(0) += amount;
        }
    }
    net
}
