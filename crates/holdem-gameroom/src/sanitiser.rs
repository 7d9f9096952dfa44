use holdem_cards::Card;
use holdem_core::{Chips, Position, ID};
use holdem_gameplay::{ActionKind, Hand, Phase, Player, PlayerStatus};
use serde::{Deserialize, Serialize};

/// A hole-card view as a viewer is allowed to see it: their own two
/// cards, a face-down marker for a live opponent, or an opponent's
/// actual cards once shown at showdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HoleView {
    Mine([Card; 2]),
    FaceDown,
    Shown([Card; 2]),
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatView {
    pub player: ID<Player>,
    pub seat: Position,
    pub stack: Chips,
    pub status: PlayerStatus,
    pub round_bet: Chips,
    pub hand_bet: Chips,
    pub hole: HoleView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableActions {
    pub can_fold: bool,
    pub can_check: bool,
    pub can_call: bool,
    pub call_amount: Chips,
    pub can_raise: bool,
    pub min_raise: Chips,
    pub max_raise: Chips,
    pub can_all_in: bool,
    pub all_in_amount: Chips,
}

/// A per-viewer snapshot of a hand in progress: every field a client
/// needs to render the table, with opponents' hole cards hidden unless
/// that opponent has shown at showdown (spec §4.11).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandSnapshot {
    pub phase: Phase,
    pub button: Position,
    pub board: Vec<Card>,
    pub second_board: Vec<Card>,
    pub pot_total: Chips,
    pub current_bet: Chips,
    pub current_to_act: Option<ID<Player>>,
    pub seats: Vec<SeatView>,
    pub legal_actions: Option<AvailableActions>,
}

/// Which hole cards a viewer has already seen shown (tracked by the
/// orchestrator across `PlayerShowedCards` events); `None` means nobody
/// has shown yet, or the viewer is asking before showdown.
pub fn snapshot_for_viewer(
    hand: &Hand,
    viewer: Option<ID<Player>>,
    shown: &[(ID<Player>, [Card; 2])],
) -> HandSnapshot {
    let is_showdown = matches!(hand.phase(), Phase::Showdown | Phase::Complete);

    let seats = hand
        .seats()
        .iter()
        .map(|seat| {
            let hole = if Some(seat.id()) == viewer {
                seat.hole()
                    .map(|h| HoleView::Mine(h.cards()))
                    .unwrap_or(HoleView::None)
            } else if is_showdown {
                shown
                    .iter()
                    .find(|(id, _)| *id == seat.id())
                    .map(|(_, cards)| HoleView::Shown(*cards))
                    .unwrap_or(HoleView::None)
            } else if seat.hole().is_some() {
                HoleView::FaceDown
            } else {
                HoleView::None
            };
            SeatView {
                player: seat.id(),
                seat: seat.seat(),
                stack: seat.stack(),
                status: seat.status(),
                round_bet: seat.round_bet(),
                hand_bet: seat.hand_bet(),
                hole,
            }
        })
        .collect();

    let legal_actions = viewer
        .filter(|&v| hand.current_to_act() == Some(v))
        .and_then(|v| hand.seat(v))
        .map(|seat| available_actions(seat, hand.round()));

    HandSnapshot {
        phase: hand.phase(),
        button: hand.button(),
        board: hand.board().cards().to_vec(),
        second_board: hand.second_board().cards().to_vec(),
        pot_total: hand.total_pot() + hand.round().total_committed(),
        current_bet: hand.round().current_bet(),
        current_to_act: hand.current_to_act(),
        seats,
        legal_actions,
    }
}

fn available_actions(seat: &holdem_gameplay::Seat, round: &holdem_gameplay::BettingRound) -> AvailableActions {
    let kinds = holdem_gameplay::Validator::legal_actions(seat, round, true);
    let to_call = round.to_call(seat.id());
    let shove_total = seat.round_bet() + seat.stack();
    AvailableActions {
        can_fold: kinds.contains(&ActionKind::Fold),
        can_check: kinds.contains(&ActionKind::Check),
        can_call: kinds.contains(&ActionKind::Call),
        call_amount: to_call,
        can_raise: kinds.contains(&ActionKind::Raise),
        min_raise: round.min_raise_total(),
        max_raise: shove_total,
        can_all_in: kinds.contains(&ActionKind::AllIn),
        all_in_amount: shove_total,
    }
}

/// A spectator's view is identical to a seated viewer's with no hole
/// cards of their own — opponents stay face-down until showdown.
pub fn snapshot_for_spectator(hand: &Hand, shown: &[(ID<Player>, [Card; 2])]) -> HandSnapshot {
    snapshot_for_viewer(hand, None, shown)
}
