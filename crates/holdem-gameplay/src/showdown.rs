use crate::player::Player;
use crate::pot::{award_pot, Pot};
use holdem_cards::{Board, Card, Evaluator, Hole, Strength};
use holdem_core::{Chips, Error, Position, ID};
use std::collections::{HashMap, HashSet};

/// What a showdown participant did: showed their cards (and the strength
/// that produced), or mucked without showing.
#[derive(Debug, Clone)]
pub enum ShowdownDecision {
    Shown(Strength),
    Mucked,
}

/// One player's contribution of cards to a showdown.
pub struct Contestant {
    pub id: ID<Player>,
    pub hole: Option<Hole>,
}

/// The result of running a pot's worth of showdown: who showed what, and
/// the per-pot, per-player chip awards.
pub struct ShowdownOutcome {
    pub decisions: HashMap<ID<Player>, ShowdownDecision>,
    pub awards: Vec<(u32, HashMap<ID<Player>, Chips>)>,
}

/// Order contestants show in: the last aggressor first if there was one,
/// else the first non-folded seat clockwise from the button. The rest
/// follow clockwise.
pub fn show_order(
    contestants: &[ID<Player>],
    seat_of: impl Fn(ID<Player>) -> Position,
    button: Position,
    seat_count: Position,
    last_aggressor: Option<ID<Player>>,
) -> Vec<ID<Player>> {
    let mut ordered = contestants.to_vec();
    ordered.sort_by_key(|&id| (seat_of(id) + seat_count - button - 1) % seat_count);
    if let Some(aggressor) = last_aggressor {
        if let Some(pos) = ordered.iter().position(|&id| id == aggressor) {
            ordered.rotate_left(pos);
        }
    }
    ordered
}

/// Runs the full showdown: single-player short-circuit if only one
/// contestant remains, otherwise walks `show_order`, applying the
/// mandatory-show/legal-muck rule, then awards each pot in creation
/// order among eligible shown hands.
pub fn run_showdown(
    contestants: &[Contestant],
    board: &Board,
    pots: &[Pot],
    seat_of: impl Fn(ID<Player>) -> Position,
    button: Position,
    seat_count: Position,
    last_aggressor: Option<ID<Player>>,
) -> Result<ShowdownOutcome, Error> {
    if contestants.len() == 1 {
        let winner = contestants[0].id;
        let mut awards = Vec::new();
        for pot in pots {
            let split = award_pot(pot, &[winner], &seat_of, button, seat_count)?;
            awards.push((pot.sequence, split));
        }
        let mut decisions = HashMap::new();
        decisions.insert(winner, ShowdownDecision::Mucked);
        return Ok(ShowdownOutcome { decisions, awards });
    }

    let ids: Vec<ID<Player>> = contestants.iter().map(|c| c.id).collect();
    let order = show_order(&ids, &seat_of, button, seat_count, last_aggressor);
    let holes: HashMap<ID<Player>, Option<Hole>> =
        contestants.iter().map(|c| (c.id, c.hole)).collect();

    let mut decisions: HashMap<ID<Player>, ShowdownDecision> = HashMap::new();
    let mut best_shown: Option<Strength> = None;

    for (i, &id) in order.iter().enumerate() {
        let hole = match holes.get(&id).copied().flatten() {
            Some(hole) => hole,
            None => {
                log::warn!("player {id:?} reached showdown with no recorded hole cards, skipping");
                continue;
            }
        };
        let mut cards: Vec<Card> = hole.cards().to_vec();
        cards.extend(board.cards());
        let strength = Evaluator::evaluate(&cards)?;

        let can_win_against_shown = best_shown
            .as_ref()
            .map(|best| strength <= *best)
            .unwrap_or(true);
        let must_show = i == 0 || can_win_against_shown;

        if must_show {
            if best_shown.as_ref().map(|b| strength < *b).unwrap_or(true) {
                best_shown = Some(strength.clone());
            }
            decisions.insert(id, ShowdownDecision::Shown(strength));
        } else {
            decisions.insert(id, ShowdownDecision::Mucked);
        }
    }

    let mut awards = Vec::new();
    for pot in pots {
        let mut best: Option<(&ID<Player>, &Strength)> = None;
        for id in &pot.eligible {
            if let Some(ShowdownDecision::Shown(strength)) = decisions.get(id) {
                best = match best {
                    Some((_, current)) if *current <= *strength => best,
                    _ => Some((id, strength)),
                };
            }
        }
        let Some((_, winning_strength)) = best else {
            log::warn!("pot {} has no eligible shown hand, skipping award", pot.sequence);
            continue;
        };
        let winners: Vec<ID<Player>> = pot
            .eligible
            .iter()
            .filter(|id| {
                matches!(decisions.get(id), Some(ShowdownDecision::Shown(s)) if s == winning_strength)
            })
            .copied()
            .collect();
        let split = award_pot(pot, &winners, &seat_of, button, seat_count)?;
        awards.push((pot.sequence, split));
    }

    Ok(ShowdownOutcome { decisions, awards })
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_cards::{Rank, Suit};
    use std::collections::HashSet;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::from((rank, suit))
    }

    #[test]
    fn single_contestant_short_circuits_without_showing() {
        let winner = ID::new();
        let contestants = vec![Contestant { id: winner, hole: None }];
        let pot = Pot {
            sequence: 0,
            amount: 30,
            eligible: HashSet::from([winner]),
        };
        let board = Board::default();
        let outcome = run_showdown(
            &contestants,
            &board,
            &[pot],
            |_| 0,
            0,
            2,
            None,
        )
        .unwrap();
        assert_eq!(outcome.awards.len(), 1);
        assert_eq!(outcome.awards[0].1[&winner], 30);
    }

    #[test]
    fn show_order_starts_with_last_aggressor() {
        let a = ID::new();
        let b = ID::new();
        let c = ID::new();
        let seat_of = |id: ID<Player>| if id == a { 0 } else if id == b { 1 } else { 2 };
        let order = show_order(&[a, b, c], seat_of, 0, 3, Some(c));
        assert_eq!(order[0], c);
    }

    #[test]
    fn best_hand_wins_the_pot() {
        let winner = ID::new();
        let loser = ID::new();
        let mut board = Board::new();
        board.extend([
            card(Rank::Two, Suit::C),
            card(Rank::Seven, Suit::D),
            card(Rank::Nine, Suit::H),
            card(Rank::Jack, Suit::S),
            card(Rank::King, Suit::C),
        ]);
        let winner_hole = Hole::from((card(Rank::Ace, Suit::C), card(Rank::Ace, Suit::D)));
        let loser_hole = Hole::from((card(Rank::Three, Suit::H), card(Rank::Four, Suit::S)));
        let contestants = vec![
            Contestant { id: winner, hole: Some(winner_hole) },
            Contestant { id: loser, hole: Some(loser_hole) },
        ];
        let pot = Pot {
            sequence: 0,
            amount: 20,
            eligible: HashSet::from([winner, loser]),
        };
        let seat_of = |id: ID<Player>| if id == winner { 0 } else { 1 };
        let outcome = run_showdown(&contestants, &board, &[pot], seat_of, 0, 2, None).unwrap();
        assert_eq!(outcome.awards[0].1[&winner], 20);
        assert!(!outcome.awards[0].1.contains_key(&loser));
    }
}
