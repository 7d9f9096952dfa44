use crate::player::Player;
use holdem_core::{Chips, Error, Position, ID};
use std::collections::{HashMap, HashSet};

/// One pot a hand can award: a main pot or a side pot created when a
/// player goes all-in for less than the rest of the table.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pot {
    /// Creation order; pots are awarded main-to-last-side, in this order.
    pub sequence: u32,
    pub amount: Chips,
    pub eligible: HashSet<ID<Player>>,
}

impl Pot {
    fn new(sequence: u32) -> Self {
        Self {
            sequence,
            amount: 0,
            eligible: HashSet::new(),
        }
    }
}

/// Builds the pot layers for a hand from total per-player contributions,
/// per spec: sort contributions ascending, repeatedly peel off the
/// smallest non-zero contribution into the current layer, sealing it and
/// opening the next whenever an all-in player's contribution is used up.
/// Folded players' chips flow into whichever pot is open when their
/// contribution is peeled, without ever making them eligible.
pub fn build_pots(
    contributions: &HashMap<ID<Player>, Chips>,
    folded: &HashSet<ID<Player>>,
    all_in: &HashSet<ID<Player>>,
) -> Vec<Pot> {
    let mut remaining: Vec<(ID<Player>, Chips)> = contributions
        .iter()
        .filter(|(_, &amount)| amount > 0)
        .map(|(&id, &amount)| (id, amount))
        .collect();

    let mut pots = Vec::new();
    let mut sequence = 0u32;
    let mut current = Pot::new(sequence);

    loop {
        remaining.retain(|(_, amount)| *amount > 0);
        if remaining.is_empty() {
            break;
        }
        let smallest = remaining.iter().map(|(_, amount)| *amount).min().unwrap();

        let mut seals_here = false;
        for (id, amount) in remaining.iter_mut() {
            let peeled = smallest.min(*amount);
            current.amount += peeled;
            *amount -= peeled;
            if !folded.contains(id) {
                current.eligible.insert(*id);
            }
            if all_in.contains(id) && *amount == 0 {
                seals_here = true;
            }
        }

        if seals_here && remaining.iter().any(|(_, amount)| *amount > 0) {
            pots.push(current);
            sequence += 1;
            current = Pot::new(sequence);
        }
    }

    pots.push(current);
    pots.retain(|pot| pot.amount > 0);
    pots
}

/// Splits one pot's amount among its winners: floor share each, odd chip
/// to the winner seated closest clockwise from the button.
pub fn award_pot(
    pot: &Pot,
    winners: &[ID<Player>],
    seat_of: impl Fn(ID<Player>) -> Position,
    button: Position,
    seat_count: Position,
) -> Result<HashMap<ID<Player>, Chips>, Error> {
    if winners.is_empty() {
        return Err(Error::invalid_state("pot has no winner to award to"));
    }
    let share = pot.amount / winners.len() as Chips;
    let mut remainder = pot.amount - share * winners.len() as Chips;

    let mut ordered = winners.to_vec();
    ordered.sort_by_key(|&id| {
        let seat = seat_of(id);
        (seat + seat_count - button - 1) % seat_count
    });

    let mut awards = HashMap::new();
    for &id in &ordered {
        let mut amount = share;
        if remainder > 0 {
            amount += 1;
            remainder -= 1;
        }
        awards.insert(id, amount);
    }

    let total_awarded: Chips = awards.values().sum();
    if total_awarded != pot.amount {
        return Err(Error::invalid_state(format!(
            "awarded {total_awarded} does not match pot total {}",
            pot.amount
        )));
    }
    Ok(awards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pot_when_nobody_is_all_in() {
        let a = ID::new();
        let b = ID::new();
        let contributions = HashMap::from([(a, 10), (b, 10)]);
        let pots = build_pots(&contributions, &HashSet::new(), &HashSet::new());
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 20);
        assert!(pots[0].eligible.contains(&a));
        assert!(pots[0].eligible.contains(&b));
    }

    #[test]
    fn three_way_side_pots_match_spec_scenario() {
        // Stacks 10/50/200, blinds 1/2, all three end up all the way in:
        // A for 10, B for 50, C for the full 200.
        let a = ID::new();
        let b = ID::new();
        let c = ID::new();
        let contributions = HashMap::from([(a, 10), (b, 50), (c, 200)]);
        let all_in = HashSet::from([a, b]);
        let pots = build_pots(&contributions, &HashSet::new(), &all_in);
        assert_eq!(pots.len(), 3);
        assert_eq!(pots[0].amount, 30); // 10 * 3, main pot
        assert_eq!(pots[0].eligible, HashSet::from([a, b, c]));
        assert_eq!(pots[1].amount, 80); // 40 * 2, side pot 1
        assert_eq!(pots[1].eligible, HashSet::from([b, c]));
        assert_eq!(pots[2].amount, 150); // the rest, returned to C alone
        assert_eq!(pots[2].eligible, HashSet::from([c]));
    }

    #[test]
    fn folded_contribution_flows_into_open_pot_without_eligibility() {
        let a = ID::new();
        let b = ID::new();
        let folded_player = ID::new();
        let contributions = HashMap::from([(a, 10), (b, 10), (folded_player, 10)]);
        let folded = HashSet::from([folded_player]);
        let pots = build_pots(&contributions, &folded, &HashSet::new());
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 30);
        assert!(!pots[0].eligible.contains(&folded_player));
    }

    #[test]
    fn odd_chip_goes_to_winner_closest_clockwise_from_button() {
        let a = ID::new();
        let b = ID::new();
        let pot = Pot {
            sequence: 0,
            amount: 3,
            eligible: HashSet::from([a, b]),
        };
        let seat_of = |id: ID<Player>| if id == a { 2 } else { 5 };
        let awards = award_pot(&pot, &[a, b], seat_of, 1, 6).unwrap();
        // button = 1, clockwise order: seat 2 (a) is first after the button.
        assert_eq!(awards[&a], 2);
        assert_eq!(awards[&b], 1);
    }

    #[test]
    fn mismatched_award_total_is_rejected() {
        let a = ID::new();
        let pot = Pot {
            sequence: 0,
            amount: 10,
            eligible: HashSet::from([a]),
        };
        // Forcing an impossible split: zero winners.
        let result = award_pot(&pot, &[], |_| 0, 0, 1);
        assert!(result.is_err());
    }
}
