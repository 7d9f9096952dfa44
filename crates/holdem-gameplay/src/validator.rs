use crate::action::{Action, ActionKind, ValidatedAction};
use crate::betting_round::BettingRound;
use crate::player::{PlayerStatus, Seat};
use holdem_core::Error;

/// Derives legal actions and validates intents against a seat's state and
/// the current betting round. Never mutates either; callers apply the
/// returned `ValidatedAction` themselves.
pub struct Validator;

impl Validator {
    /// The set of action kinds `seat` may legally take right now.
    pub fn legal_actions(seat: &Seat, round: &BettingRound, is_players_turn: bool) -> Vec<ActionKind> {
        if !is_players_turn || seat.status() != PlayerStatus::Active {
            return Vec::new();
        }
        let to_call = round.to_call(seat.id());
        let mut kinds = vec![ActionKind::Fold];
        if to_call == 0 {
            kinds.push(ActionKind::Check);
        } else {
            kinds.push(ActionKind::Call);
        }
        if seat.stack() > 0 {
            let shove_total = seat.round_bet() + seat.stack();
            if shove_total >= round.min_raise_total() || shove_total > round.current_bet() {
                kinds.push(ActionKind::Raise);
            }
            kinds.push(ActionKind::AllIn);
        }
        kinds
    }

    /// Validates `action` for `seat` against `round`, returning the
    /// effect it would have without applying it.
    pub fn validate(
        seat: &Seat,
        round: &BettingRound,
        is_players_turn: bool,
        action: Action,
    ) -> Result<ValidatedAction, Error> {
        if !is_players_turn {
            return Err(Error::validation_rejected("not this player's turn to act"));
        }
        if seat.status() != PlayerStatus::Active {
            return Err(Error::validation_rejected(format!(
                "seat is {:?}, not Active",
                seat.status()
            )));
        }

        let to_call = round.to_call(seat.id());
        let shove_total = seat.round_bet() + seat.stack();

        match action {
            Action::Fold => Ok(ValidatedAction {
                kind: ActionKind::Fold,
                amount_added: 0,
                new_round_bet: seat.round_bet(),
                is_raise: false,
                remaining_stack: seat.stack(),
            }),

            Action::Check => {
                if to_call != 0 {
                    return Err(Error::validation_rejected(format!(
                        "cannot check, {to_call} owed to call"
                    )));
                }
                Ok(ValidatedAction {
                    kind: ActionKind::Check,
                    amount_added: 0,
                    new_round_bet: seat.round_bet(),
                    is_raise: false,
                    remaining_stack: seat.stack(),
                })
            }

            Action::Call => {
                if to_call == 0 {
                    return Err(Error::validation_rejected("nothing to call, use check"));
                }
                if to_call >= seat.stack() {
                    // Calling would exhaust the stack: collapses to all-in.
                    return Ok(ValidatedAction {
                        kind: ActionKind::AllIn,
                        amount_added: seat.stack(),
                        new_round_bet: shove_total,
                        is_raise: shove_total > round.current_bet(),
                        remaining_stack: 0,
                    });
                }
                Ok(ValidatedAction {
                    kind: ActionKind::Call,
                    amount_added: to_call,
                    new_round_bet: seat.round_bet() + to_call,
                    is_raise: false,
                    remaining_stack: seat.stack() - to_call,
                })
            }

            Action::Raise(to) => {
                if to > shove_total {
                    return Err(Error::validation_rejected(format!(
                        "raise to {to} exceeds available stack (max {shove_total})"
                    )));
                }
                let is_short_all_in = to == shove_total && to < round.min_raise_total();
                if to < round.min_raise_total() && !is_short_all_in {
                    return Err(Error::validation_rejected(format!(
                        "raise to {to} is below the minimum raise total {}",
                        round.min_raise_total()
                    )));
                }
                let amount_added = to - seat.round_bet();
                let remaining_stack = seat.stack() - amount_added;
                Ok(ValidatedAction {
                    kind: if remaining_stack == 0 {
                        ActionKind::AllIn
                    } else {
                        ActionKind::Raise
                    },
                    amount_added,
                    new_round_bet: to,
                    is_raise: true,
                    remaining_stack,
                })
            }

            Action::AllIn => {
                if seat.stack() == 0 {
                    return Err(Error::validation_rejected("no chips left to push all-in"));
                }
                Ok(ValidatedAction {
                    kind: ActionKind::AllIn,
                    amount_added: seat.stack(),
                    new_round_bet: shove_total,
                    is_raise: shove_total > round.current_bet(),
                    remaining_stack: 0,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdem_core::ID;

    fn active_seat(stack: i64, round_bet: i64) -> Seat {
        let mut seat = Seat::new(ID::new(), 0, stack + round_bet);
        seat.set_status(PlayerStatus::Active);
        seat.commit(round_bet);
        seat
    }

    #[test]
    fn check_rejected_when_facing_a_bet() {
        let seat = active_seat(100, 0);
        let round = BettingRound::preflop(ID::new(), 1, ID::new(), 2);
        let err = Validator::validate(&seat, &round, true, Action::Check).unwrap_err();
        assert!(matches!(err, Error::ValidationRejected(_)));
    }

    #[test]
    fn call_exceeding_stack_collapses_to_all_in() {
        let seat = active_seat(5, 0);
        let round = BettingRound::preflop(ID::new(), 1, ID::new(), 10);
        let validated = Validator::validate(&seat, &round, true, Action::Call).unwrap();
        assert_eq!(validated.kind, ActionKind::AllIn);
        assert_eq!(validated.remaining_stack, 0);
    }

    #[test]
    fn short_all_in_raise_is_accepted_but_not_a_full_raise() {
        let seat = active_seat(14, 0);
        let mut round = BettingRound::new(2);
        round.record_raise(ID::new(), 10);
        let validated = Validator::validate(&seat, &round, true, Action::Raise(14)).unwrap();
        assert_eq!(validated.kind, ActionKind::AllIn);
        assert_eq!(validated.new_round_bet, 14);
    }

    #[test]
    fn raise_below_min_raise_total_is_rejected_when_not_a_shove() {
        let seat = active_seat(100, 0);
        let mut round = BettingRound::new(2);
        round.record_raise(ID::new(), 10);
        let err = Validator::validate(&seat, &round, true, Action::Raise(14)).unwrap_err();
        assert!(matches!(err, Error::ValidationRejected(_)));
    }

    #[test]
    fn not_players_turn_rejects_everything() {
        let seat = active_seat(100, 0);
        let round = BettingRound::new(2);
        let err = Validator::validate(&seat, &round, false, Action::Fold).unwrap_err();
        assert!(matches!(err, Error::ValidationRejected(_)));
    }

    #[test]
    fn legal_actions_for_unopened_round_excludes_call() {
        let seat = active_seat(100, 0);
        let round = BettingRound::new(2);
        let kinds = Validator::legal_actions(&seat, &round, true);
        assert!(kinds.contains(&ActionKind::Check));
        assert!(!kinds.contains(&ActionKind::Call));
    }
}
