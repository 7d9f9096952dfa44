use holdem_core::Error;

/// The per-hand phase state machine. Transitions go strictly forward,
/// with a shortcut to `Complete` from any betting street once the hand
/// is decided without a showdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    Complete,
}

impl Phase {
    /// True for the streets where a bet round resets on entry.
    pub fn is_betting_street(&self) -> bool {
        matches!(self, Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River)
    }

    /// Validates a transition to `next`, given the board size `next` would
    /// require. `board_len` is the number of community cards already dealt
    /// (checked before the street's own deal, so Turn requires the flop's
    /// 3 to already be on board).
    pub fn transition_to(&self, next: Phase, board_len: usize) -> Result<Phase, Error> {
        if *self == Phase::Complete {
            return Err(Error::invalid_state("hand is already complete"));
        }
        if next == Phase::Complete {
            // The shortcut is legal from any betting street or Showdown.
            return Ok(Phase::Complete);
        }
        let allowed = matches!(
            (self, next),
            (Phase::Waiting, Phase::Preflop)
                | (Phase::Preflop, Phase::Flop)
                | (Phase::Flop, Phase::Turn)
                | (Phase::Turn, Phase::River)
                | (Phase::River, Phase::Showdown)
        );
        if !allowed {
            return Err(Error::invalid_state(format!(
                "illegal phase transition {self:?} -> {next:?}"
            )));
        }
        let required_board = match next {
            Phase::Turn => 3,
            Phase::River => 4,
            _ => 0,
        };
        if board_len < required_board {
            return Err(Error::invalid_state(format!(
                "entering {next:?} requires {required_board} board cards, got {board_len}"
            )));
        }
        Ok(next)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflop_to_flop_is_allowed() {
        assert_eq!(
            Phase::Preflop.transition_to(Phase::Flop, 0).unwrap(),
            Phase::Flop
        );
    }

    #[test]
    fn skipping_a_street_is_rejected() {
        let err = Phase::Preflop.transition_to(Phase::Turn, 3).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn turn_requires_three_board_cards() {
        let err = Phase::Flop.transition_to(Phase::Turn, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert!(Phase::Flop.transition_to(Phase::Turn, 3).is_ok());
    }

    #[test]
    fn shortcut_to_complete_allowed_from_any_betting_street() {
        assert!(Phase::Preflop.transition_to(Phase::Complete, 0).is_ok());
        assert!(Phase::River.transition_to(Phase::Complete, 4).is_ok());
    }

    #[test]
    fn complete_is_terminal() {
        let err = Phase::Complete.transition_to(Phase::Showdown, 5).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }
}
