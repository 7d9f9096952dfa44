use std::fmt::{Display, Formatter};

/// Community-card visibility stage, used by the deck to know how many
/// cards to reveal when a street is entered. Distinct from the hand's
/// full phase lifecycle (Waiting/.../Showdown/Complete), which lives in
/// `holdem-gameplay` — this type only tracks board visibility.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub const fn all() -> [Self; 4] {
        [Self::Preflop, Self::Flop, Self::Turn, Self::River]
    }

    /// How many community cards are newly revealed on entering this
    /// street.
    pub const fn n_revealed(&self) -> usize {
        match self {
            Self::Preflop => 0,
            Self::Flop => 3,
            Self::Turn => 1,
            Self::River => 1,
        }
    }

    /// Total community cards visible once this street is complete.
    pub const fn n_observed(&self) -> usize {
        match self {
            Self::Preflop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River => 5,
        }
    }

    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Preflop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River => None,
        }
    }
}

impl Display for Street {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Preflop => write!(f, "preflop"),
            Self::Flop => write!(f, "flop"),
            Self::Turn => write!(f, "turn"),
            Self::River => write!(f, "river"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_counts_match_standard_holdem() {
        assert_eq!(Street::Preflop.n_revealed(), 0);
        assert_eq!(Street::Flop.n_revealed(), 3);
        assert_eq!(Street::Turn.n_revealed(), 1);
        assert_eq!(Street::River.n_revealed(), 1);
        assert_eq!(Street::River.n_observed(), 5);
    }

    #[test]
    fn river_is_terminal() {
        assert_eq!(Street::River.next(), None);
    }
}
