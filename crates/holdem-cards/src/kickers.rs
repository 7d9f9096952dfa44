use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// The kicker ranks that break a tie between two hands of identical
/// `Ranking`, packed as a 13-bit rank mask.
///
/// `Ord` is inverted relative to the raw bitmask: a numerically larger
/// mask (higher kickers set) is a *stronger* hand, and per the core's
/// "lower is stronger" convention that must compare as *less*.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kickers(u16);

impl From<u16> for Kickers {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}
impl From<Kickers> for u16 {
    fn from(k: Kickers) -> Self {
        k.0
    }
}

impl Ord for Kickers {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.cmp(&self.0)
    }
}
impl PartialOrd for Kickers {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Kickers {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{:013b}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_kicker_mask_compares_as_stronger() {
        let strong = Kickers::from(0b1_0000_0000_0000);
        let weak = Kickers::from(0b0_1000_0000_0000);
        assert!(strong < weak);
    }
}
