use super::rank::Rank;
use super::suit::Suit;

/// A single playing card, encoded as `rank * 4 + suit` in one byte — a
/// bijection onto `0..52` that sorts first by rank, then by suit.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card(u8);

impl Card {
    pub fn rank(&self) -> Rank {
        Rank::from(self.0 / 4)
    }
    pub fn suit(&self) -> Suit {
        Suit::from(self.0 % 4)
    }
}

impl From<(Rank, Suit)> for Card {
    fn from((r, s): (Rank, Suit)) -> Self {
        Self(u8::from(r) * 4 + u8::from(s))
    }
}

impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        c.0
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        debug_assert!(n < 52, "card index out of range: {n}");
        Self(n)
    }
}

/// One-way bit-position morphism used by [`super::hand::Hand`]'s 52-bit
/// set representation.
impl From<Card> for u64 {
    fn from(c: Card) -> u64 {
        1 << u8::from(c)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.rank(), self.suit())
    }
}

impl TryFrom<&str> for Card {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().len() {
            2 => {
                let rank = Rank::try_from(&s.trim()[0..1])?;
                let suit = Suit::try_from(&s.trim()[1..2])?;
                Ok(Card::from((rank, suit)))
            }
            _ => Err("card notation must be exactly 2 characters".into()),
        }
    }
}
impl Card {
    /// Parses whitespace-separated (or simply concatenated) two-character
    /// card notations, e.g. `"As Kd"` or `"AsKd"`.
    pub fn parse(s: &str) -> Result<Vec<Self>, String> {
        s.replace(char::is_whitespace, "")
            .chars()
            .collect::<Vec<_>>()
            .chunks(2)
            .map(|pair| pair.iter().collect::<String>())
            .map(|pair| Self::try_from(pair.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_rank_suit() {
        let card = Card::from((Rank::Ace, Suit::S));
        assert_eq!(card, Card::from((card.rank(), card.suit())));
    }

    #[test]
    fn bijective_u8() {
        let card = Card::from((Rank::Ten, Suit::C));
        assert_eq!(card, Card::from(u8::from(card)));
    }

    #[test]
    fn parses_notation() {
        let cards = Card::parse("As Kd Tc").unwrap();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0], Card::from((Rank::Ace, Suit::S)));
        assert_eq!(cards[1], Card::from((Rank::King, Suit::D)));
        assert_eq!(cards[2], Card::from((Rank::Ten, Suit::C)));
    }

    #[test]
    fn rejects_bad_notation() {
        assert!(Card::try_from("Zz").is_err());
        assert!(Card::try_from("A").is_err());
    }

    #[test]
    fn display_roundtrips_through_parse() {
        let card = Card::from((Rank::Queen, Suit::H));
        let rendered = card.to_string();
        assert_eq!(Card::parse(&rendered).unwrap(), vec![card]);
    }
}
