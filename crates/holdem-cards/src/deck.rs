use super::card::Card;
use super::hand::Hand;
use super::hole::Hole;
use super::street::Street;
use holdem_core::Error;
use rand::rngs::OsRng;
use rand::TryRngCore;

/// An ordered sequence of the 52 unique cards plus a deal cursor.
///
/// Dealing advances the cursor rather than removing cards from the
/// vector, so a deck can be cheaply re-shuffled in place between hands.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    cursor: usize,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// A fresh, unshuffled 52-card deck.
    pub fn new() -> Self {
        Self {
            cards: (0u8..52).map(Card::from).collect(),
            cursor: 0,
        }
    }

    /// A freshly shuffled 52-card deck, ready to deal from the top.
    pub fn shuffled() -> Self {
        let mut deck = Self::new();
        deck.shuffle();
        deck
    }

    /// Fisher-Yates shuffle: for `i` from `n-1` down to `1`, draw `j`
    /// uniformly from `[0, i]` and swap `cards[i]` with `cards[j]`.
    /// `j` is drawn by rejection sampling against a cryptographically
    /// secure source, not `rng() % (i + 1)` — the modulo reduction would
    /// bias low indices whenever `i + 1` doesn't evenly divide the
    /// generator's output range. Resets the deal cursor to the top.
    pub fn shuffle(&mut self) {
        self.cursor = 0;
        for i in (1..self.cards.len()).rev() {
            let j = uniform_below(i as u64 + 1) as usize;
            self.cards.swap(i, j);
        }
    }

    /// Deals one card, advancing the cursor.
    pub fn deal(&mut self) -> Result<Card, Error> {
        let card = *self
            .cards
            .get(self.cursor)
            .ok_or_else(|| Error::invalid_state("dealt past the end of the deck"))?;
        self.cursor += 1;
        Ok(card)
    }

    /// Deals and discards one card.
    pub fn burn(&mut self) -> Result<(), Error> {
        self.deal().map(|_| ())
    }

    pub fn hole(&mut self) -> Result<Hole, Error> {
        let a = self.deal()?;
        let b = self.deal()?;
        Ok(Hole::from((a, b)))
    }

    /// Deals the cards newly revealed by entering `street` (3 for the
    /// flop, 1 for turn/river). Burning is the orchestrator's call, not
    /// the deck's — whether to burn before a board card is a game rule,
    /// not a deck invariant.
    pub fn reveal(&mut self, street: Street) -> Result<Vec<Card>, Error> {
        (0..street.n_revealed()).map(|_| self.deal()).collect()
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }

    /// Verifies this deck's cards are a permutation of the standard
    /// 52-card multiset: the right length, and no duplicates.
    pub fn is_permutation(&self) -> bool {
        self.cards.len() == 52 && Hand::from(self.cards.clone()).size() == 52
    }
}

/// Draws a uniformly distributed value in `[0, bound)` from a
/// cryptographically secure source, rejecting draws that would
/// introduce modulo bias.
fn uniform_below(bound: u64) -> u64 {
    debug_assert!(bound > 0);
    let limit = (u64::MAX / bound) * bound;
    let mut rng = OsRng;
    loop {
        let draw = rng.try_next_u64().expect("OS entropy source is unavailable");
        if draw < limit {
            return draw % bound;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_preserves_multiset() {
        let mut deck = Deck::new();
        deck.shuffle();
        assert!(deck.is_permutation());
    }

    #[test]
    fn double_shuffle_preserves_multiset() {
        let mut deck = Deck::new();
        deck.shuffle();
        deck.shuffle();
        assert!(deck.is_permutation());
    }

    #[test]
    fn deal_advances_cursor_and_never_repeats() {
        let mut deck = Deck::shuffled();
        let mut seen = Hand::empty();
        for _ in 0..52 {
            let card = deck.deal().unwrap();
            assert!(!seen.contains(&card));
            seen = seen.add(Hand::from(card));
        }
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn dealing_past_the_end_is_invalid_state() {
        let mut deck = Deck::shuffled();
        for _ in 0..52 {
            deck.deal().unwrap();
        }
        assert!(matches!(deck.deal(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn reveal_counts_match_street() {
        let mut deck = Deck::shuffled();
        assert_eq!(deck.reveal(Street::Flop).unwrap().len(), 3);
        assert_eq!(deck.reveal(Street::Turn).unwrap().len(), 1);
        assert_eq!(deck.reveal(Street::River).unwrap().len(), 1);
    }

    #[test]
    fn shuffle_resets_cursor() {
        let mut deck = Deck::shuffled();
        deck.deal().unwrap();
        deck.deal().unwrap();
        deck.shuffle();
        assert_eq!(deck.remaining(), 52);
    }
}
