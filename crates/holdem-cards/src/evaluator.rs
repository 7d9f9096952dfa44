use super::card::Card;
use super::hand::Hand;
use super::kickers::Kickers;
use super::rank::Rank;
use super::ranking::Ranking;
use super::strength::Strength;
use super::suit::Suit;
use holdem_core::Error;

/// Evaluates a 5-7 card hand by bitwise search over its rank/suit masks,
/// strongest category first.
pub struct Evaluator(Hand);

impl From<Hand> for Evaluator {
    fn from(h: Hand) -> Self {
        Self(h)
    }
}

impl Evaluator {
    /// Evaluates `cards` (5, 6, or 7 of them) into a full `Strength`,
    /// including the best five concrete cards. Fails with `InvalidInput`
    /// on any other card count.
    pub fn evaluate(cards: &[Card]) -> Result<Strength, Error> {
        if !(5..=7).contains(&cards.len()) {
            return Err(Error::invalid_input(format!(
                "evaluator needs 5-7 cards, got {}",
                cards.len()
            )));
        }
        let evaluator = Evaluator::from(Hand::from(cards));
        let ranking = evaluator.find_ranking();
        let kickers = evaluator.find_kickers(ranking);
        let best_five = evaluator.find_best_five(cards, ranking);
        Ok(Strength::new(ranking, kickers, best_five))
    }

    fn find_ranking(&self) -> Ranking {
        None.or_else(|| self.find_flush())
            .or_else(|| self.find_4_oak())
            .or_else(|| self.find_3_oak_2_oak())
            .or_else(|| self.find_straight())
            .or_else(|| self.find_3_oak())
            .or_else(|| self.find_2_oak_2_oak())
            .or_else(|| self.find_2_oak())
            .or_else(|| self.find_1_oak())
            .expect("at least one card in hand")
    }

    fn find_kickers(&self, value: Ranking) -> Kickers {
        let n = value.n_kickers();
        if n == 0 {
            return Kickers::from(0u16);
        }
        let mask = value.mask();
        let mut bits = !mask & self.rank_masks();
        while bits.count_ones() as usize > n {
            bits &= !(1 << bits.trailing_zeros());
        }
        Kickers::from(bits)
    }

    fn find_1_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(1).map(Ranking::HighCard)
    }
    fn find_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(2).map(Ranking::OnePair)
    }
    fn find_3_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(3).map(Ranking::ThreeOAK)
    }
    fn find_4_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(4).map(Ranking::FourOAK)
    }
    fn find_2_oak_2_oak(&self) -> Option<Ranking> {
        let hi = self.find_rank_of_n_oak(2)?;
        let lo = self.find_rank_of_n_oak_under(2, Some(hi))?;
        Some(Ranking::TwoPair(hi, lo))
    }
    fn find_3_oak_2_oak(&self) -> Option<Ranking> {
        self.find_rank_of_n_oak(3).and_then(|trips| {
            self.find_rank_of_n_oak_under(2, Some(trips))
                .map(|pair| Ranking::FullHouse(trips, pair))
        })
    }
    fn find_straight(&self) -> Option<Ranking> {
        self.find_rank_of_straight(self.rank_masks())
            .map(Ranking::Straight)
    }
    fn find_flush(&self) -> Option<Ranking> {
        self.find_suit_of_flush().map(|suit| {
            self.find_rank_of_straight_flush(suit)
                .map(Ranking::StraightFlush)
                .unwrap_or_else(|| {
                    let bits = self.suit_masks()[suit as usize];
                    Ranking::Flush(Rank::from(bits))
                })
        })
    }

    fn find_rank_of_straight(&self, mask: u16) -> Option<Rank> {
        const WHEEL: u16 = 0b_1_0000_0000_1111;
        let mut bits = mask;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        if bits > 0 {
            Some(Rank::from(bits))
        } else if mask & WHEEL == WHEEL {
            Some(Rank::Five)
        } else {
            None
        }
    }
    fn find_rank_of_straight_flush(&self, suit: Suit) -> Option<Rank> {
        self.find_rank_of_straight(self.suit_masks()[suit as usize])
    }
    fn find_suit_of_flush(&self) -> Option<Suit> {
        self.suit_count()
            .iter()
            .position(|&n| n >= 5)
            .map(|i| Suit::from(i as u8))
    }
    fn find_rank_of_n_oak_under(&self, oak: usize, below: Option<Rank>) -> Option<Rank> {
        let ceiling = below.map(u8::from).unwrap_or(13) as u64;
        let below_ceiling = (1u64 << (4 * ceiling)) - 1;
        let hand = u64::from(self.0) & below_ceiling;
        let mut mask = 0b1111u64 << (4 * ceiling) >> 4;
        while mask > 0 {
            if oak <= (hand & mask).count_ones() as usize {
                let rank = (mask.trailing_zeros() / 4) as u8;
                return Some(Rank::from(rank));
            }
            mask >>= 4;
        }
        None
    }
    fn find_rank_of_n_oak(&self, n: usize) -> Option<Rank> {
        self.find_rank_of_n_oak_under(n, None)
    }

    /// Which ranks are present in the hand, ignoring suit.
    fn rank_masks(&self) -> u16 {
        Vec::<Card>::from(self.0)
            .iter()
            .map(|c| u16::from(c.rank()))
            .fold(0, |acc, r| acc | r)
    }
    /// How many cards of each suit are in the hand, ignoring rank.
    fn suit_count(&self) -> [u8; 4] {
        Vec::<Card>::from(self.0)
            .iter()
            .map(|c| u8::from(c.suit()))
            .fold([0; 4], |mut counts, s| {
                counts[s as usize] += 1;
                counts
            })
    }
    /// Which ranks are present in the hand, grouped by suit.
    fn suit_masks(&self) -> [u16; 4] {
        Vec::<Card>::from(self.0)
            .iter()
            .map(|c| (u8::from(c.suit()), u16::from(c.rank())))
            .fold([0; 4], |mut suits, (s, r)| {
                suits[s as usize] |= r;
                suits
            })
    }

    /// Reconstructs a concrete best-five-card selection from the
    /// original (non-bitmask) card list, given the winning `Ranking`.
    /// Several concrete selections can be equally strong (e.g. flushes
    /// in different suits never coexist, but kicker suits are
    /// interchangeable) — any one of them is a valid witness.
    fn find_best_five(&self, cards: &[Card], ranking: Ranking) -> Vec<Card> {
        let of_rank = |rank: Rank| -> Vec<Card> {
            let mut matched: Vec<Card> = cards.iter().copied().filter(|c| c.rank() == rank).collect();
            matched.sort();
            matched
        };
        let top_by_rank = |exclude: &[Card], n: usize| -> Vec<Card> {
            let mut remaining: Vec<Card> = cards
                .iter()
                .copied()
                .filter(|c| !exclude.contains(c))
                .collect();
            remaining.sort_by(|a, b| b.rank().cmp(&a.rank()));
            remaining.into_iter().take(n).collect()
        };
        let straight_ending_at = |hi: Rank, suited: Option<Suit>| -> Vec<Card> {
            let ranks: Vec<Rank> = if hi == Rank::Five {
                vec![Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five]
            } else {
                let top = u8::from(hi);
                (top - 4..=top).map(Rank::from).collect()
            };
            ranks
                .into_iter()
                .filter_map(|r| {
                    cards
                        .iter()
                        .copied()
                        .find(|c| c.rank() == r && suited.map_or(true, |s| c.suit() == s))
                })
                .collect()
        };

        match ranking {
            Ranking::StraightFlush(hi) => {
                let suit = self.find_suit_of_flush().expect("flush suit present");
                straight_ending_at(hi, Some(suit))
            }
            Ranking::FourOAK(r) => {
                let mut hand = of_rank(r);
                hand.extend(top_by_rank(&hand, 1));
                hand
            }
            Ranking::FullHouse(hi, lo) => {
                let mut hand = of_rank(hi);
                hand.truncate(3);
                let mut pair = of_rank(lo);
                pair.truncate(2);
                hand.extend(pair);
                hand
            }
            Ranking::Flush(_) => {
                let suit = self.find_suit_of_flush().expect("flush suit present");
                let mut suited: Vec<Card> = cards.iter().copied().filter(|c| c.suit() == suit).collect();
                suited.sort_by(|a, b| b.rank().cmp(&a.rank()));
                suited.into_iter().take(5).collect()
            }
            Ranking::Straight(hi) => straight_ending_at(hi, None),
            Ranking::ThreeOAK(r) => {
                let mut hand = of_rank(r);
                hand.truncate(3);
                hand.extend(top_by_rank(&hand, 2));
                hand
            }
            Ranking::TwoPair(hi, lo) => {
                let mut hi_pair = of_rank(hi);
                hi_pair.truncate(2);
                let mut lo_pair = of_rank(lo);
                lo_pair.truncate(2);
                let mut hand = hi_pair;
                hand.extend(lo_pair);
                let exclude = hand.clone();
                hand.extend(top_by_rank(&exclude, 1));
                hand
            }
            Ranking::OnePair(r) => {
                let mut hand = of_rank(r);
                hand.truncate(2);
                hand.extend(top_by_rank(&hand, 3));
                hand
            }
            Ranking::HighCard(_) => top_by_rank(&[], 5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Suit;

    fn evaluate(cards: Vec<(Rank, Suit)>) -> Strength {
        let cards: Vec<Card> = cards.into_iter().map(Card::from).collect();
        Evaluator::evaluate(&cards).unwrap()
    }

    #[test]
    fn rejects_wrong_card_counts() {
        let cards = vec![Card::from((Rank::Ace, Suit::S)); 3];
        assert!(matches!(
            Evaluator::evaluate(&cards),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn high_card() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::King, Suit::H),
            (Rank::Queen, Suit::D),
            (Rank::Jack, Suit::C),
            (Rank::Nine, Suit::S),
        ];
        let s = evaluate(hand);
        assert_eq!(s.ranking(), Ranking::HighCard(Rank::Ace));
        assert_eq!(s.best_five().len(), 5);
    }

    #[test]
    fn one_pair() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Ace, Suit::H),
            (Rank::King, Suit::D),
            (Rank::Queen, Suit::C),
            (Rank::Jack, Suit::S),
        ];
        assert_eq!(evaluate(hand).ranking(), Ranking::OnePair(Rank::Ace));
    }

    #[test]
    fn two_pair() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Ace, Suit::H),
            (Rank::King, Suit::D),
            (Rank::King, Suit::C),
            (Rank::Queen, Suit::S),
        ];
        assert_eq!(
            evaluate(hand).ranking(),
            Ranking::TwoPair(Rank::Ace, Rank::King)
        );
    }

    #[test]
    fn full_house_beats_flush() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Ace, Suit::H),
            (Rank::Ace, Suit::D),
            (Rank::King, Suit::S),
            (Rank::King, Suit::H),
            (Rank::Queen, Suit::S),
            (Rank::Jack, Suit::S),
        ];
        assert_eq!(
            evaluate(hand).ranking(),
            Ranking::FullHouse(Rank::Ace, Rank::King)
        );
    }

    #[test]
    fn four_oak_beats_full_house() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Ace, Suit::H),
            (Rank::Ace, Suit::D),
            (Rank::Ace, Suit::C),
            (Rank::King, Suit::S),
            (Rank::King, Suit::H),
            (Rank::Queen, Suit::D),
        ];
        assert_eq!(evaluate(hand).ranking(), Ranking::FourOAK(Rank::Ace));
    }

    #[test]
    fn straight() {
        let hand = vec![
            (Rank::Ten, Suit::S),
            (Rank::Jack, Suit::H),
            (Rank::Queen, Suit::D),
            (Rank::King, Suit::C),
            (Rank::Ace, Suit::S),
        ];
        let s = evaluate(hand);
        assert_eq!(s.ranking(), Ranking::Straight(Rank::Ace));
        assert_eq!(s.best_five().len(), 5);
    }

    #[test]
    fn wheel_straight() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Two, Suit::H),
            (Rank::Three, Suit::D),
            (Rank::Four, Suit::C),
            (Rank::Five, Suit::S),
        ];
        let s = evaluate(hand);
        assert_eq!(s.ranking(), Ranking::Straight(Rank::Five));
        assert_eq!(s.best_five().len(), 5);
    }

    #[test]
    fn wheel_straight_flush() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Two, Suit::S),
            (Rank::Three, Suit::S),
            (Rank::Four, Suit::S),
            (Rank::Five, Suit::S),
        ];
        assert_eq!(evaluate(hand).ranking(), Ranking::StraightFlush(Rank::Five));
    }

    #[test]
    fn straight_flush_beats_four_oak() {
        let hand = vec![
            (Rank::Ten, Suit::S),
            (Rank::Jack, Suit::S),
            (Rank::Queen, Suit::S),
            (Rank::King, Suit::S),
            (Rank::Ace, Suit::S),
            (Rank::Ace, Suit::H),
            (Rank::Ace, Suit::D),
        ];
        assert_eq!(
            evaluate(hand).ranking(),
            Ranking::StraightFlush(Rank::Ace)
        );
    }

    #[test]
    fn seven_card_hand_picks_best_five() {
        let hand = vec![
            (Rank::Ace, Suit::S),
            (Rank::Ace, Suit::H),
            (Rank::King, Suit::D),
            (Rank::King, Suit::C),
            (Rank::Queen, Suit::S),
            (Rank::Jack, Suit::H),
            (Rank::Nine, Suit::D),
        ];
        assert_eq!(
            evaluate(hand).ranking(),
            Ranking::TwoPair(Rank::Ace, Rank::King)
        );
    }

    #[test]
    fn equal_ranking_is_a_split() {
        let a = evaluate(vec![
            (Rank::Ace, Suit::S),
            (Rank::King, Suit::H),
            (Rank::Queen, Suit::D),
            (Rank::Jack, Suit::C),
            (Rank::Nine, Suit::S),
        ]);
        let b = evaluate(vec![
            (Rank::Ace, Suit::H),
            (Rank::King, Suit::S),
            (Rank::Queen, Suit::C),
            (Rank::Jack, Suit::D),
            (Rank::Nine, Suit::H),
        ]);
        assert_eq!(a, b);
    }
}
