use crate::player::Player;
use holdem_core::{Chips, ID};
use std::collections::{HashMap, HashSet};

/// The betting state for one street: per-player committed amounts plus
/// the bookkeeping needed to compute legal raise sizes.
///
/// A short all-in (below `min_raise`) updates `current_bet` but leaves
/// `min_raise` untouched, so it does not reopen betting for players who
/// already matched the prior bet.
#[derive(Debug, Clone)]
pub struct BettingRound {
    ledger: HashMap<ID<Player>, Chips>,
    /// Players who have taken a voluntary action (or been force-folded)
    /// this street. Separate from `ledger`: a blind is credited to the
    /// ledger without the poster having acted, so the big blind still
    /// gets the option preflop even though their bet already matches.
    acted: HashSet<ID<Player>>,
    current_bet: Chips,
    min_raise: Chips,
    raise_count: u32,
    last_aggressor: Option<ID<Player>>,
}

impl BettingRound {
    /// An empty round (postflop streets), seeded with the minimum legal
    /// raise increment — normally the big blind.
    pub fn new(min_raise: Chips) -> Self {
        Self {
            ledger: HashMap::new(),
            acted: HashSet::new(),
            current_bet: 0,
            min_raise,
            raise_count: 0,
            last_aggressor: None,
        }
    }

    /// Preflop round with both blinds pre-credited. Neither blind poster
    /// counts as having acted yet — the big blind still holds the option.
    pub fn preflop(
        sb: ID<Player>,
        sb_amount: Chips,
        bb: ID<Player>,
        bb_amount: Chips,
    ) -> Self {
        let mut ledger = HashMap::new();
        ledger.insert(sb, sb_amount);
        ledger.insert(bb, bb_amount);
        Self {
            ledger,
            acted: HashSet::new(),
            current_bet: bb_amount,
            min_raise: bb_amount,
            raise_count: 0,
            last_aggressor: None,
        }
    }

    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }
    pub fn min_raise(&self) -> Chips {
        self.min_raise
    }
    pub fn raise_count(&self) -> u32 {
        self.raise_count
    }
    pub fn last_aggressor(&self) -> Option<ID<Player>> {
        self.last_aggressor
    }

    /// Total round-bet recorded for `player`, or 0 if they haven't acted
    /// this street.
    pub fn bet_of(&self, player: ID<Player>) -> Chips {
        self.ledger.get(&player).copied().unwrap_or(0)
    }

    /// Chips `player` still needs to add to match the current bet.
    pub fn to_call(&self, player: ID<Player>) -> Chips {
        (self.current_bet - self.bet_of(player)).max(0)
    }

    /// Total round-bet a raise must reach to be a full (reopening) raise.
    pub fn min_raise_total(&self) -> Chips {
        self.current_bet + self.min_raise
    }

    pub fn record_fold(&mut self, player: ID<Player>) {
        self.acted.insert(player);
    }

    pub fn record_check(&mut self, player: ID<Player>) {
        self.acted.insert(player);
    }

    /// Records a call/blind-post/non-raising commitment to `new_total`.
    pub fn record_call(&mut self, player: ID<Player>, new_total: Chips) {
        self.ledger.insert(player, new_total);
        self.acted.insert(player);
    }

    /// Records a full raise to `new_total`, reopening the betting round.
    pub fn record_raise(&mut self, player: ID<Player>, new_total: Chips) {
        debug_assert!(new_total >= self.min_raise_total());
        let increment = new_total - self.current_bet;
        self.min_raise = increment;
        self.current_bet = new_total;
        self.raise_count += 1;
        self.last_aggressor = Some(player);
        self.ledger.insert(player, new_total);
        self.acted.insert(player);
    }

    /// Records an all-in to `new_total`. If it doesn't reach the full
    /// min-raise total, `current_bet` still advances but `min_raise` and
    /// `last_aggressor` are left as they were — a short all-in doesn't
    /// reopen the round for players already matching the prior bet.
    pub fn record_all_in(&mut self, player: ID<Player>, new_total: Chips) {
        let reopens = new_total >= self.min_raise_total();
        let increment = new_total - self.current_bet;
        if new_total > self.current_bet {
            self.current_bet = new_total;
        }
        if reopens {
            self.min_raise = increment;
            self.raise_count += 1;
            self.last_aggressor = Some(player);
        }
        self.ledger.insert(player, new_total);
        self.acted.insert(player);
    }

    /// Starts the next street's round, preserving `last_aggressor` so
    /// showdown order stays stable, and the minimum raise increment.
    pub fn next_street(&self) -> Self {
        Self {
            ledger: HashMap::new(),
            acted: HashSet::new(),
            current_bet: 0,
            min_raise: self.min_raise,
            raise_count: 0,
            last_aggressor: self.last_aggressor,
        }
    }

    pub fn acted_players(&self) -> impl Iterator<Item = ID<Player>> + '_ {
        self.acted.iter().copied()
    }

    /// Total chips committed to this street by every contributor so far
    /// (blinds included, whether or not they've acted yet). For display —
    /// `acted_players` deliberately excludes a blind poster who hasn't
    /// acted, so it's the wrong source for a running pot total.
    pub fn total_committed(&self) -> Chips {
        self.ledger.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflop_seeds_blinds_and_min_raise() {
        let sb = ID::new();
        let bb = ID::new();
        let round = BettingRound::preflop(sb, 1, bb, 2);
        assert_eq!(round.current_bet(), 2);
        assert_eq!(round.min_raise(), 2);
        assert_eq!(round.to_call(sb), 1);
        assert_eq!(round.to_call(bb), 0);
    }

    #[test]
    fn full_raise_updates_min_raise_and_reopens() {
        let sb = ID::new();
        let bb = ID::new();
        let mut round = BettingRound::preflop(sb, 1, bb, 2);
        round.record_raise(sb, 10);
        assert_eq!(round.current_bet(), 10);
        assert_eq!(round.min_raise(), 8);
        assert_eq!(round.last_aggressor(), Some(sb));
    }

    #[test]
    fn short_all_in_does_not_reopen() {
        // Mirrors spec §8 scenario 5 exactly: blinds 1/2, UTG raises to 10
        // (min-raise 8), button shoves for 14 — a raise of only 4, short of
        // the 8 required to reopen.
        let utg = ID::new();
        let button = ID::new();
        let mut round = BettingRound::preflop(ID::new(), 1, ID::new(), 2);
        round.record_raise(utg, 10);
        assert_eq!(round.min_raise_total(), 18);
        round.record_all_in(button, 14);
        assert_eq!(round.current_bet(), 14);
        assert_eq!(round.min_raise(), 8);
        assert_eq!(round.last_aggressor(), Some(utg));
    }

    #[test]
    fn next_street_resets_bets_but_keeps_aggressor() {
        let p = ID::new();
        let mut round = BettingRound::new(2);
        round.record_raise(p, 10);
        let next = round.next_street();
        assert_eq!(next.current_bet(), 0);
        assert_eq!(next.last_aggressor(), Some(p));
    }
}
