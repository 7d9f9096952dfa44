use crate::table::Table;
use holdem_cards::{Deck, Street};
use holdem_core::{Chips, Error, Position, ID};
use holdem_gameplay::{
    Action, ActionKind, BettingRound, Contestant, Hand, Phase, Player, PlayerStatus, Pot, Seat,
    ShowdownDecision, ValidatedAction, Validator,
};
use holdem_records::{EventLog, HandEvent, Record};

/// What `StartNewHand`/`StartBombPot` hand back to the caller: the new
/// hand plus each dealt player's hole cards (the orchestrator knows them
/// all; the sanitiser is what hides them per-viewer downstream).
pub struct HandStartResult {
    pub hand_id: ID<Hand>,
    pub hole_cards: Vec<(ID<Player>, holdem_cards::Hole)>,
}

/// What `ExecutePlayerAction`/`ForceTimeoutFold` hand back: whether the
/// round closed, the phase afterward, and whether the hand concluded.
pub struct ActionResult {
    pub validated: ValidatedAction,
    pub round_completed: bool,
    pub phase: Phase,
    pub hand_completed: bool,
}

/// Drives one table's hand from start to `HandCompleted`, per spec
/// §4.9. Owns the table snapshot and the event log for hands played at
/// it; the caller is responsible for serialising intents per table
/// (spec §5's "one hand per table progresses sequentially").
pub struct GameOrchestrator {
    table: Table,
    log: EventLog,
    deck: Deck,
    /// When the current hand began, and each seat's stack at that moment
    /// — both needed to populate `HandCompleted.duration_ms`/`net_result`
    /// without re-deriving them from the event log.
    hand_started_ms: u64,
    hand_start_stacks: std::collections::HashMap<ID<Player>, Chips>,
}

impl GameOrchestrator {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            log: EventLog::new(),
            deck: Deck::new(),
            hand_started_ms: 0,
            hand_start_stacks: std::collections::HashMap::new(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Starts a fresh hand: rotates the button, posts blinds, deals hole
    /// cards, transitions to Preflop.
    pub fn start_new_hand(&mut self, now_ms: u64) -> Result<HandStartResult, Error> {
        if self.table.active_player_count() < 2 {
            return Err(Error::precondition_failed(
                "at least two active players are required to start a hand",
            ));
        }
        self.table.advance_button();
        self.begin_hand(false, 0, false, now_ms)
    }

    /// Starts a bomb-pot hand: no button rotation, ante from everyone,
    /// straight to the flop with no preflop betting.
    pub fn start_bomb_pot(
        &mut self,
        ante_amount: Chips,
        double_board: bool,
        now_ms: u64,
    ) -> Result<HandStartResult, Error> {
        if self.table.active_player_count() < 2 {
            return Err(Error::precondition_failed(
                "at least two active players are required to start a hand",
            ));
        }
        self.begin_hand(true, ante_amount, double_board, now_ms)
    }

    fn begin_hand(
        &mut self,
        is_bomb_pot: bool,
        ante_amount: Chips,
        double_board: bool,
        now_ms: u64,
    ) -> Result<HandStartResult, Error> {
        let button = self.table.button();
        let seat_count = self.table.seats().len() as Position;

        let mut seats: Vec<Seat> = self
            .table
            .seats()
            .iter()
            .filter(|(_, p)| !p.sitting_out && p.stack > 0)
            .map(|(&pos, p)| {
                let mut seat = Seat::new(p.id, pos, p.stack);
                seat.set_status(PlayerStatus::Active);
                seat
            })
            .collect();

        self.hand_started_ms = now_ms;
        self.hand_start_stacks = seats.iter().map(|s| (s.id(), s.stack())).collect();

        self.deck.shuffle();
        for seat in &mut seats {
            seat.set_hole(self.deck.hole()?);
        }

        let sb_amount = self.table.small_blind();
        let bb_amount = self.table.big_blind();
        let hand_number = self.table.hand_count() + 1;
        let mut hand = Hand::new(
            self.table.id().cast(),
            hand_number,
            button,
            seats,
            sb_amount,
            bb_amount,
        );

        let sequence_start = 1u64;
        let hand_id = hand.id();

        // Blind seats are meaningful even for a bomb pot's HandStarted
        // record (the button still rotates notionally); only a real hand
        // posts chips for them.
        let (sb_id, bb_id) = self.assign_blinds(&hand, button, seat_count)?;
        let sb_seat = hand.seat(sb_id).expect("sb seat exists").seat();
        let bb_seat = hand.seat(bb_id).expect("bb seat exists").seat();

        let player_ids: Vec<ID<Player>> = hand.seats().iter().map(|s| s.id()).collect();
        self.append(
            hand_id,
            sequence_start,
            now_ms,
            HandEvent::HandStarted {
                table_id: hand.table_id(),
                hand_number,
                button_seat: button,
                sb_seat,
                bb_seat,
                sb_amount,
                bb_amount,
                player_ids: player_ids.clone(),
                is_bomb_pot,
                double_board,
                ante_amount,
            },
        )?;

        let mut seq = sequence_start + 1;

        if is_bomb_pot {
            hand.set_bomb_pot(true);
            let ids: Vec<ID<Player>> = hand.seats().iter().map(|s| s.id()).collect();
            let mut pot_total: Chips = 0;
            for id in ids {
                if let Some(seat) = hand.seat_mut(id) {
                    let amount = ante_amount.min(seat.stack());
                    seat.commit(amount);
                    pot_total += amount;
                    seq = self.append(
                        hand_id,
                        seq,
                        now_ms,
                        HandEvent::AntePosted {
                            player: id,
                            amount,
                            remaining_stack: seat.stack(),
                            pot_total,
                        },
                    )? + 1;
                }
            }
            hand.close_betting_round();
            hand.enter_phase(Phase::Preflop)?;
            self.deal_street(&mut hand, Street::Flop, 0, now_ms)?;
            hand.enter_phase(Phase::Flop)?;
            if double_board {
                self.deal_street(&mut hand, Street::Flop, 1, now_ms)?;
            }
            hand.set_current_to_act(self.first_to_act_postflop(&hand));
        } else {
            let sb_player_seat = hand.seat_mut(sb_id).expect("sb seat exists");
            let sb_post = sb_amount.min(sb_player_seat.stack());
            sb_player_seat.commit(sb_post);
            let bb_player_seat = hand.seat_mut(bb_id).expect("bb seat exists");
            let bb_post = bb_amount.min(bb_player_seat.stack());
            bb_player_seat.commit(bb_post);
            hand.set_round(BettingRound::preflop(sb_id, sb_post, bb_id, bb_post));

            hand.enter_phase(Phase::Preflop)?;
            let pot_total = sb_post + bb_post;
            seq = self.append(
                hand_id,
                seq,
                now_ms,
                HandEvent::BlindsPosted {
                    sb_player: sb_id,
                    sb_amount: sb_post,
                    bb_player: bb_id,
                    bb_amount: bb_post,
                    pot_total,
                },
            )? + 1;

            hand.set_current_to_act(self.first_to_act_preflop(&hand, sb_id, bb_id, seat_count));
        }

        // `deal_street` tracks its own sequence off the log directly (it
        // can be called a variable number of times above), so recompute
        // rather than trust the locally threaded `seq` counter.
        let seq = self.log.last_sequence(hand_id) + 1;

        let hole_cards: Vec<(ID<Player>, holdem_cards::Hole)> = hand
            .seats()
            .iter()
            .filter_map(|s| s.hole().map(|h| (s.id(), h)))
            .collect();
        self.append(
            hand_id,
            seq,
            now_ms,
            HandEvent::HoleCardsDealt {
                hole_cards: hole_cards.clone(),
            },
        )?;

        self.table.set_hand(hand);

        Ok(HandStartResult { hand_id, hole_cards })
    }

    fn assign_blinds(
        &self,
        hand: &Hand,
        button: Position,
        seat_count: Position,
    ) -> Result<(ID<Player>, ID<Player>), Error> {
        let ids: Vec<ID<Player>> = hand.seats().iter().map(|s| s.id()).collect();
        if ids.len() == 2 {
            // Heads-up: the button is the small blind.
            let sb = hand.seats()[0].id();
            let bb = hand.seats()[1].id();
            let button_id = hand
                .seats()
                .iter()
                .find(|s| s.seat() == button)
                .map(|s| s.id());
            return match button_id {
                Some(id) if id == sb => Ok((sb, bb)),
                Some(id) if id == bb => Ok((bb, sb)),
                _ => Ok((sb, bb)),
            };
        }
        let sb_pos = self
            .table
            .next_active_seat(button)
            .ok_or_else(|| Error::invalid_state("no seat available for small blind"))?;
        let bb_pos = self
            .table
            .next_active_seat(sb_pos)
            .ok_or_else(|| Error::invalid_state("no seat available for big blind"))?;
        let sb_id = hand
            .seats()
            .iter()
            .find(|s| s.seat() == sb_pos)
            .map(|s| s.id())
            .ok_or_else(|| Error::invalid_state("small blind seat not dealt into hand"))?;
        let bb_id = hand
            .seats()
            .iter()
            .find(|s| s.seat() == bb_pos)
            .map(|s| s.id())
            .ok_or_else(|| Error::invalid_state("big blind seat not dealt into hand"))?;
        let _ = seat_count;
        Ok((sb_id, bb_id))
    }

    fn first_to_act_preflop(
        &self,
        hand: &Hand,
        sb_id: ID<Player>,
        bb_id: ID<Player>,
        seat_count: Position,
    ) -> Option<ID<Player>> {
        if hand.seats().len() == 2 {
            return Some(sb_id);
        }
        let bb_pos = hand.seat(bb_id)?.seat();
        let utg_pos = self.table.next_active_seat(bb_pos)?;
        let _ = seat_count;
        hand.seats().iter().find(|s| s.seat() == utg_pos).map(|s| s.id())
    }

    /// Spec §8 boundary behaviour: heads-up, SB (the button) acts first on
    /// every street, pre- and postflop alike — unlike 3+-handed, where the
    /// seat immediately left of the button acts first postflop. Both
    /// reduce to "the button" only by coincidence when heads-up; computing
    /// `next_active_seat(button)` unconditionally would hand the option to
    /// BB instead, which is wrong for exactly two players.
    fn first_to_act_postflop(&self, hand: &Hand) -> Option<ID<Player>> {
        if hand.seats().len() == 2 {
            let button_seat = hand.seats().iter().find(|s| s.seat() == hand.button())?;
            if button_seat.status() == PlayerStatus::Active {
                return Some(button_seat.id());
            }
            // Button is already all-in; the only seat left to act is the
            // other one.
            let button_id = button_seat.id();
            return hand.seats().iter().find(|s| s.id() != button_id).map(|s| s.id());
        }
        self.table
            .next_active_seat(hand.button())
            .and_then(|pos| hand.seats().iter().find(|s| s.seat() == pos))
            .map(|s| s.id())
    }

    /// Deals `street`'s cards into a hand that isn't yet stored on the
    /// table (used while a new hand is still being assembled).
    fn deal_street(&mut self, hand: &mut Hand, street: Street, board_index: u8, now_ms: u64) -> Result<(), Error> {
        let (dealt, board) = deal_community_cards(&mut self.deck, hand, street, board_index)?;
        let hand_id = hand.id();
        let seq = self.log.last_sequence(hand_id) + 1;
        self.append(
            hand_id,
            seq,
            now_ms,
            HandEvent::CommunityCardsDealt {
                phase: format!("{}", street),
                dealt,
                board,
                board_index,
            },
        )?;
        Ok(())
    }

    /// Deals `street`'s cards into the hand currently active on the table.
    fn deal_street_on_table(&mut self, street: Street, board_index: u8, now_ms: u64) -> Result<(), Error> {
        let (hand_id, dealt, board) = {
            let hand = self.table.hand_mut().expect("hand exists");
            let (dealt, board) = deal_community_cards(&mut self.deck, hand, street, board_index)?;
            (hand.id(), dealt, board)
        };
        let seq = self.log.last_sequence(hand_id) + 1;
        self.append(
            hand_id,
            seq,
            now_ms,
            HandEvent::CommunityCardsDealt {
                phase: format!("{}", street),
                dealt,
                board,
                board_index,
            },
        )?;
        Ok(())
    }

    /// Validates and applies `action` from `player`, advancing the round,
    /// phase, and (when the hand concludes) showdown.
    pub fn execute_player_action(
        &mut self,
        player: ID<Player>,
        action: Action,
        now_ms: u64,
    ) -> Result<ActionResult, Error> {
        let validated = {
            let hand = self.table.hand().ok_or_else(|| Error::precondition_failed("no hand is active"))?;
            if hand.current_to_act() != Some(player) {
                return Err(Error::precondition_failed("it is not this player's turn"));
            }
            let seat = hand.seat(player).ok_or_else(|| Error::precondition_failed("unknown seat"))?;
            Validator::validate(seat, hand.round(), true, action)?
        };
        self.apply_validated(player, validated, now_ms, false)
    }

    /// Identical to an inbound Fold from the current-to-act, tagged as a
    /// timeout; decrements the player's time bank by the consumed amount.
    pub fn force_timeout_fold(
        &mut self,
        time_bank_consumed: u32,
        now_ms: u64,
    ) -> Result<ActionResult, Error> {
        let player = self
            .table
            .hand()
            .and_then(|h| h.current_to_act())
            .ok_or_else(|| Error::precondition_failed("no player is currently to act"))?;
        let (round_bet, stack) = {
            let hand = self.table.hand_mut().expect("checked above");
            if let Some(seat) = hand.seat_mut(player) {
                let remaining = seat.time_bank_seconds().saturating_sub(time_bank_consumed);
                seat.set_time_bank_seconds(remaining);
            }
            let seat = hand.seat(player);
            (
                seat.map(|s| s.round_bet()).unwrap_or(0),
                seat.map(|s| s.stack()).unwrap_or(0),
            )
        };
        self.apply_validated(
            player,
            ValidatedAction {
                kind: ActionKind::Fold,
                amount_added: 0,
                new_round_bet: round_bet,
                is_raise: false,
                remaining_stack: stack,
            },
            now_ms,
            true,
        )
    }

    pub fn get_available_actions(&self) -> Option<crate::sanitiser::AvailableActions> {
        let hand = self.table.hand()?;
        let current = hand.current_to_act()?;
        let seat = hand.seat(current)?;
        let kinds = Validator::legal_actions(seat, hand.round(), true);
        let to_call = hand.round().to_call(seat.id());
        let shove_total = seat.round_bet() + seat.stack();
        Some(crate::sanitiser::AvailableActions {
            can_fold: kinds.contains(&ActionKind::Fold),
            can_check: kinds.contains(&ActionKind::Check),
            can_call: kinds.contains(&ActionKind::Call),
            call_amount: to_call,
            can_raise: kinds.contains(&ActionKind::Raise),
            min_raise: hand.round().min_raise_total(),
            max_raise: shove_total,
            can_all_in: kinds.contains(&ActionKind::AllIn),
            all_in_amount: shove_total,
        })
    }

    /// Whether `player` may legally muck at showdown instead of showing,
    /// per spec §4.9 ("forwarded to C8"): delegates to the same
    /// mandatory-show/legal-muck rule [`holdem_gameplay::run_showdown`]
    /// applies when it resolves the hand. Read-only; does not itself
    /// decide or record anything.
    pub fn request_showdown_muck(&self, player: ID<Player>) -> bool {
        let Some(hand) = self.table.hand() else { return false };
        if hand.phase() != Phase::Showdown {
            return false;
        }
        let contestants: Vec<Contestant> = hand
            .seats()
            .iter()
            .filter(|s| s.status() != PlayerStatus::Folded)
            .map(|s| Contestant { id: s.id(), hole: s.hole() })
            .collect();
        if contestants.len() <= 1 {
            return false;
        }
        let pots = hand.pots().to_vec();
        let board = hand.board().clone();
        let button = hand.button();
        let seat_count = hand.seats().len() as Position;
        let last_aggressor = hand.round().last_aggressor();
        let seat_positions: std::collections::HashMap<ID<Player>, Position> =
            hand.seats().iter().map(|s| (s.id(), s.seat())).collect();
        let Ok(outcome) = holdem_gameplay::run_showdown(
            &contestants,
            &board,
            &pots,
            |id| seat_positions.get(&id).copied().unwrap_or(0),
            button,
            seat_count.max(1),
            last_aggressor,
        ) else {
            return false;
        };
        matches!(outcome.decisions.get(&player), Some(ShowdownDecision::Mucked))
    }

    fn apply_validated(
        &mut self,
        player: ID<Player>,
        validated: ValidatedAction,
        now_ms: u64,
        timeout: bool,
    ) -> Result<ActionResult, Error> {
        let hand_id;
        let phase_str;
        let pot_total_after;
        let current_bet_after;
        let remaining_stack;
        {
            let hand = self.table.hand_mut().expect("hand exists");
            hand_id = hand.id();

            match validated.kind {
                ActionKind::Fold => {
                    hand.seat_mut(player).expect("seat exists").fold();
                    hand.round_mut().record_fold(player);
                }
                ActionKind::Check => {
                    hand.round_mut().record_check(player);
                }
                ActionKind::Call => {
                    hand.seat_mut(player).expect("seat exists").commit(validated.amount_added);
                    hand.round_mut().record_call(player, validated.new_round_bet);
                }
                ActionKind::Raise => {
                    hand.seat_mut(player).expect("seat exists").commit(validated.amount_added);
                    hand.round_mut().record_raise(player, validated.new_round_bet);
                }
                ActionKind::AllIn => {
                    hand.seat_mut(player).expect("seat exists").commit(validated.amount_added);
                    if validated.is_raise {
                        hand.round_mut().record_all_in(player, validated.new_round_bet);
                    } else {
                        hand.round_mut().record_call(player, validated.new_round_bet);
                    }
                }
            }

            phase_str = format!("{}", hand.phase());
            pot_total_after = hand.total_pot() + hand.seats().iter().map(|s| s.round_bet()).sum::<Chips>();
            current_bet_after = hand.round().current_bet();
            remaining_stack = hand.seat(player).map(|s| s.stack()).unwrap_or(0);
        }

        let seq = self.log.last_sequence(hand_id) + 1;
        self.append(
            hand_id,
            seq,
            now_ms,
            HandEvent::PlayerActed {
                player,
                action: validated.kind,
                amount: validated.amount_added,
                phase: phase_str,
                remaining_stack,
                pot_total: pot_total_after,
                current_bet: current_bet_after,
                timeout,
            },
        )?;

        self.advance(hand_id, now_ms)
    }

    /// After recording an action, checks whether the round closed and
    /// drives whatever follows: advancing the player to act, closing the
    /// street into pots, dealing the next street, or routing to
    /// showdown.
    fn advance(&mut self, hand_id: ID<Hand>, now_ms: u64) -> Result<ActionResult, Error> {
        let round_completed;
        let next_to_act;
        {
            let hand = self.table.hand().expect("hand exists");
            if hand.non_folded_count() <= 1 {
                round_completed = true;
                next_to_act = None;
            } else if is_round_complete(hand) {
                round_completed = true;
                next_to_act = None;
            } else {
                round_completed = false;
                next_to_act = self.next_to_act(hand);
            }
        }

        if !round_completed {
            let hand = self.table.hand_mut().expect("hand exists");
            hand.set_current_to_act(next_to_act);
            return Ok(ActionResult {
                validated: ValidatedAction {
                    kind: ActionKind::Check,
                    amount_added: 0,
                    new_round_bet: 0,
                    is_raise: false,
                    remaining_stack: 0,
                },
                round_completed: false,
                phase: hand.phase(),
                hand_completed: false,
            });
        }

        let hand = self.table.hand_mut().expect("hand exists");
        hand.close_betting_round();
        hand.set_current_to_act(None);
        let pot_amount = hand.total_pot();
        let active = hand.contesting_count();
        let phase_str = format!("{}", hand.phase());
        let seq = self.log.last_sequence(hand_id) + 1;
        self.append(
            hand_id,
            seq,
            now_ms,
            HandEvent::BettingRoundCompleted {
                phase: phase_str,
                pot_amount,
                active_player_count: active,
            },
        )?;

        if hand.non_folded_count() <= 1 {
            return self.complete_hand(hand_id, now_ms, false);
        }

        let everyone_all_in = hand
            .seats()
            .iter()
            .filter(|s| s.status() != PlayerStatus::Folded)
            .all(|s| s.status() == PlayerStatus::AllIn || s.stack() == 0);

        let next_phase = match hand.phase() {
            Phase::Preflop => Phase::Flop,
            Phase::Flop => Phase::Turn,
            Phase::Turn => Phase::River,
            Phase::River => Phase::Showdown,
            other => other,
        };

        if next_phase == Phase::Showdown {
            return self.run_showdown_and_complete(hand_id, now_ms);
        }

        let is_bomb_pot_hand = self.table.hand().map(|h| h.is_bomb_pot()).unwrap_or(false);
        self.deal_street_on_table(next_phase_street(next_phase), 0, now_ms)?;
        if is_bomb_pot_hand {
            self.deal_street_on_table(next_phase_street(next_phase), 1, now_ms)?;
        }
        let hand = self.table.hand_mut().expect("hand exists");
        hand.enter_phase(next_phase)?;

        if everyone_all_in {
            return self.run_out_remaining_streets(hand_id, now_ms);
        }

        let first = self.first_to_act_postflop(hand);
        let hand = self.table.hand_mut().expect("hand exists");
        hand.set_current_to_act(first);

        Ok(ActionResult {
            validated: ValidatedAction {
                kind: ActionKind::Check,
                amount_added: 0,
                new_round_bet: 0,
                is_raise: false,
                remaining_stack: 0,
            },
            round_completed: true,
            phase: hand.phase(),
            hand_completed: false,
        })
    }

    fn run_out_remaining_streets(&mut self, hand_id: ID<Hand>, now_ms: u64) -> Result<ActionResult, Error> {
        loop {
            let phase = self.table.hand().expect("hand exists").phase();
            let next_phase = match phase {
                Phase::Flop => Phase::Turn,
                Phase::Turn => Phase::River,
                Phase::River => Phase::Showdown,
                other => other,
            };
            if next_phase == Phase::Showdown {
                return self.run_showdown_and_complete(hand_id, now_ms);
            }
            let is_bomb_pot_hand = self.table.hand().map(|h| h.is_bomb_pot()).unwrap_or(false);
            self.deal_street_on_table(next_phase_street(next_phase), 0, now_ms)?;
            if is_bomb_pot_hand {
                self.deal_street_on_table(next_phase_street(next_phase), 1, now_ms)?;
            }
            let (pot_amount, active) = {
                let hand = self.table.hand_mut().expect("hand exists");
                hand.close_betting_round();
                (hand.total_pot(), hand.contesting_count())
            };
            let seq = self.log.last_sequence(hand_id) + 1;
            self.append(
                hand_id,
                seq,
                now_ms,
                HandEvent::BettingRoundCompleted {
                    phase: format!("{}", phase),
                    pot_amount,
                    active_player_count: active,
                },
            )?;
            let hand = self.table.hand_mut().expect("hand exists");
            hand.enter_phase(next_phase)?;
        }
    }

    fn run_showdown_and_complete(&mut self, hand_id: ID<Hand>, now_ms: u64) -> Result<ActionResult, Error> {
        {
            let hand = self.table.hand_mut().expect("hand exists");
            hand.enter_phase(Phase::Showdown)?;
        }

        let (contestants, pots, board, second_board, double_board, button, seat_count, last_aggressor, seat_positions) = {
            let hand = self.table.hand().expect("hand exists");
            let contestants: Vec<Contestant> = hand
                .seats()
                .iter()
                .filter(|s| s.status() != PlayerStatus::Folded)
                .map(|s| Contestant { id: s.id(), hole: s.hole() })
                .collect();
            let pots = hand.pots().to_vec();
            let board = hand.board().clone();
            let second_board = hand.second_board().clone();
            let double_board = hand.is_bomb_pot() && !second_board.is_empty();
            let button = hand.button();
            let seat_count = hand.seats().len() as Position;
            let last_aggressor = hand.round().last_aggressor();
            let seat_positions: std::collections::HashMap<ID<Player>, Position> =
                hand.seats().iter().map(|s| (s.id(), s.seat())).collect();
            (contestants, pots, board, second_board, double_board, button, seat_count, last_aggressor, seat_positions)
        };

        let went_to_showdown = contestants.len() > 1;
        let seq = self.log.last_sequence(hand_id) + 1;

        if double_board {
            // Spec §8 scenario 6: each board awards half the pot
            // independently. Split every sealed pot's amount in two (the
            // odd chip, if any, goes to the first board) and run an
            // entirely separate showdown against each board, including its
            // own show/muck decision — the simplification being that a
            // player's reveal is judged per board rather than once for
            // both (see DESIGN.md).
            let (pots_a, pots_b) = split_pots_for_double_board(&pots);
            let seq = self.resolve_board_showdown(
                hand_id, now_ms, seq, &contestants, &board, &pots_a,
                button, seat_count, last_aggressor, &seat_positions, 0, went_to_showdown,
            )?;
            self.resolve_board_showdown(
                hand_id, now_ms, seq, &contestants, &second_board, &pots_b,
                button, seat_count, last_aggressor, &seat_positions, 1, went_to_showdown,
            )?;
        } else {
            self.resolve_board_showdown(
                hand_id, now_ms, seq, &contestants, &board, &pots,
                button, seat_count, last_aggressor, &seat_positions, 0, went_to_showdown,
            )?;
        }

        self.complete_hand(hand_id, now_ms, went_to_showdown)
    }

    /// Runs one board's worth of showdown (decisions + pot awards),
    /// appending its events starting at `seq`. Returns the next free
    /// sequence number, so a double-board hand can thread two passes back
    /// to back without re-reading the log between them.
    #[allow(clippy::too_many_arguments)]
    fn resolve_board_showdown(
        &mut self,
        hand_id: ID<Hand>,
        now_ms: u64,
        mut seq: u64,
        contestants: &[Contestant],
        board: &holdem_cards::Board,
        pots: &[Pot],
        button: Position,
        seat_count: Position,
        last_aggressor: Option<ID<Player>>,
        seat_positions: &std::collections::HashMap<ID<Player>, Position>,
        board_index: u8,
        went_to_showdown: bool,
    ) -> Result<u64, Error> {
        let outcome = holdem_gameplay::run_showdown(
            contestants,
            board,
            pots,
            |id| seat_positions.get(&id).copied().unwrap_or(0),
            button,
            seat_count.max(1),
            last_aggressor,
        )?;

        // `outcome.decisions` is a HashMap with no reveal order of its
        // own; recompute the table's actual reveal order.
        let ids: Vec<ID<Player>> = contestants.iter().map(|c| c.id).collect();
        let reveal_order = holdem_gameplay::show_order(
            &ids,
            |id| seat_positions.get(&id).copied().unwrap_or(0),
            button,
            seat_count.max(1),
            last_aggressor,
        );

        for (i, id) in reveal_order.iter().enumerate() {
            let Some(decision) = outcome.decisions.get(id) else { continue };
            match decision {
                ShowdownDecision::Shown(strength) => {
                    let hole = self
                        .table
                        .hand()
                        .and_then(|h| h.seat(*id))
                        .and_then(|s| s.hole())
                        .expect("a shown contestant was dealt a hole");
                    seq = self.append(
                        hand_id,
                        seq,
                        now_ms,
                        HandEvent::PlayerShowedCards {
                            player: *id,
                            hole,
                            category: strength.category().to_string(),
                            description: strength.description(),
                            best_five: strength.best_five().to_vec(),
                            show_order: i,
                            board_index,
                        },
                    )? + 1;
                }
                ShowdownDecision::Mucked => {
                    seq = self.append(
                        hand_id,
                        seq,
                        now_ms,
                        HandEvent::PlayerMuckedCards {
                            player: *id,
                            auto_muck: true,
                            show_order: i,
                            board_index,
                        },
                    )? + 1;
                }
            }
        }

        for (pot_sequence, awards) in &outcome.awards {
            {
                let hand = self.table.hand_mut().expect("hand exists");
                for (id, amount) in awards {
                    if let Some(seat) = hand.seat_mut(*id) {
                        seat.award(*amount);
                    }
                }
            }
            seq = self.append(
                hand_id,
                seq,
                now_ms,
                HandEvent::PotAwarded {
                    pot_id: *pot_sequence,
                    kind: if *pot_sequence == 0 { "Main".into() } else { "Side".into() },
                    amount: awards.values().sum(),
                    winners: awards.keys().copied().collect(),
                    per_winner: awards.iter().map(|(k, v)| (*k, *v)).collect(),
                    winning_description: None,
                    won_by_fold: !went_to_showdown,
                    board_index,
                },
            )? + 1;
        }

        Ok(seq)
    }

    fn complete_hand(&mut self, hand_id: ID<Hand>, now_ms: u64, went_to_showdown: bool) -> Result<ActionResult, Error> {
        let hand = self.table.hand_mut().expect("hand exists");
        hand.set_current_to_act(None);
        let total_pot = hand.total_pot();
        let player_count = hand.seats().len();
        let final_phase = format!("{}", hand.phase());

        // Single-player award: whoever's still in wins everything.
        if hand.non_folded_count() <= 1 {
            if let Some(winner) = hand.seats().iter().find(|s| s.status() != PlayerStatus::Folded).map(|s| s.id()) {
                let pots: Vec<_> = hand.pots().to_vec();
                for pot in &pots {
                    if let Some(seat) = hand.seat_mut(winner) {
                        seat.award(pot.amount);
                    }
                }
            }
        }

        let net_result: Vec<(ID<Player>, Chips)> = hand
            .seats()
            .iter()
            .map(|s| {
                let start = self.hand_start_stacks.get(&s.id()).copied().unwrap_or(s.stack());
                (s.id(), s.stack() - start)
            })
            .collect();
        // Pot recipients are the source of truth for "who won" — a seat
        // that reached showdown and lost is non-folded but not a winner.
        // Only when no PotAwarded event was logged (the uncontested-fold
        // branch above, which awards directly) do we fall back to "the
        // one seat left standing".
        let awarded_winners = Self::pot_awarded_winners(&self.log, hand_id);
        let winners: Vec<ID<Player>> = if awarded_winners.is_empty() {
            hand.seats()
                .iter()
                .filter(|s| s.status() != PlayerStatus::Folded)
                .map(|s| s.id())
                .collect()
        } else {
            awarded_winners
        };
        let duration_ms = now_ms.saturating_sub(self.hand_started_ms);

        let seq = self.log.last_sequence(hand_id) + 1;
        self.append(
            hand_id,
            seq,
            now_ms,
            HandEvent::HandCompleted {
                total_pot,
                duration_ms,
                player_count,
                went_to_showdown,
                final_phase,
                net_result,
                winners,
            },
        )?;

        let phase = self.table.hand().expect("hand exists").phase();
        self.sync_stacks_back_to_table();
        self.table.clear_hand();

        Ok(ActionResult {
            validated: ValidatedAction {
                kind: ActionKind::Check,
                amount_added: 0,
                new_round_bet: 0,
                is_raise: false,
                remaining_stack: 0,
            },
            round_completed: true,
            phase,
            hand_completed: true,
        })
    }

    /// Deduplicated winners across every `PotAwarded` event logged so far
    /// for `hand_id`. Empty if the hand never reached a pot award (e.g.
    /// it was awarded directly without a showdown, or aborted).
    ///
    /// Takes `&EventLog` rather than `&self` so callers holding a live
    /// `&mut` borrow of `self.table` (via `Table::hand_mut`) can still
    /// call this against the disjoint `self.log` field.
    fn pot_awarded_winners(log: &EventLog, hand_id: ID<Hand>) -> Vec<ID<Player>> {
        let mut ids: Vec<ID<Player>> = log
            .get_events(hand_id)
            .iter()
            .filter_map(|r| match &r.event {
                HandEvent::PotAwarded { winners, .. } => Some(winners.clone()),
                _ => None,
            })
            .flatten()
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    fn sync_stacks_back_to_table(&mut self) {
        let Some(hand) = self.table.hand() else { return };
        let stacks: Vec<(Position, Chips)> = hand.seats().iter().map(|s| (s.seat(), s.stack())).collect();
        for (pos, stack) in stacks {
            if let Some(player) = self.table.seats().get(&pos).cloned() {
                self.table.seat_player(pos, crate::table::SeatedPlayer { stack, ..player });
            }
        }
    }

    /// Aborts the active hand on an internal invariant failure: returns
    /// chips in proportion to contributions and emits `HandCompleted`
    /// with `went_to_showdown=false`, per spec §7's `InvalidState`
    /// recovery policy.
    pub fn abort_hand(&mut self, now_ms: u64) -> Result<(), Error> {
        let Some(hand) = self.table.hand_mut() else { return Ok(()) };
        let hand_id = hand.id();
        let total_contributed: Chips = hand.seats().iter().map(|s| s.hand_bet()).sum();
        if total_contributed > 0 {
            let ids: Vec<ID<Player>> = hand.seats().iter().map(|s| s.id()).collect();
            for id in ids {
                if let Some(seat) = hand.seat_mut(id) {
                    let refund = seat.hand_bet();
                    seat.award(refund);
                }
            }
        }
        let player_count = hand.seats().len();
        let phase = format!("{}", hand.phase());
        // Chips were just refunded in proportion to contribution, so net
        // result is zero for everyone who had something to refund.
        let net_result: Vec<(ID<Player>, Chips)> = hand
            .seats()
            .iter()
            .map(|s| {
                let start = self.hand_start_stacks.get(&s.id()).copied().unwrap_or(s.stack());
                (s.id(), s.stack() - start)
            })
            .collect();
        let duration_ms = now_ms.saturating_sub(self.hand_started_ms);
        let seq = self.log.last_sequence(hand_id) + 1;
        self.append(
            hand_id,
            seq,
            now_ms,
            HandEvent::HandCompleted {
                total_pot: 0,
                duration_ms,
                player_count,
                went_to_showdown: false,
                final_phase: phase,
                net_result,
                winners: Vec::new(),
            },
        )?;
        self.sync_stacks_back_to_table();
        self.table.clear_hand();
        Ok(())
    }

    fn next_to_act(&self, hand: &Hand) -> Option<ID<Player>> {
        let current = hand.current_to_act()?;
        let current_pos = hand.seat(current)?.seat();
        let mut positions: Vec<Position> = hand
            .seats()
            .iter()
            .filter(|s| s.status() == PlayerStatus::Active)
            .map(|s| s.seat())
            .collect();
        positions.sort_unstable();
        let next_pos = positions
            .iter()
            .find(|&&p| p > current_pos)
            .or_else(|| positions.first())
            .copied()?;
        hand.seats().iter().find(|s| s.seat() == next_pos).map(|s| s.id())
    }

    fn append(&mut self, hand_id: ID<Hand>, seq: u64, now_ms: u64, event: HandEvent) -> Result<u64, Error> {
        self.log.append(Record {
            hand_id,
            sequence: seq,
            timestamp_ms: now_ms,
            event,
        })?;
        Ok(seq)
    }
}

fn deal_community_cards(
    deck: &mut Deck,
    hand: &mut Hand,
    street: Street,
    board_index: u8,
) -> Result<(Vec<holdem_cards::Card>, Vec<holdem_cards::Card>), Error> {
    if street != Street::Preflop {
        deck.burn()?;
    }
    let dealt = deck.reveal(street)?;
    if board_index == 0 {
        hand.deal_community(dealt.clone());
    } else {
        hand.deal_second_board(dealt.clone());
    }
    let board = if board_index == 0 {
        hand.board().cards().to_vec()
    } else {
        hand.second_board().cards().to_vec()
    };
    Ok((dealt, board))
}

/// Halves each sealed pot's amount for a double-board bomb pot, keeping
/// its sequence and eligible set intact on both halves. Any odd chip
/// goes to the first board.
fn split_pots_for_double_board(pots: &[Pot]) -> (Vec<Pot>, Vec<Pot>) {
    let mut first = Vec::with_capacity(pots.len());
    let mut second = Vec::with_capacity(pots.len());
    for pot in pots {
        let half = pot.amount / 2;
        let mut a = pot.clone();
        a.amount = half;
        let mut b = pot.clone();
        b.amount = pot.amount - half;
        first.push(a);
        second.push(b);
    }
    (first, second)
}

fn next_phase_street(phase: Phase) -> Street {
    match phase {
        Phase::Flop => Street::Flop,
        Phase::Turn => Street::Turn,
        Phase::River => Street::River,
        _ => Street::Preflop,
    }
}

/// Round-completion rule (spec §4.9): every non-folded, non-all-in
/// player has acted at least once this round and their round bet
/// matches the current bet.
fn is_round_complete(hand: &Hand) -> bool {
    let round = hand.round();
    hand.seats()
        .iter()
        .filter(|s| s.status() == PlayerStatus::Active)
        .all(|s| round.bet_of(s.id()) == round.current_bet() && round.acted_players().any(|p| p == s.id()))
}

/// End-to-end scenarios from spec §8's "Testable properties". Scenario 3
/// (side pot construction) is covered directly against `build_pots` in
/// `pot.rs`'s `three_way_side_pots_match_spec_scenario`, and scenario 5
/// (short all-in doesn't reopen) against `BettingRound`/`Validator`
/// directly in `betting_round.rs`'s `short_all_in_does_not_reopen` — both
/// exercise the same numbers this module would, one layer down, so they
/// aren't repeated here.
#[cfg(test)]
mod scenarios {
    use super::*;

    fn build_table(stacks: &[Chips], small_blind: Chips, big_blind: Chips) -> (Table, Vec<ID<Player>>) {
        let mut table = Table::new(ID::new(), small_blind, big_blind, 30, false, 0);
        let mut ids = Vec::with_capacity(stacks.len());
        for (i, &stack) in stacks.iter().enumerate() {
            let id = ID::new();
            ids.push(id);
            table.seat_player(i as Position, crate::table::SeatedPlayer { id, stack, sitting_out: false });
        }
        (table, ids)
    }

    /// Drives the current hand to its conclusion by checking or calling
    /// whichever is legal for whoever's to act — the shape every
    /// "everybody just sees it through" scenario needs.
    fn check_or_call_to_completion(orch: &mut GameOrchestrator, now_ms: u64) -> ActionResult {
        loop {
            let current = orch
                .table()
                .hand()
                .and_then(|h| h.current_to_act())
                .expect("a player should still be to act");
            let avail = orch.get_available_actions().expect("current actor has legal actions");
            let action = if avail.can_check {
                Action::Check
            } else if avail.can_call {
                Action::Call
            } else {
                panic!("neither check nor call is legal for the current actor");
            };
            let result = orch.execute_player_action(current, action, now_ms).expect("action is valid");
            if result.hand_completed {
                return result;
            }
        }
    }

    fn last_hand_completed(orch: &GameOrchestrator, hand_id: ID<Hand>) -> (Chips, bool, Vec<ID<Player>>) {
        orch.log()
            .get_events(hand_id)
            .iter()
            .rev()
            .find_map(|r| match &r.event {
                HandEvent::HandCompleted { total_pot, went_to_showdown, winners, .. } => {
                    Some((*total_pot, *went_to_showdown, winners.clone()))
                }
                _ => None,
            })
            .expect("hand completed")
    }

    /// Scenario 1 ("Walkover"): two players fold preflop without the
    /// remaining player needing to act at all. The sole survivor collects
    /// both blinds uncontested with no showdown.
    #[test]
    fn two_preflop_folds_leave_one_player_to_win_the_blinds_uncontested() {
        let (table, _ids) = build_table(&[100, 100, 100], 1, 2);
        let mut orch = GameOrchestrator::new(table);
        let start = orch.start_new_hand(0).unwrap();
        let hand_id = start.hand_id;

        let first = orch.table().hand().unwrap().current_to_act().unwrap();
        let r1 = orch.execute_player_action(first, Action::Fold, 1_000).unwrap();
        assert!(!r1.hand_completed);

        let second = orch.table().hand().unwrap().current_to_act().unwrap();
        assert_ne!(second, first);
        let r2 = orch.execute_player_action(second, Action::Fold, 2_000).unwrap();
        assert!(r2.hand_completed);

        let (total_pot, went_to_showdown, winners) = last_hand_completed(&orch, hand_id);
        assert_eq!(total_pot, 3);
        assert!(!went_to_showdown);
        assert_eq!(winners.len(), 1);
        assert_ne!(winners[0], first);
        assert_ne!(winners[0], second);

        let conserved: Chips = orch.table().seats().values().map(|p| p.stack).sum();
        assert_eq!(conserved, 300);
    }

    /// Scenario 2 ("Flat call to flop"): heads-up, SB calls preflop and
    /// both players check every street down to showdown.
    #[test]
    fn heads_up_flat_call_runs_to_showdown() {
        let (table, _ids) = build_table(&[100, 100], 1, 2);
        let mut orch = GameOrchestrator::new(table);
        let start = orch.start_new_hand(0).unwrap();
        let hand_id = start.hand_id;

        let result = check_or_call_to_completion(&mut orch, 1_000);
        assert_eq!(result.phase, Phase::Showdown);

        let (total_pot, went_to_showdown, winners) = last_hand_completed(&orch, hand_id);
        assert_eq!(total_pot, 4);
        assert!(went_to_showdown);
        assert!(!winners.is_empty());

        let awarded: Chips = orch
            .log()
            .get_events(hand_id)
            .iter()
            .filter_map(|r| match &r.event {
                HandEvent::PotAwarded { amount, .. } => Some(*amount),
                _ => None,
            })
            .sum();
        assert_eq!(awarded, 4);

        let conserved: Chips = orch.table().seats().values().map(|p| p.stack).sum();
        assert_eq!(conserved, 200);
    }

    /// Scenario 4 ("Timeout auto-fold"): the current actor never submits
    /// an intent; `force_timeout_fold` is the authoritative fallback the
    /// timer subsystem calls once the deadline and time bank both expire.
    #[test]
    fn force_timeout_fold_tags_the_action_and_awards_the_blinds() {
        let (table, _ids) = build_table(&[100, 100], 1, 2);
        let mut orch = GameOrchestrator::new(table);
        let start = orch.start_new_hand(0).unwrap();
        let hand_id = start.hand_id;

        let sb = orch.table().hand().unwrap().current_to_act().unwrap();
        let result = orch.force_timeout_fold(10, 40_000).unwrap();
        assert!(result.hand_completed);

        let (action, timeout) = orch
            .log()
            .get_events(hand_id)
            .iter()
            .find_map(|r| match &r.event {
                HandEvent::PlayerActed { player, action, timeout, .. } if *player == sb => {
                    Some((*action, *timeout))
                }
                _ => None,
            })
            .expect("sb's timeout fold was logged");
        assert_eq!(action, ActionKind::Fold);
        assert!(timeout);

        let (total_pot, went_to_showdown, winners) = last_hand_completed(&orch, hand_id);
        assert_eq!(total_pot, 3);
        assert!(!went_to_showdown);
        assert_eq!(winners.len(), 1);
        assert_ne!(winners[0], sb);
    }

    /// Scenario 6 ("Bomb pot, double board"): four players ante in, two
    /// boards are dealt, and each board awards its own half of the pot
    /// independently at showdown.
    #[test]
    fn bomb_pot_double_board_awards_each_board_independently() {
        let (table, _ids) = build_table(&[100, 100, 100, 100], 1, 2);
        let mut orch = GameOrchestrator::new(table);
        let start = orch.start_bomb_pot(5, true, 0).unwrap();
        let hand_id = start.hand_id;

        {
            let hand = orch.table().hand().unwrap();
            assert!(hand.is_bomb_pot());
            assert_eq!(hand.board().len(), 3);
            assert_eq!(hand.second_board().len(), 3);
            assert_eq!(hand.phase(), Phase::Flop);
        }

        let result = check_or_call_to_completion(&mut orch, 1_000);
        assert_eq!(result.phase, Phase::Showdown);

        let (total_pot, went_to_showdown, _winners) = last_hand_completed(&orch, hand_id);
        assert_eq!(total_pot, 20); // 5 ante x 4 players
        assert!(went_to_showdown);

        let events = orch.log().get_events(hand_id);
        let board0_awarded: Chips = events
            .iter()
            .filter_map(|r| match &r.event {
                HandEvent::PotAwarded { amount, board_index: 0, .. } => Some(*amount),
                _ => None,
            })
            .sum();
        let board1_awarded: Chips = events
            .iter()
            .filter_map(|r| match &r.event {
                HandEvent::PotAwarded { amount, board_index: 1, .. } => Some(*amount),
                _ => None,
            })
            .sum();
        assert!(board0_awarded > 0);
        assert!(board1_awarded > 0);
        assert_eq!(board0_awarded + board1_awarded, 20);

        let conserved: Chips = orch.table().seats().values().map(|p| p.stack).sum();
        assert_eq!(conserved, 400);
    }
}
