use crate::event::{HandEvent, Record};
use crate::summary::HandSummary;
use holdem_core::{Error, ID};
use holdem_gameplay::{Hand, Table};
use std::collections::HashMap;

/// Append-only, in-memory reference implementation of the hand event log.
/// Durable implementations must preserve per-hand total ordering and the
/// `HandSummary` projection (spec §6.4); this one is what the core ships.
#[derive(Debug, Default)]
pub struct EventLog {
    by_hand: HashMap<ID<Hand>, Vec<Record>>,
    hand_table: HashMap<ID<Hand>, ID<Table>>,
    hand_number: HashMap<ID<Hand>, u64>,
    summaries: HashMap<ID<Hand>, HandSummary>,
    /// Hand ids for a table, oldest first, so `GetTableHistory` can return
    /// newest-first without re-sorting every call.
    table_hands: HashMap<ID<Table>, Vec<ID<Hand>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_sequence(&self, hand: ID<Hand>) -> u64 {
        self.by_hand
            .get(&hand)
            .and_then(|events| events.last())
            .map(|r| r.sequence)
            .unwrap_or(0)
    }

    /// Appends one event. The sequence must be exactly one past the
    /// current last sequence for this hand (starting at 1); anything else
    /// fails with `Conflict` and the append is abandoned.
    pub fn append(&mut self, record: Record) -> Result<(), Error> {
        let expected = self.last_sequence(record.hand_id) + 1;
        if record.sequence != expected {
            return Err(Error::conflict(format!(
                "expected sequence {expected} for hand {:?}, got {}",
                record.hand_id, record.sequence
            )));
        }

        if let HandEvent::HandStarted {
            table_id,
            hand_number,
            ..
        } = &record.event
        {
            self.hand_table.insert(record.hand_id, *table_id);
            self.hand_number.insert(record.hand_id, *hand_number);
            self.table_hands.entry(*table_id).or_default().push(record.hand_id);
        }

        let is_terminal = record.event.is_terminal();
        let hand_id = record.hand_id;
        self.by_hand.entry(hand_id).or_default().push(record);

        if is_terminal {
            self.materialize_summary(hand_id);
        }
        Ok(())
    }

    /// Appends a contiguous range of events atomically: either every event
    /// passes its sequence check or none of them are recorded.
    pub fn append_range(&mut self, records: Vec<Record>) -> Result<(), Error> {
        if records.is_empty() {
            return Ok(());
        }
        let hand_id = records[0].hand_id;
        let mut expected = self.last_sequence(hand_id) + 1;
        for record in &records {
            if record.hand_id != hand_id {
                return Err(Error::invalid_input(
                    "append_range requires every record to belong to the same hand",
                ));
            }
            if record.sequence != expected {
                return Err(Error::conflict(format!(
                    "expected sequence {expected}, got {}",
                    record.sequence
                )));
            }
            expected += 1;
        }
        for record in records {
            self.append(record)?;
        }
        Ok(())
    }

    pub fn get_events(&self, hand: ID<Hand>) -> &[Record] {
        self.by_hand.get(&hand).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_events_from(&self, hand: ID<Hand>, seq: u64) -> Vec<&Record> {
        self.get_events(hand)
            .iter()
            .filter(|r| r.sequence >= seq)
            .collect()
    }

    /// Summaries for `table`'s most recent hands, newest first.
    pub fn get_table_history(&self, table: ID<Table>, limit: usize) -> Vec<&HandSummary> {
        let Some(hands) = self.table_hands.get(&table) else {
            return Vec::new();
        };
        hands
            .iter()
            .rev()
            .filter_map(|id| self.summaries.get(id))
            .take(limit)
            .collect()
    }

    pub fn get_summary(&self, hand: ID<Hand>) -> Option<&HandSummary> {
        self.summaries.get(&hand)
    }

    fn materialize_summary(&mut self, hand_id: ID<Hand>) {
        let Some(events) = self.by_hand.get(&hand_id) else {
            return;
        };
        let Some(completed) = events.iter().find_map(|r| match &r.event {
            HandEvent::HandCompleted {
                total_pot,
                duration_ms,
                player_count,
                went_to_showdown,
                winners,
                ..
            } => Some((
                *total_pot,
                *duration_ms,
                *player_count,
                *went_to_showdown,
                winners.clone(),
            )),
            _ => None,
        }) else {
            return;
        };
        let (total_pot, duration_ms, player_count, went_to_showdown, winners) = completed;
        let completed_at_ms = events
            .iter()
            .map(|r| r.timestamp_ms)
            .max()
            .unwrap_or(0);
        let hand_number = self.hand_number.get(&hand_id).copied().unwrap_or(0);

        self.summaries.insert(
            hand_id,
            HandSummary {
                hand_id,
                hand_number,
                winners,
                total_pot,
                duration_ms,
                player_count,
                went_to_showdown,
                completed_at_ms,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hand: ID<Hand>, sequence: u64, event: HandEvent) -> Record {
        Record {
            hand_id: hand,
            sequence,
            timestamp_ms: sequence * 1000,
            event,
        }
    }

    #[test]
    fn duplicate_sequence_is_rejected() {
        let mut log = EventLog::new();
        let hand = ID::new();
        log.append(record(
            hand,
            1,
            HandEvent::HandStarted {
                table_id: ID::new(),
                hand_number: 1,
                button_seat: 0,
                sb_seat: 1,
                bb_seat: 2,
                sb_amount: 1,
                bb_amount: 2,
                player_ids: vec![],
                is_bomb_pot: false,
                double_board: false,
                ante_amount: 0,
            },
        ))
        .unwrap();
        let err = log
            .append(record(
                hand,
                1,
                HandEvent::BettingRoundCompleted {
                    phase: "Preflop".into(),
                    pot_amount: 3,
                    active_player_count: 2,
                },
            ))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[test]
    fn hand_completed_materializes_summary() {
        let mut log = EventLog::new();
        let hand = ID::new();
        let table = ID::new();
        log.append(record(
            hand,
            1,
            HandEvent::HandStarted {
                table_id: table,
                hand_number: 7,
                button_seat: 0,
                sb_seat: 1,
                bb_seat: 2,
                sb_amount: 1,
                bb_amount: 2,
                player_ids: vec![],
                is_bomb_pot: false,
                double_board: false,
                ante_amount: 0,
            },
        ))
        .unwrap();
        let winner = ID::new();
        log.append(record(
            hand,
            2,
            HandEvent::HandCompleted {
                total_pot: 40,
                duration_ms: 5000,
                player_count: 2,
                went_to_showdown: false,
                final_phase: "Preflop".into(),
                net_result: vec![],
                winners: vec![winner],
            },
        ))
        .unwrap();

        let summary = log.get_summary(hand).unwrap();
        assert_eq!(summary.hand_number, 7);
        assert_eq!(summary.total_pot, 40);
        assert_eq!(summary.winners, vec![winner]);
        assert_eq!(log.get_table_history(table, 10).len(), 1);
    }
}
