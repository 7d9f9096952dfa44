use crate::{Player, Table};
use holdem_core::ID;

/// Outbound timer notifications, published via whatever `TimerSink` the
/// caller supplies. Every variant carries the table so a single sink can
/// multiplex many tables.
#[derive(Debug, Clone, Copy)]
pub enum TimerEvent {
    TimerStarted {
        table: ID<Table>,
        player: ID<Player>,
        total_seconds: u32,
        bank_available: bool,
    },
    TimerTick {
        table: ID<Table>,
        player: ID<Player>,
        remaining_seconds: u32,
        in_bank: bool,
    },
    TimerWarning {
        table: ID<Table>,
        player: ID<Player>,
    },
    TimeBankActivated {
        table: ID<Table>,
        player: ID<Player>,
        bank_remaining: u32,
    },
    TimerExpired {
        table: ID<Table>,
        player: ID<Player>,
    },
    TimerCancelled {
        table: ID<Table>,
        player: ID<Player>,
        bank_seconds_consumed: u32,
    },
}

/// Threshold, in seconds of the main timer remaining, at which a single
/// `TimerWarning` is published.
pub const WARNING_THRESHOLD_SECONDS: u32 = 10;
