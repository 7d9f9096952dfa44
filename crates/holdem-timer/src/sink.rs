use crate::event::TimerEvent;
use crate::{Player, Table};
use async_trait::async_trait;
use holdem_core::ID;

/// Where timer events go. The real implementation forwards to the
/// Broadcaster named in spec §6.3; tests can capture events in memory.
#[async_trait]
pub trait TimerSink: Send + Sync {
    async fn publish(&self, event: TimerEvent);
}

/// The orchestrator operation a timer expiry (main or time-bank) drives:
/// an authoritative fold on behalf of whichever player the clock ran out
/// on, exactly as if they had sent a Fold intent themselves (spec §4.9's
/// `ForceTimeoutFold`).
#[async_trait]
pub trait AutoFold: Send + Sync {
    async fn force_timeout_fold(&self, table: ID<Table>, player: ID<Player>, time_bank_consumed: u32);
}
