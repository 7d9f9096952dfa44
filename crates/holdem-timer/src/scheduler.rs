use crate::event::{TimerEvent, WARNING_THRESHOLD_SECONDS};
use crate::sink::{AutoFold, TimerSink};
use crate::state::TimerState;
use crate::{Hand, Player, Table};
use holdem_core::ID;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::time::Duration;

enum Control {
    Pause,
    Resume,
    Cancel(tokio::sync::oneshot::Sender<u32>),
}

/// One active timer's handle: the task driving its tick loop, plus a
/// channel to control it.
struct Handle {
    control: mpsc::UnboundedSender<Control>,
}

/// Schedules at most one action timer per table, per spec §4.10. Starting
/// a new timer for a table cancels whatever was running there.
pub struct TimerScheduler<S: TimerSink + 'static, A: AutoFold + 'static> {
    sink: Arc<S>,
    auto_fold: Arc<A>,
    handles: Arc<Mutex<HashMap<ID<Table>, Handle>>>,
}

impl<S: TimerSink + 'static, A: AutoFold + 'static> TimerScheduler<S, A> {
    pub fn new(sink: Arc<S>, auto_fold: Arc<A>) -> Self {
        Self {
            sink,
            auto_fold,
            handles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Starts (or restarts) the timer for `table`. Supersedes any timer
    /// already running there without publishing `TimerCancelled` for it —
    /// the caller is expected to have already resolved that player's turn.
    pub async fn start_timer(
        &self,
        hand_id: ID<Hand>,
        table_id: ID<Table>,
        player_id: ID<Player>,
        action_seconds: u32,
        bank_enabled: bool,
        bank_seconds: u32,
    ) {
        self.cancel_internal(table_id).await;

        let state = TimerState::new(
            hand_id,
            table_id,
            player_id,
            action_seconds,
            bank_enabled,
            bank_seconds,
        );
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        self.handles.lock().await.insert(table_id, Handle { control: control_tx });

        self.sink
            .publish(TimerEvent::TimerStarted {
                table: table_id,
                player: player_id,
                total_seconds: action_seconds,
                bank_available: bank_enabled && bank_seconds > 0,
            })
            .await;

        let sink = self.sink.clone();
        let auto_fold = self.auto_fold.clone();
        let handles = self.handles.clone();
        tokio::spawn(run_tick_loop(state, control_rx, sink, auto_fold, handles));
    }

    /// Stops the timer for `table`, publishes `TimerCancelled`, and
    /// returns the time-bank seconds it had consumed so the caller can
    /// debit the player's bank.
    pub async fn cancel_timer(&self, table_id: ID<Table>) -> u32 {
        self.cancel_internal(table_id).await
    }

    async fn cancel_internal(&self, table_id: ID<Table>) -> u32 {
        let handle = self.handles.lock().await.remove(&table_id);
        let Some(handle) = handle else { return 0 };
        let (tx, rx) = tokio::sync::oneshot::channel();
        if handle.control.send(Control::Cancel(tx)).is_err() {
            return 0;
        }
        rx.await.unwrap_or(0)
    }

    pub async fn pause(&self, table_id: ID<Table>) {
        if let Some(handle) = self.handles.lock().await.get(&table_id) {
            let _ = handle.control.send(Control::Pause);
        }
    }

    pub async fn resume(&self, table_id: ID<Table>) {
        if let Some(handle) = self.handles.lock().await.get(&table_id) {
            let _ = handle.control.send(Control::Resume);
        }
    }

    /// Stops every timer for `table` (e.g. the table is closing).
    pub async fn stop_all(&self, table_id: ID<Table>) {
        self.cancel_internal(table_id).await;
    }
}

async fn run_tick_loop<S: TimerSink + 'static, A: AutoFold + 'static>(
    mut state: TimerState,
    mut control_rx: mpsc::UnboundedReceiver<Control>,
    sink: Arc<S>,
    auto_fold: Arc<A>,
    handles: Arc<Mutex<HashMap<ID<Table>, Handle>>>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    let mut bank_seconds_consumed = 0u32;

    loop {
        tokio::select! {
            biased;
            control = control_rx.recv() => {
                match control {
                    Some(Control::Pause) => state.paused = true,
                    Some(Control::Resume) => state.paused = false,
                    Some(Control::Cancel(reply)) => {
                        sink.publish(TimerEvent::TimerCancelled {
                            table: state.table_id,
                            player: state.player_id,
                            bank_seconds_consumed,
                        })
                        .await;
                        let _ = reply.send(bank_seconds_consumed);
                        return;
                    }
                    None => return,
                }
            }
            _ = interval.tick() => {
                if state.paused {
                    continue;
                }
                if tick(&mut state, &sink, &mut bank_seconds_consumed).await {
                    auto_fold
                        .force_timeout_fold(state.table_id, state.player_id, bank_seconds_consumed)
                        .await;
                    handles.lock().await.remove(&state.table_id);
                    return;
                }
            }
        }
    }
}

/// Advances the clock by one second. Returns true when the timer has
/// fully expired (main timer out, no bank, or bank exhausted) and the
/// caller should force a timeout fold and stop.
async fn tick<S: TimerSink>(state: &mut TimerState, sink: &Arc<S>, bank_consumed: &mut u32) -> bool {
    if !state.bank_active {
        if state.remaining_seconds > 0 {
            state.remaining_seconds -= 1;
            sink.publish(TimerEvent::TimerTick {
                table: state.table_id,
                player: state.player_id,
                remaining_seconds: state.remaining_seconds,
                in_bank: false,
            })
            .await;
            if !state.warning_sent && state.remaining_seconds <= WARNING_THRESHOLD_SECONDS {
                state.warning_sent = true;
                sink.publish(TimerEvent::TimerWarning {
                    table: state.table_id,
                    player: state.player_id,
                })
                .await;
            }
            return false;
        }

        if state.bank_enabled && state.bank_remaining_seconds > 0 {
            state.bank_active = true;
            sink.publish(TimerEvent::TimeBankActivated {
                table: state.table_id,
                player: state.player_id,
                bank_remaining: state.bank_remaining_seconds,
            })
            .await;
            return false;
        }

        sink.publish(TimerEvent::TimerExpired {
            table: state.table_id,
            player: state.player_id,
        })
        .await;
        return true;
    }

    if state.bank_remaining_seconds > 0 {
        state.bank_remaining_seconds -= 1;
        *bank_consumed += 1;
        sink.publish(TimerEvent::TimerTick {
            table: state.table_id,
            player: state.player_id,
            remaining_seconds: state.bank_remaining_seconds,
            in_bank: true,
        })
        .await;
        if state.bank_remaining_seconds > 0 {
            return false;
        }
    }

    sink.publish(TimerEvent::TimerExpired {
        table: state.table_id,
        player: state.player_id,
    })
    .await;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::Mutex as TokioMutex;

    #[derive(Default)]
    struct CapturingSink {
        events: TokioMutex<Vec<TimerEvent>>,
    }

    #[async_trait::async_trait]
    impl TimerSink for CapturingSink {
        async fn publish(&self, event: TimerEvent) {
            self.events.lock().await.push(event);
        }
    }

    struct CountingAutoFold {
        calls: AtomicU32,
    }

    #[async_trait::async_trait]
    impl AutoFold for CountingAutoFold {
        async fn force_timeout_fold(&self, _table: ID<Table>, _player: ID<Player>, _bank: u32) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn main_timer_expiry_with_no_bank_calls_auto_fold() {
        let mut state = TimerState::new(ID::new(), ID::new(), ID::new(), 1, false, 0);
        let sink = Arc::new(CapturingSink::default());
        let mut bank_consumed = 0;
        state.remaining_seconds = 0;
        let expired = tick(&mut state, &sink, &mut bank_consumed).await;
        assert!(expired);
        let events = sink.events.lock().await;
        assert!(matches!(events.last(), Some(TimerEvent::TimerExpired { .. })));
    }

    #[tokio::test]
    async fn main_timer_hitting_zero_activates_the_bank_instead_of_expiring() {
        let mut state = TimerState::new(ID::new(), ID::new(), ID::new(), 1, true, 5);
        let sink = Arc::new(CapturingSink::default());
        let mut bank_consumed = 0;
        state.remaining_seconds = 0;
        let expired = tick(&mut state, &sink, &mut bank_consumed).await;
        assert!(!expired);
        assert!(state.bank_active);
        let events = sink.events.lock().await;
        assert!(matches!(events.last(), Some(TimerEvent::TimeBankActivated { .. })));
    }

    #[tokio::test]
    async fn cancelling_a_running_timer_reports_bank_seconds_consumed() {
        let sink = Arc::new(CapturingSink::default());
        let auto_fold = Arc::new(CountingAutoFold { calls: AtomicU32::new(0) });
        let scheduler = TimerScheduler::new(sink, auto_fold);
        let table = ID::new();
        scheduler.start_timer(ID::new(), table, ID::new(), 30, false, 0).await;
        let consumed = scheduler.cancel_timer(table).await;
        assert_eq!(consumed, 0);
    }
}
