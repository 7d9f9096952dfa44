//! Per-table action-timer subsystem: a tick loop with a warning
//! threshold, time-bank overflow, and an authoritative expiry that
//! drives the orchestrator's `ForceTimeoutFold`.
//!
//! This crate has no dependency on `holdem-gameplay` — it only needs
//! stable ids for tables, players, and hands, tagged with its own
//! phantom markers. The orchestrator bridges between its own
//! `ID<holdem_gameplay::Table>`/`ID<holdem_gameplay::Player>` and these
//! via `ID::cast`.
#![allow(dead_code)]

mod event;
mod scheduler;
mod sink;
mod state;

pub use event::{TimerEvent, WARNING_THRESHOLD_SECONDS};
pub use scheduler::TimerScheduler;
pub use sink::{AutoFold, TimerSink};
pub use state::TimerState;

pub struct Table;
pub struct Player;
pub struct Hand;
