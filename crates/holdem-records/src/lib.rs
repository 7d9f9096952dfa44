//! The hand event log: an append-only, per-hand sequenced history of
//! everything that happened in a hand, sufficient to reconstruct it by
//! replay. This crate owns the log and its projections only — the
//! events themselves are produced by `holdem-gameroom`'s orchestrator as
//! it drives `holdem-gameplay`.
#![allow(dead_code)]

mod event;
mod log;
mod replay;
mod summary;

pub use event::{HandEvent, Record};
pub use log::EventLog;
pub use replay::{net_results, replay, ActedEntry, ReplayState};
pub use summary::HandSummary;
