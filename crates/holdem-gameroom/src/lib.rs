//! Binds `holdem-gameplay`'s per-hand state machine to a table's seating
//! and the persistent event log, and produces the per-viewer snapshots
//! clients actually see. This is spec §4.9/§4.11's home: the
//! [`GameOrchestrator`] drives one table's hands end to end; [`sanitiser`]
//! hides what a viewer shouldn't see.
#![allow(dead_code)]

mod orchestrator;
mod sanitiser;
mod table;

pub use orchestrator::{ActionResult, GameOrchestrator, HandStartResult};
pub use sanitiser::{
    snapshot_for_spectator, snapshot_for_viewer, AvailableActions, HandSnapshot, HoleView, SeatView,
};
pub use table::{SeatedPlayer, Table};

/// Phantom tag for `ID<Table>` at the gameroom layer — seating and table
/// configuration are owned here, one level up from
/// `holdem_gameplay::Table`'s per-hand tag. The orchestrator bridges
/// between the two with `ID::cast`.
pub struct TableTag;
