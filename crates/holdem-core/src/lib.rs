//! Shared type aliases, identifiers, error taxonomy, and logging setup for
//! the holdem table engine.
#![allow(dead_code)]

mod error;
mod id;

pub use error::Error;
pub use id::{Unique, ID};

/// Chip amounts. Fixed non-negative integer scale; the core never deals in
/// fractional chips.
pub type Chips = i64;
/// Seat index around a table (0-based, clockwise).
pub type Position = usize;
/// Per-hand monotonically increasing event sequence number, starting at 1.
pub type Sequence = u64;

/// Random instance generation, used by tests and by shuffle verification
/// helpers that want an arbitrary permutation to compare against.
pub trait Arbitrary {
    fn random() -> Self;
}

/// Initialise dual logging (terminal + file) with a timestamped log file.
/// Mirrors the teacher binary's logging setup; the table-hosting process
/// that embeds this crate calls this once at startup.
pub fn log() {
    let _ = std::fs::create_dir_all("logs");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
