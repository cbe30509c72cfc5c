//! V3XV0ID console tooling
//!
//! Library half of the `vex` binary: configuration loading, catalog
//! rendering and the offline playback simulator.

pub mod config;
pub mod error;
pub mod report;
pub mod simulate;

pub use config::ConsoleConfig;
pub use error::{ConsoleError, Result};
pub use simulate::{SimulatedMedia, Simulation, SimulationReport};

/// Log filter used when `RUST_LOG` is unset
///
/// Targets match by prefix, so this covers `vex_console`, `vex_playback`
/// and the other workspace crates.
pub const DEFAULT_LOG_FILTER: &str = "vex=info";
