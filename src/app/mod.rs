// Application layer: turns CLI commands into store calls and renders the results.

#[cfg(feature = "cli")]
pub mod commands;
pub mod report;
