//! Command Line Interface (CLI) layer for etflux.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that turns options into an
//! `AnalysisConfig` and hands it to `etflux::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
