//! etflux CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, build the run
//! configuration, process every site and exit with an error status when any
//! site failed. For programmatic use, prefer the library API (`etflux::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
