//! ## catmouse-cli
//! **Command-line driver for the cats-and-mice simulation**
//!
//! - `catmouse simulate`: one run from configuration plus flag overrides
//! - `catmouse fuzz`: repeated runs over random configurations

use clap::Parser;

mod commands;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    commands::run_command(Cli::parse())
}
