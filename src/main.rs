mod cli;
mod application;
mod domain;
mod data;
mod ml;
mod infra;

use anyhow::Result;
use clap::Parser;
use cli::{commands::normalize_legacy_flags, Cli};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(cli::log_filter())
        .init();

    let cli = Cli::parse_from(normalize_legacy_flags(std::env::args()));
    cli.run()
}
