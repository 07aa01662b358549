//! `costgrid` command-line interface.
//!
//! Usage:
//!   costgrid grid [--scenario FILE] [--set KEY=VALUE]... [--edit ID:MONTH=VALUE]...
//!   costgrid bridge | departments | kpis [--scenario FILE]
//!   costgrid lint FILE...
//!   costgrid schema

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Grid(args) => commands::run_grid(args),
        Command::Bridge(args) => commands::run_bridge(args),
        Command::Departments(args) => commands::run_departments(args),
        Command::Kpis(args) => commands::run_kpis(args),
        Command::Lint(args) => commands::run_lint(args),
        Command::Schema => commands::run_schema(),
    }
}
