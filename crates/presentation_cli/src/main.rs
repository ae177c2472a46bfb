//! Weather bot CLI
//!
//! Runs weather lookups, preference changes and cache maintenance against the
//! configured database and provider.

#![allow(clippy::print_stdout)]

mod app;
mod cli;

use anyhow::Context;
use clap::Parser;
use domain::UserId;
use infrastructure::{AppConfig, init_telemetry};

use crate::{app::App, cli::Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;

    let mut telemetry = config.telemetry.clone();
    if let Some(filter) = cli::log_filter_from_verbosity(cli.verbose) {
        telemetry.log_filter = filter.to_string();
    }
    init_telemetry(&telemetry)?;

    let app = App::build(config)?;
    let user = UserId::new(cli.user);
    let output = app.run(&user, cli.lang.as_deref(), cli.command).await?;

    println!("{output}");
    Ok(())
}
