//! Computer Problem Diagnosis - Terminal Entry Point

mod args;
mod commands;
mod console;

use anyhow::Context;
use api::{init_logging, load_rules, AppConfig};
use args::{Cli, Command};
use clap::Parser;
use history::HistoryLog;
use std::io;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Quiet console unless the config or environment asks for more
    let mut config = AppConfig::load_with_defaults(cli.config.as_deref(), &[("log.level", "warn")])
        .context("failed to load configuration")?;
    if cli.verbose {
        config.log.level = "debug".to_string();
    }
    init_logging(&config.log);

    let rules = Arc::new(load_rules(&config).context("failed to load rule table")?);
    let history = config
        .history
        .enabled
        .then(|| HistoryLog::new(&config.history.path));

    let stdout = io::stdout();
    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            commands::interactive(io::stdin().lock(), stdout.lock(), rules, history.as_ref())?;
        }
        Command::Resolve { facts } => commands::resolve(&mut stdout.lock(), &rules, facts)?,
        Command::History { limit } => match &history {
            Some(log) => commands::show_history(&mut stdout.lock(), log, limit)?,
            None => eprintln!("Diagnosis history is disabled."),
        },
        Command::Rules => commands::list_rules(&mut stdout.lock(), &rules)?,
    }

    Ok(())
}
