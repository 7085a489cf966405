//! CLI argument definitions using clap
//!
//! Commands:
//! - pc-diagnose [interactive]
//! - pc-diagnose resolve --fact KEY=VALUE ...
//! - pc-diagnose history [--limit N]
//! - pc-diagnose rules

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Expert system for diagnosing common computer problems
#[derive(Parser, Debug)]
#[command(name = "pc-diagnose")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Answer the questionnaire and get a diagnosis (default)
    Interactive,

    /// Resolve a set of facts and print the diagnosis as JSON
    Resolve {
        /// Fact to declare, repeatable
        #[arg(short, long = "fact", value_name = "KEY=VALUE", value_parser = parse_fact)]
        facts: Vec<(String, String)>,
    },

    /// Show recent diagnoses
    History {
        /// Maximum number of entries
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// List the loaded rules
    Rules,
}

/// Parse a `KEY=VALUE` pair; the value may itself contain `=`
pub fn parse_fact(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty fact name in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
