// Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// League history tool: owner aliases and bench efficiency
#[derive(Debug, Parser)]
#[command(name = "leaguebook")]
#[command(about = "Owner alias management and bench-efficiency reports for fantasy football leagues")]
pub struct Cli {
    /// Path to league.toml
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage the league's owner alias map
    Alias {
        #[command(subcommand)]
        action: AliasAction,
    },
    /// Per team-week actual, potential and bench points
    Bench {
        /// Roster history CSV
        csv: PathBuf,
        /// Only this season
        #[arg(long)]
        season: Option<u16>,
        /// Only this owner (any alias resolves)
        #[arg(long)]
        owner: Option<String>,
    },
    /// Bench efficiency rolled up by owner and season
    Summary {
        /// Roster history CSV
        csv: PathBuf,
        /// Number of biggest single-week misses to list
        #[arg(long, default_value = "5")]
        top: usize,
    },
}

#[derive(Debug, Subcommand)]
pub enum AliasAction {
    /// Merge ALIAS into CANONICAL
    Add { alias: String, canonical: String },
    /// Remove the rule for ALIAS
    Remove { alias: String },
    /// Show canonical owners and their aliases
    List,
    /// Print the canonical owner for NAME
    Resolve { name: String },
}
