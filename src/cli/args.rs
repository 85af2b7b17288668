//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::SearchStatus;

/// Retrosynthesis route trees: build, inspect and validate search results
#[derive(Parser, Debug)]
#[command(name = "retrotree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -d -d debug, -d -d -d trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    /// Directory holding .retrotree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, env = "RETROTREE_CONFIG_DIR", value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the trees of a route file
    Tree {
        /// JSON file: array of routes or a search update
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Drop routes scoring below this value
        #[arg(long)]
        min_score: Option<f64>,
        /// Print trees as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show steps and molecule counts per route
    Summary {
        /// JSON file: array of routes or a search update
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Drop routes scoring below this value
        #[arg(long)]
        min_score: Option<f64>,
        /// Number of routes to show
        #[arg(short = 'n', long, default_value_t = 5)]
        max_routes: usize,
    },

    /// Check every route of a file for structural validity
    Validate {
        /// JSON file: array of routes or a search update
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Compute the next search status from one batch's signals
    Status {
        /// Current status
        #[arg(long, value_parser = parse_status, default_value = "pending")]
        current: SearchStatus,
        /// Number of routes in the batch
        #[arg(long, default_value_t = 0)]
        results: usize,
        /// Batch is the last one
        #[arg(long)]
        complete: bool,
        /// Error reported by the worker
        #[arg(long)]
        error: Option<String>,
    },

    /// Apply a search update file to a search
    Update {
        /// JSON file with routes, is_complete, error_message
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Target smiles of the search
        #[arg(long)]
        smiles: String,
        /// Status before the update
        #[arg(long, value_parser = parse_status, default_value = "pending")]
        current: SearchStatus,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Init,

    /// Show config paths
    Path,
}

fn parse_status(s: &str) -> Result<SearchStatus, String> {
    s.parse::<SearchStatus>().map_err(|e| e.to_string())
}
