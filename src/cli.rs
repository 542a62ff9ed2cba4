use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "boardsync")]
#[command(
    author,
    version,
    about = "Sync issues and PRs into a GitHub Projects board for triage"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (searches upward for .boardsync.yml by default)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose (DEBUG) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write structured logs to this file in addition to stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default .boardsync.yml into the current directory
    Init {
        /// Organization that owns the project board
        #[arg(long)]
        org: Option<String>,

        /// Project number, as shown in the board URL
        #[arg(long)]
        project: Option<u64>,
    },

    /// Run the batch sync against the configured board
    Sync {
        /// GitHub token with repo, read:org and project scopes
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,

        /// Discover and report without issuing any board mutations
        #[arg(long)]
        dry_run: bool,
    },
}
