use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use boardsync::cli::{Cli, Commands};
use boardsync::config::{CONFIG_FILE, SyncConfig};
use boardsync::github::GithubClient;
use boardsync::sync::SyncRunner;

fn main() -> Result<()> {
    let cli = Cli::parse();
    boardsync::logging::init(cli.verbose, cli.log_file.clone());

    match cli.command {
        Commands::Init { org, project } => cmd_init(org, project),
        Commands::Sync { token, dry_run } => cmd_sync(cli.config, &token, dry_run),
    }
}

fn cmd_init(org: Option<String>, project: Option<u64>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config_path = cwd.join(CONFIG_FILE);

    if config_path.exists() {
        anyhow::bail!("Configuration already exists at {}", config_path.display());
    }

    let mut config = SyncConfig::default();
    if let Some(org) = org {
        config.board.org = org;
    }
    config.board.project = project;
    config.save(&config_path)?;

    println!("{} {}", "Created".green(), config_path.display());
    println!("Fill in board.org, board.project and the source filters before syncing.");
    Ok(())
}

fn cmd_sync(config_path: Option<PathBuf>, token: &str, dry_run: bool) -> Result<()> {
    let (config, path) = load_config(config_path)?;
    tracing::debug!(config = %path.display(), "loaded configuration");
    config.validate().context("Invalid configuration")?;

    let client = GithubClient::new(token, &config)?;
    let runner = SyncRunner::new(&client, &client, &config, dry_run);
    let summary = runner.run()?;

    if dry_run {
        println!(
            "{} {} items across {} repositories (no changes made)",
            "Planned".yellow(),
            summary.planned,
            summary.repos
        );
    } else {
        println!(
            "{} {} items across {} repositories ({} written, {} already set)",
            "Synced".green(),
            summary.items,
            summary.repos,
            summary.written,
            summary.already_set
        );
    }
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<(SyncConfig, PathBuf)> {
    let result = match path {
        Some(path) => SyncConfig::load_from(&path),
        None => {
            let cwd = std::env::current_dir()?;
            SyncConfig::load(&cwd)
        }
    };
    result.context("Failed to load boardsync configuration")
}
