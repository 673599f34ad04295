//! CLI for the upq upload queue.

mod commands;
mod notifier;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use upq_core::config;

use commands::{run_config, run_upload, run_watch};

/// Top-level CLI for upq.
#[derive(Debug, Parser)]
#[command(name = "upq")]
#[command(about = "upq: rate-limited uploads bound to a linked chat session", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Queue files and upload them in order.
    Upload {
        /// Files to upload. Duplicates are ignored; files over 8 MiB are skipped.
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
        /// Use this session id instead of waiting for one on the push channel.
        #[arg(long, value_name = "ID")]
        session: Option<String>,
        /// How long to wait for the push channel to deliver a session id.
        #[arg(long, default_value = "30", value_name = "SECS")]
        wait_secs: u64,
    },

    /// Connect to the push channel and print session and status changes.
    Watch,

    /// Show the config file location and effective settings.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Upload {
                paths,
                session,
                wait_secs,
            } => run_upload(&cfg, &paths, session, Duration::from_secs(wait_secs)).await?,
            CliCommand::Watch => run_watch(&cfg).await?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
