//! CLI for lazyart artifact handles.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lazyart_core::config;
use std::path::PathBuf;

use commands::{run_checksum, run_resolve, run_show_config, ResolveArgs};

/// Top-level CLI for lazyart.
#[derive(Debug, Parser)]
#[command(name = "lazyart")]
#[command(about = "lazyart: lazily resolved, memoized artifact handles", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve an artifact into the cache through a deferred handle.
    Resolve {
        /// Owning module version, e.g. `org.example:lib:1.0`.
        owner: String,

        /// Artifact name: `name[:classifier][@extension]`.
        artifact: String,

        /// File the artifact is copied from on first resolution.
        #[arg(long, value_name = "PATH")]
        source: PathBuf,

        /// Expected SHA-256 of the resolved file.
        #[arg(long, value_name = "HEX")]
        sha256: Option<String>,

        /// Number of concurrent callers asking for the file (default 1).
        #[arg(long, default_value = "1", value_name = "N")]
        callers: usize,
    },

    /// Compute SHA-256 of a file (e.g. a resolved artifact).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Show the config file location and effective settings.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve {
                owner,
                artifact,
                source,
                sha256,
                callers,
            } => {
                let args = ResolveArgs {
                    owner,
                    artifact,
                    source,
                    sha256,
                    callers,
                };
                run_resolve(&cfg, args).await?;
            }
            CliCommand::Checksum { path } => run_checksum(&path).await?,
            CliCommand::Config => run_show_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
