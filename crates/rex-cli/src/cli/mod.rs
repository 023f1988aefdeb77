//! CLI for the REX resilient request executor.

mod commands;
mod transport;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rex_core::config;
use rex_core::retry::RetryPolicy;
use std::time::Duration;

use commands::{run_probe, run_query};

/// Top-level CLI for the REX resilient request executor.
#[derive(Debug, Parser)]
#[command(name = "rex")]
#[command(about = "REX: run network requests under a retry policy", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Retry-policy overrides shared by all commands. Unset flags fall back to
/// the config file, then to built-in defaults.
#[derive(Debug, Args)]
pub struct PolicyArgs {
    /// Maximum attempts, including the first.
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Backoff delay after the first failed attempt, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub initial_delay_ms: Option<u64>,

    /// Upper bound on any backoff delay, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub max_delay_ms: Option<u64>,

    /// Disable backoff jitter (delays become deterministic).
    #[arg(long)]
    pub no_jitter: bool,

    /// Hard per-attempt timeout, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

impl PolicyArgs {
    /// Applies the overrides on top of a base policy.
    pub fn apply(&self, mut policy: RetryPolicy) -> RetryPolicy {
        if let Some(attempts) = self.attempts {
            policy.max_attempts = attempts;
        }
        if let Some(ms) = self.initial_delay_ms {
            policy.initial_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.max_delay_ms {
            policy.max_delay = Duration::from_millis(ms);
        }
        if self.no_jitter {
            policy.jitter = false;
        }
        if let Some(ms) = self.timeout_ms {
            policy.per_attempt_timeout = Duration::from_millis(ms);
        }
        policy
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Send a GraphQL query and print the JSON response.
    Query {
        /// GraphQL document to send, e.g. '{ launches(limit: 5) { mission_name } }'.
        query: String,

        /// Endpoint URL (default: the configured endpoint).
        #[arg(long)]
        url: Option<String>,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Probe the endpoint with a body-less HEAD request and report the result.
    Probe {
        /// Endpoint URL (default: the configured endpoint).
        #[arg(long)]
        url: Option<String>,

        #[command(flatten)]
        policy: PolicyArgs,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Query { query, url, policy } => {
                let url = url.unwrap_or_else(|| cfg.endpoint.clone());
                run_query(&url, &query, policy.apply(cfg.policy())).await?;
            }
            CliCommand::Probe { url, policy } => {
                let url = url.unwrap_or_else(|| cfg.endpoint.clone());
                run_probe(&url, policy.apply(cfg.policy())).await?;
            }
        }

        Ok(())
    }
}
