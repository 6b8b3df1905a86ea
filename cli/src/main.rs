//! ChainProbe CLI — run the exporter or inspect its configuration.
//!
//! # Commands
//! ```text
//! chainprobe run   --config <config.yaml> [--metrics-addr <host:port>]
//! chainprobe check --config <config.yaml>
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chainprobe_core::config::ExporterConfig;

mod cmd_check;
mod cmd_run;

#[derive(Parser)]
#[command(
    name = "chainprobe",
    about = "Export on-chain balances, vault positions and prices as Prometheus metrics",
    long_about = "
ChainProbe polls an Ethereum execution node over JSON-RPC and republishes
account balances, ERC20/721/1155 holdings, ERC4337 deposits, ERC4626 vault
positions, Chainlink answers and Uniswap V2 prices as labeled gauges.

ENVIRONMENT VARIABLES:
  RUST_LOG    Log filter, overrides the `logging` section of the config
",
    version
)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the exporter and serve /metrics until Ctrl-C
    Run {
        /// Override `metrics_addr` from the config
        #[arg(long)]
        metrics_addr: Option<String>,
    },

    /// Validate the configuration and print every job's label schema
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ExporterConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    match cli.command {
        Commands::Run { metrics_addr } => cmd_run::run(config, metrics_addr).await,
        Commands::Check => cmd_check::run(&config),
    }
}
