//! Arbiter daemon: entry point for the relay and for voter nodes.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use arbiter_network::{RelayClient, RelayServer};
use arbiter_node::{init_logging, NodeConfig, ShutdownController, VoterNode};
use clap::Parser;

#[derive(Parser)]
#[command(name = "arbiter-daemon", about = "Arbiter relay and voter daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the message relay every voter connects to.
    Relay {
        /// TCP port to listen on.
        #[arg(long, default_value_t = 9000, env = "ARBITER_RELAY_PORT")]
        port: u16,

        /// Log level when `RUST_LOG` is unset.
        #[arg(long, default_value = "info", env = "ARBITER_LOG_LEVEL")]
        log_level: String,
    },

    /// Run a voter node.
    Voter {
        /// Path to the voter's TOML configuration file.
        #[arg(long, env = "ARBITER_CONFIG")]
        config: PathBuf,

        /// Relay address ("host:port"). Overrides the file.
        #[arg(long, env = "ARBITER_RELAY")]
        relay: Option<String>,

        /// Ledger directory. Overrides the file.
        #[arg(long, env = "ARBITER_DATA_DIR")]
        data_dir: Option<PathBuf>,

        /// Log level: "trace", "debug", "info", "warn", "error".
        #[arg(long, env = "ARBITER_LOG_LEVEL")]
        log_level: Option<String>,

        /// Log format: "human" or "json".
        #[arg(long, env = "ARBITER_LOG_FORMAT")]
        log_format: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Relay { port, log_level } => {
            arbiter_utils::init_tracing(&log_level);
            run_relay(port).await
        }
        Command::Voter {
            config,
            relay,
            data_dir,
            log_level,
            log_format,
        } => {
            let mut node_config = NodeConfig::from_toml_file(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            if let Some(relay) = relay {
                node_config.relay = relay;
            }
            if let Some(data_dir) = data_dir {
                node_config.data_dir = data_dir;
            }
            if let Some(level) = log_level {
                node_config.log_level = level;
            }
            if let Some(format) = log_format {
                node_config.log_format = format;
            }
            node_config.validate()?;
            init_logging(node_config.log_format()?, &node_config.log_level);
            tracing::info!("loaded config from {}", config.display());
            run_voter(node_config).await
        }
    }
}

async fn run_relay(port: u16) -> anyhow::Result<()> {
    let server = RelayServer::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding relay port {port}"))?;

    let shutdown = Arc::new(ShutdownController::new());
    let signals = Arc::clone(&shutdown);
    tokio::spawn(async move { signals.wait_for_signal().await });

    server.run(shutdown.subscribe()).await?;
    tracing::info!("relay exited cleanly");
    Ok(())
}

async fn run_voter(config: NodeConfig) -> anyhow::Result<()> {
    let (client, inbound) = RelayClient::connect(config.relay.as_str())
        .await
        .with_context(|| format!("connecting to relay {}", config.relay))?;
    let node = VoterNode::open(&config, client)?;
    tracing::info!(
        account = %node.account_id(),
        relay = %config.relay,
        data_dir = %config.data_dir.display(),
        "starting voter"
    );

    let shutdown = Arc::new(ShutdownController::new());
    let signals = Arc::clone(&shutdown);
    tokio::spawn(async move { signals.wait_for_signal().await });

    node.run(inbound, shutdown.subscribe()).await?;
    tracing::info!("voter exited cleanly");
    Ok(())
}
