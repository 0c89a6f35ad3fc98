//! rippled passthrough
//!
//! Exposes rippled JSON-RPC methods as plain HTTP endpoints.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │               RIPPLED PASSTHROUGH             │
//!                      │                                               │
//!   POST /ledger       │  ┌──────────────┐      ┌──────────────────┐   │
//!   ───────────────────┼─▶│ axum | hyper │─────▶│   passthrough    │   │
//!                      │  │    engine    │      │     handler      │   │
//!                      │  └──────────────┘      └────────┬─────────┘   │
//!                      │                                 │             │
//!                      │                        ┌────────▼─────────┐   │    {"method":"ledger",
//!                      │                        │     upstream     │───┼──▶  "params":[{...}]}   rippled
//!   {"ledger":...}     │  ┌──────────────┐      │ resolve + client │   │
//!   ◀──────────────────┼──│ CORS headers │◀─────│  unwrap result   │◀──┼───  {"result":{...}}
//!                      │  └──────────────┘      └──────────────────┘   │
//!                      └───────────────────────────────────────────────┘
//! ```
//!
//! Upstream per request: `?jrpcURL=`, else `$JSON_RPC_URL`, else the
//! configured network (mainnet by default).

use std::path::PathBuf;

use clap::Parser;

use rippled_passthrough::config::{load_config, validate_config, ConfigError, Engine, PassthroughConfig};
use rippled_passthrough::lifecycle::startup;
use rippled_passthrough::observability::logging;
use rippled_passthrough::upstream::Network;

#[derive(Parser, Debug)]
#[command(name = "rippled-passthrough", version)]
#[command(about = "HTTP to rippled JSON-RPC passthrough", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080.
    #[arg(short, long)]
    bind: Option<String>,

    /// HTTP engine: axum or hyper.
    #[arg(short, long)]
    engine: Option<Engine>,

    /// Fallback network: mainnet, testnet or devnet.
    #[arg(short, long)]
    network: Option<Network>,

    /// Fallback upstream URL, overrides --network.
    #[arg(short, long)]
    upstream: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut PassthroughConfig) {
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(engine) = self.engine {
            config.server.engine = engine;
        }
        if let Some(network) = self.network {
            config.upstream.network = network;
        }
        if let Some(upstream) = self.upstream {
            config.upstream.url = Some(upstream);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => load_config(path)?,
        None => PassthroughConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rippled-passthrough starting");

    startup::run(config).await
}
