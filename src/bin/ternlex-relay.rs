//! ternlex-relay - HTTP relay speaking modulated trit payloads
//!
//! ```bash
//! ternlex-relay --port 8000 --data-dir data/ternlex
//! ```
//!
//! Defaults come from `TERNLEX_HOST`, `TERNLEX_PORT` and `TERNLEX_DATA_DIR`;
//! flags override them. `RUST_LOG` controls log output (default `info`).

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use ternlex::relay::{self, RelayConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "ternlex-relay")]
#[command(version, about = "Relay balanced-ternary messages over HTTP")]
struct Cli {
    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding map.json and tier2_map.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON config file (host, port, data_dir); flags still override it
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RelayConfig::from_file(path)?,
        None => RelayConfig::from_env(),
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    relay::run(config).await
}
