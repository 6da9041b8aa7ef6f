//! Relay - HTTP surface over the codec
//!
//! ```text
//! POST /a2a/messages                  { "payload": "<trits>", "mime_type": "..." }
//! GET  /.well-known/agent-card.json   static agent description
//! GET  /health
//! ```
//!
//! Incoming payloads are demodulated and decoded; the reply quotes the decoded
//! text and is encoded and modulated the same way.

mod config;
mod handlers;
mod router;
mod state;
pub mod types;

pub use config::RelayConfig;
pub use handlers::reply_text;
pub use router::create_router;
pub use state::RelayState;
pub use types::{AgentCard, TritMessage, TRIT_MIME};

use anyhow::Context;

use crate::codec::Codec;

/// Load the tables and run the HTTP server
pub async fn run(config: RelayConfig) -> anyhow::Result<()> {
    let codec = Codec::load_dir(&config.data_dir)
        .with_context(|| format!("Failed to load tables from {}", config.data_dir.display()))?;
    serve(config, codec).await
}

/// Run the HTTP server with an already loaded codec
pub async fn serve(config: RelayConfig, codec: Codec) -> anyhow::Result<()> {
    let router = create_router(RelayState::new(codec));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("ternlex relay listening on http://{}", addr);

    axum::serve(listener, router).await.context("Relay server error")?;

    Ok(())
}
