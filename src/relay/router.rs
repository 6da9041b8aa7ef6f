use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::RelayState;

/// Create the relay router
pub fn create_router(state: RelayState) -> Router {
    Router::new()
        // Health check
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/a2a/messages", post(handlers::messages))
        .route("/.well-known/agent-card.json", get(handlers::agent_card))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
