use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use super::state::RelayState;
use crate::trit::Trit;
use super::types::{AgentCard, TritMessage, TRIT_MIME};

/// Characters of the decoded message quoted back in the reply
pub const ECHO_LIMIT: usize = 400;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "ternlex relay is running"
}

/// Build the reply text for a decoded message
pub fn reply_text(plaintext: &str) -> String {
    let quoted: String = plaintext.chars().take(ECHO_LIMIT).collect();
    format!("[Arch Relay] Received in balanced ternary: {}...", quoted)
}

/// POST /a2a/messages - decode the payload and answer with an encoded echo
pub async fn messages(
    State(state): State<RelayState>,
    Json(message): Json<TritMessage>,
) -> Result<Json<TritMessage>, (StatusCode, String)> {
    let plaintext = state.codec().decode(&message.payload);
    tracing::info!(
        "Relay message: {} trits in, {} chars decoded",
        count_trits(&message.payload),
        plaintext.chars().count()
    );

    let payload = state
        .codec()
        .encode(&reply_text(&plaintext))
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    Ok(Json(TritMessage {
        payload,
        mime_type: TRIT_MIME.to_string(),
    }))
}

/// Alphabet symbols in a payload, ignoring whitespace and noise
fn count_trits(payload: &str) -> usize {
    payload.chars().filter(|c| Trit::is_symbol(*c)).count()
}

/// GET /.well-known/agent-card.json
pub async fn agent_card(State(state): State<RelayState>) -> Json<AgentCard> {
    Json(state.card().clone())
}
