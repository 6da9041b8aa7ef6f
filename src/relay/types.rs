//! Relay wire types

use serde::{Deserialize, Serialize};

/// Mime type of a modulated trit payload
pub const TRIT_MIME: &str = "application/x-arch-trit+v5";

fn default_mime() -> String {
    TRIT_MIME.to_string()
}

/// Message in either direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TritMessage {
    pub payload: String,
    #[serde(default = "default_mime")]
    pub mime_type: String,
}

/// Static description served at `/.well-known/agent-card.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub version: String,
    pub capabilities: Vec<String>,
    #[serde(rename = "supportedMimeTypes")]
    pub supported_mime_types: Vec<String>,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub messages: String,
}

impl Default for AgentCard {
    fn default() -> Self {
        Self {
            name: "arch-lexicon-relay".to_string(),
            description: "Balanced ternary lexicon relay".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            capabilities: vec!["text".to_string(), "trits".to_string()],
            supported_mime_types: vec![TRIT_MIME.to_string(), "text/plain".to_string()],
            endpoints: Endpoints {
                messages: "/a2a/messages".to_string(),
            },
        }
    }
}
