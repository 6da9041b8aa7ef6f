use std::sync::Arc;

use crate::codec::Codec;
use crate::relay::types::AgentCard;

/// Shared application state for the relay
#[derive(Clone)]
pub struct RelayState {
    inner: Arc<RelayStateInner>,
}

struct RelayStateInner {
    codec: Codec,
    card: AgentCard,
}

impl RelayState {
    pub fn new(codec: Codec) -> Self {
        Self {
            inner: Arc::new(RelayStateInner {
                codec,
                card: AgentCard::default(),
            }),
        }
    }

    pub fn codec(&self) -> &Codec {
        &self.inner.codec
    }

    pub fn card(&self) -> &AgentCard {
        &self.inner.card
    }
}
