//! Intent extraction from free-form trip text
//!
//! Availability over precision: the extractor's contract is total. Whatever
//! the backing model does (timeouts, error statuses, unrepairable output),
//! the caller always receives an ordered candidate list, in the worst case
//! a naive whitespace split of the input.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm::ChatModel;
use crate::models::{Intent, Stop};
use crate::sanitize;

/// Fixed instruction for the chat capability: no reasoning preamble, pure
/// JSON, every intermediate stop preserved in input order
const SYSTEM_PROMPT: &str = r#"You are a travel route extraction API.
Task: Extract ALL cities/locations from the input, in order.

Rules:
1. Do NOT output <think> tags or any other reasoning.
2. Output pure JSON only.
3. Do not skip intermediate stops.

Example: "Fly Beijing -> Dubai -> London"
Output: {"locations": [{"name": "Beijing", "transport_mode": "flight"}, {"name": "Dubai", "transport_mode": "flight"}, {"name": "London", "transport_mode": "flight"}]}"#;

/// Turns raw trip text into an ordered [`Intent`]
pub struct IntentExtractor {
    model: Arc<dyn ChatModel>,
}

impl IntentExtractor {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Extract an ordered stop list. Never fails
    pub async fn extract(&self, text: &str) -> Intent {
        let raw = match self.model.complete(SYSTEM_PROMPT, text).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Chat completion failed, using naive split: {}", e);
                return fallback_intent(text);
            }
        };

        match sanitize::extract_json::<Intent>(&raw) {
            Ok(intent) => {
                debug!("Model extracted {} stops", intent.locations.len());
                intent
            }
            Err(e) => {
                warn!("Could not repair model output, using naive split: {}", e);
                fallback_intent(text)
            }
        }
    }
}

/// Whitespace split of the raw input, one stop per token, default transport
fn fallback_intent(text: &str) -> Intent {
    Intent {
        locations: text.split_whitespace().map(Stop::new).collect(),
    }
}
