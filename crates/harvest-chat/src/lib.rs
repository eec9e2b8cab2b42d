//! Chatbot proxy: relays a single user message to Gemini with a fixed
//! farming-assistant persona and returns the generated text.
//!
//! Every call is independent. There is no conversation state, retry or rate
//! limiting.

pub mod client;
pub mod error;
pub mod types;

use std::time::Duration;

use tracing::{debug, info, warn};

pub use crate::client::GeminiClient;
pub use crate::error::ChatError;
use crate::types::GenerationConfig;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const SYSTEM_INSTRUCTION: &str = "You are Harvest Assistant, a friendly agricultural advisor \
for small and medium farms. Give short, practical answers about crops, soil health, irrigation, \
fertilizers, pests and plant diseases, weather, market prices and farm equipment. Use simple \
language a farmer can act on. If a question has nothing to do with farming, politely steer the \
conversation back to agriculture.";

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 1024;
pub const TOP_P: f32 = 0.95;
pub const TOP_K: u32 = 40;

#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// `None` leaves the proxy unconfigured; every chat then fails with
    /// [`ChatError::ServiceUnavailable`].
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct ChatProxy {
    client: Option<GeminiClient>,
    generation: GenerationConfig,
}

fn sampling() -> GenerationConfig {
    GenerationConfig {
        temperature: TEMPERATURE,
        max_output_tokens: MAX_OUTPUT_TOKENS,
        top_p: TOP_P,
        top_k: TOP_K,
    }
}

impl ChatProxy {
    pub fn new(config: ChatConfig) -> anyhow::Result<Self> {
        let client = match config.api_key.filter(|k| !k.trim().is_empty()) {
            Some(api_key) => {
                let client =
                    GeminiClient::new(&config.base_url, api_key, config.model, config.timeout)?;
                info!("Chatbot enabled (model {})", client.model());
                Some(client)
            }
            None => {
                warn!("No Gemini API key configured; chatbot disabled");
                None
            }
        };

        Ok(Self {
            client,
            generation: sampling(),
        })
    }

    /// A proxy that always answers `ServiceUnavailable`.
    pub fn disabled() -> Self {
        Self {
            client: None,
            generation: sampling(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub async fn chat(&self, message: &str) -> Result<String, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::InvalidInput);
        }

        let client = self.client.as_ref().ok_or(ChatError::ServiceUnavailable)?;

        debug!("Forwarding chat message ({} chars)", message.chars().count());
        client
            .generate(SYSTEM_INSTRUCTION, message, &self.generation)
            .await
    }
}
