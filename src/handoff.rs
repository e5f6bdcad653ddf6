// Outbound hand-off of a composed reservation message.
// Delivery is fire-and-forget: nothing is awaited from the other side.

use thiserror::Error;
use tracing::info;
use url::Url;

pub const DEFAULT_RECIPIENT: &str = "5521997305179";
pub const DEFAULT_WHATSAPP_URL: &str = "https://wa.me";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandoffError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Invalid hand-off URL: {0}")]
    Url(String),
}

#[derive(Debug, Clone)]
pub struct HandoffConfig {
    pub recipient: String,
    pub base_url: String,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            base_url: DEFAULT_WHATSAPP_URL.to_string(),
        }
    }
}

// What the channel produced for a message, e.g. a link to open.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub url: Url,
}

pub trait MessageChannel: Send + Sync {
    fn dispatch(&self, message: &str) -> Result<Dispatch, HandoffError>;
}

// Click-to-chat link with the message prefilled.
#[derive(Debug, Clone)]
pub struct WhatsAppHandoff {
    config: HandoffConfig,
}

impl WhatsAppHandoff {
    pub fn new(config: HandoffConfig) -> Result<Self, HandoffError> {
        let recipient = config.recipient.trim();
        if recipient.is_empty() || !recipient.chars().all(|c| c.is_ascii_digit()) {
            return Err(HandoffError::InvalidRecipient(config.recipient.clone()));
        }
        Ok(Self { config })
    }

    pub fn message_url(&self, message: &str) -> Result<Url, HandoffError> {
        let base = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.recipient.trim()
        );
        Url::parse_with_params(&base, &[("text", message)])
            .map_err(|e| HandoffError::Url(e.to_string()))
    }
}

impl MessageChannel for WhatsAppHandoff {
    fn dispatch(&self, message: &str) -> Result<Dispatch, HandoffError> {
        let url = self.message_url(message)?;
        info!("Handing off reservation request to {}", self.config.recipient);
        Ok(Dispatch { url })
    }
}
