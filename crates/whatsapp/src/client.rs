use crate::types::{GatewayConfig, OutboundMessage};

/// Errors from one send attempt.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The gateway answered with a non-2xx status; `message` is the
    /// gateway's own description when it sent one.
    #[error("gateway rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("gateway connection error: {0}")]
    Connection(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        GatewayError::Connection(error.to_string())
    }
}

/// HTTP client for the messaging gateway.
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl WhatsAppClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn account_id(&self) -> &str {
        &self.config.account_id
    }

    /// Deliver one message. 2xx means the gateway accepted it; anything
    /// else surfaces as [`GatewayError::Rejected`] with the gateway's
    /// message, defaulting to "Error al enviar".
    pub async fn send(&self, message: &OutboundMessage) -> Result<(), GatewayError> {
        let url = format!(
            "{}/whatsapp/accounts/{}/messages",
            self.config.api_url.trim_end_matches('/'),
            self.config.account_id
        );

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("x-account-id", &self.config.account_id)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                to = %message.to_number,
                kind = message.message_type.as_str(),
                "gateway accepted message"
            );
            return Ok(());
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| "Error al enviar".to_string());

        Err(GatewayError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
