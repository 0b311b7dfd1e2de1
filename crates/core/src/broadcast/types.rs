use std::time::Duration;

use landing_hub_whatsapp::{MessageContent, MessageType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contacts::model::Contact;

use super::media::{file_name_from_url, mime_from_url, message_type_from_mime};

/// Operator-adjustable inter-send delay bounds, in seconds.
pub const MIN_DELAY_SECONDS: u64 = 1;
pub const MAX_DELAY_SECONDS: u64 = 10;

pub fn clamp_delay(seconds: u64) -> Duration {
    Duration::from_secs(seconds.clamp(MIN_DELAY_SECONDS, MAX_DELAY_SECONDS))
}

/// Per-recipient delivery lifecycle. `Successful` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    Pending,
    Sending,
    Successful,
    Error,
}

impl DeliveryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryState::Successful | DeliveryState::Error)
    }
}

/// The status line the operator sees for one recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatus {
    pub contact_id: Uuid,
    pub phone: String,
    pub name: String,
    pub state: DeliveryState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Terminal outcome recorded in the message log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryOutcome {
    Successful,
    Error,
}

impl DeliveryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryOutcome::Successful => "successful",
            DeliveryOutcome::Error => "error",
        }
    }
}

/// One append-only log row per send attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageLogEntry {
    pub batch_id: Uuid,
    /// Recipient with the leading `+`.
    pub to_number: String,
    /// Recipient as stored, bare digits.
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub message_type: MessageType,
    pub content: MessageContent,
    pub outcome: DeliveryOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub delay_seconds: u64,
}

/// Media resolved once for a whole batch and reused for every recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMedia {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl ResolvedMedia {
    /// Build from a pasted remote URL: MIME and filename are inferred from
    /// the URL's path, and the URL is used as-is without re-uploading.
    pub fn from_url(url: &str) -> Self {
        let url = url.trim();
        Self {
            url: url.to_string(),
            mime_type: mime_from_url(url).map(str::to_string),
            file_name: file_name_from_url(url),
        }
    }

    pub fn message_type(&self) -> MessageType {
        message_type_from_mime(self.mime_type.as_deref())
    }
}

/// Inputs for one dispatch batch, validated before any send.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub batch_id: Uuid,
    pub text: String,
    pub media: Option<ResolvedMedia>,
    pub delay: Duration,
    pub contacts: Vec<Contact>,
}

/// Summary produced once every recipient has been processed (or the batch
/// was cancelled).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub batch_id: Uuid,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_is_clamped_to_operator_bounds() {
        assert_eq!(clamp_delay(0), Duration::from_secs(1));
        assert_eq!(clamp_delay(3), Duration::from_secs(3));
        assert_eq!(clamp_delay(60), Duration::from_secs(10));
    }

    #[test]
    fn resolved_media_infers_from_url() {
        let media = ResolvedMedia::from_url("https://cdn.example.com/files/Catalogo%202025.pdf?x=1");
        assert_eq!(media.mime_type.as_deref(), Some("application/pdf"));
        assert_eq!(media.file_name.as_deref(), Some("Catalogo 2025.pdf"));
        assert_eq!(media.message_type(), MessageType::Document);
    }
}
