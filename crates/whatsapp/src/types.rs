use serde::{Deserialize, Serialize};

/// Message kinds the gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Video,
    Audio,
    Document,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::Video => "video",
            MessageType::Audio => "audio",
            MessageType::Document => "document",
        }
    }
}

/// Payload of a single message. Absent fields are omitted from the wire
/// body — the gateway rejects explicit nulls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// One outbound message addressed to a single recipient.
/// `to_number` carries the leading `+`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub to_number: String,
    pub message_type: MessageType,
    pub content: MessageContent,
}

/// Gateway connection settings, usually read from the environment.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_url: String,
    pub api_key: String,
    pub account_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_body_uses_camel_case_and_omits_absent_fields() {
        let message = OutboundMessage {
            to_number: "+59170012345".to_string(),
            message_type: MessageType::Image,
            content: MessageContent {
                text: Some("hola".to_string()),
                media_url: Some("https://example.com/a.png".to_string()),
                mime_type: Some("image/png".to_string()),
                file_name: None,
            },
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["toNumber"], "+59170012345");
        assert_eq!(value["messageType"], "image");
        assert_eq!(value["content"]["mediaUrl"], "https://example.com/a.png");
        assert!(value["content"].get("fileName").is_none());
    }
}
