//! Client for the WhatsApp messaging gateway.
//!
//! The gateway exposes a single endpoint per account:
//! `POST {api_url}/whatsapp/accounts/{account_id}/messages`, authenticated
//! with `x-api-key` and `x-account-id` headers.

pub mod client;
pub mod types;

pub use client::{GatewayError, WhatsAppClient};
pub use types::{GatewayConfig, MessageContent, MessageType, OutboundMessage};
