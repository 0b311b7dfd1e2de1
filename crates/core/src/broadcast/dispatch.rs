use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use landing_hub_whatsapp::{GatewayError, MessageContent, MessageType, OutboundMessage, WhatsAppClient};
use tokio::time::sleep;

use crate::contacts::model::Contact;
use crate::events::bus::EventBus;
use crate::events::types::BroadcastEvent;

use super::template::render_template;
use super::types::{
    BatchOutcome, BatchRequest, DeliveryOutcome, DeliveryState, DeliveryStatus, MessageLogEntry,
    ResolvedMedia,
};

/// Delivers one message to the gateway. Production uses [`WhatsAppClient`];
/// tests substitute a scripted fake.
pub trait MessageSender: Send + Sync {
    fn send(
        &self,
        message: &OutboundMessage,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

impl MessageSender for WhatsAppClient {
    fn send(
        &self,
        message: &OutboundMessage,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send {
        WhatsAppClient::send(self, message)
    }
}

/// Records one log row per send attempt. A failed append must never stop
/// the batch, so the engine only warns on errors from here.
pub trait DeliveryLog: Send + Sync {
    fn append(
        &self,
        entry: &MessageLogEntry,
    ) -> impl Future<Output = Result<(), anyhow::Error>> + Send;
}

/// Batch-level preconditions, checked before any send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BatchValidationError {
    #[error("select at least one contact")]
    NoRecipients,
    #[error("the message is empty; confirm sending it anyway")]
    EmptyMessage,
}

/// Validate a batch before dispatch. An empty message (no text, no media)
/// needs an explicit operator confirmation; per-recipient bodies are never
/// re-checked, so a recipient whose rendered body comes out empty is still
/// sent.
pub fn validate_batch(
    contacts: &[Contact],
    text: &str,
    media: Option<&ResolvedMedia>,
    allow_empty: bool,
) -> Result<(), BatchValidationError> {
    if contacts.is_empty() {
        return Err(BatchValidationError::NoRecipients);
    }
    if media.is_none() && text.trim().is_empty() && !allow_empty {
        return Err(BatchValidationError::EmptyMessage);
    }
    Ok(())
}

/// Run one broadcast batch: strictly sequential sends, one log row per
/// attempt, a fixed pause between recipients (not after the last), and a
/// single completion event once everyone has been processed. Individual
/// failures never stop the batch; flipping `cancel` stops it before the
/// next send and leaves the remaining recipients pending.
pub async fn run_batch<S, L>(
    request: BatchRequest,
    sender: &S,
    log: &L,
    bus: &EventBus,
    cancel: &AtomicBool,
) -> BatchOutcome
where
    S: MessageSender,
    L: DeliveryLog,
{
    let total = request.contacts.len();
    let delay_seconds = request.delay.as_secs();
    let media_type = request.media.as_ref().map(ResolvedMedia::message_type);

    bus.publish(BroadcastEvent::Started {
        batch_id: request.batch_id,
        total,
    });

    let mut successful = 0;
    let mut failed = 0;
    let mut cancelled = false;

    for (index, contact) in request.contacts.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            cancelled = true;
            tracing::info!(
                batch = %request.batch_id,
                remaining = total - index,
                "batch cancelled, skipping remaining recipients"
            );
            break;
        }

        let body = render_template(&request.text, contact);
        let to_number = contact.display_phone();

        bus.publish(BroadcastEvent::Delivery {
            batch_id: request.batch_id,
            status: status_for(contact, DeliveryState::Sending, None),
        });

        let mut content = MessageContent::default();
        if !body.is_empty() {
            content.text = Some(body);
        }
        if let Some(media) = &request.media {
            content.media_url = Some(media.url.clone());
            content.mime_type = media.mime_type.clone();
            content.file_name = media.file_name.clone();
        }

        let message = OutboundMessage {
            to_number: to_number.clone(),
            message_type: media_type.unwrap_or(MessageType::Text),
            content,
        };

        let (outcome, detail) = match sender.send(&message).await {
            Ok(()) => {
                successful += 1;
                (DeliveryOutcome::Successful, "Enviado correctamente".to_string())
            }
            Err(GatewayError::Rejected { message, .. }) => {
                failed += 1;
                (DeliveryOutcome::Error, message)
            }
            Err(GatewayError::Connection(error)) => {
                failed += 1;
                tracing::warn!(batch = %request.batch_id, to = %to_number, %error, "send failed");
                (DeliveryOutcome::Error, "Error de conexión".to_string())
            }
        };

        let state = match outcome {
            DeliveryOutcome::Successful => DeliveryState::Successful,
            DeliveryOutcome::Error => DeliveryState::Error,
        };
        bus.publish(BroadcastEvent::Delivery {
            batch_id: request.batch_id,
            status: status_for(contact, state, Some(detail.clone())),
        });

        let entry = MessageLogEntry {
            batch_id: request.batch_id,
            to_number,
            phone: contact.phone.clone(),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            message_type: message.message_type,
            content: message.content,
            outcome,
            error_message: (outcome == DeliveryOutcome::Error).then_some(detail),
            delay_seconds,
        };
        if let Err(error) = log.append(&entry).await {
            tracing::warn!(batch = %request.batch_id, %error, "could not record message log entry");
        }

        if index + 1 < total {
            sleep(request.delay).await;
        }
    }

    let outcome = BatchOutcome {
        batch_id: request.batch_id,
        total,
        successful,
        failed,
        cancelled,
    };
    bus.publish(BroadcastEvent::Completed {
        batch_id: request.batch_id,
        successful,
        failed,
        cancelled,
    });
    outcome
}

fn status_for(contact: &Contact, state: DeliveryState, detail: Option<String>) -> DeliveryStatus {
    DeliveryStatus {
        contact_id: contact.id,
        phone: contact.phone.clone(),
        name: contact.full_name(),
        state,
        detail,
    }
}
