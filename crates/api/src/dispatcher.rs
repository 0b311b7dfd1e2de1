use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use landing_hub_core::broadcast::types::{DeliveryState, DeliveryStatus};
use landing_hub_core::contacts::model::Contact;
use landing_hub_core::events::types::BroadcastEvent;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use uuid::Uuid;

/// Lifecycle of a whole batch, as opposed to the per-recipient
/// [`DeliveryState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    Running,
    Completed,
    Cancelled,
}

/// Poll-able view of one batch, folded from the event stream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSnapshot {
    pub batch_id: Uuid,
    pub state: BatchState,
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub deliveries: Vec<DeliveryStatus>,
}

struct BatchEntry {
    cancel: Arc<AtomicBool>,
    snapshot: BatchSnapshot,
}

/// Registry of running and finished batches. Dispatch registers a batch
/// before spawning its engine task; the monitor task folds bus events into
/// the snapshots the polling endpoint serves.
#[derive(Clone, Default)]
pub struct BroadcastRegistry {
    inner: Arc<Mutex<HashMap<Uuid, BatchEntry>>>,
}

impl BroadcastRegistry {
    /// Register a batch with every recipient pending, returning the cancel
    /// flag the engine checks between sends.
    pub fn register(&self, batch_id: Uuid, contacts: &[Contact]) -> Arc<AtomicBool> {
        let cancel = Arc::new(AtomicBool::new(false));
        let snapshot = BatchSnapshot {
            batch_id,
            state: BatchState::Running,
            total: contacts.len(),
            successful: 0,
            failed: 0,
            deliveries: contacts
                .iter()
                .map(|contact| DeliveryStatus {
                    contact_id: contact.id,
                    phone: contact.phone.clone(),
                    name: contact.full_name(),
                    state: DeliveryState::Pending,
                    detail: None,
                })
                .collect(),
        };

        self.lock().insert(
            batch_id,
            BatchEntry {
                cancel: cancel.clone(),
                snapshot,
            },
        );
        cancel
    }

    pub fn snapshot(&self, batch_id: Uuid) -> Option<BatchSnapshot> {
        self.lock().get(&batch_id).map(|entry| entry.snapshot.clone())
    }

    /// Flip a batch's cancel flag. Returns false for an unknown batch. The
    /// engine notices before its next send; the in-flight send finishes.
    pub fn cancel(&self, batch_id: Uuid) -> bool {
        match self.lock().get(&batch_id) {
            Some(entry) => {
                entry.cancel.store(true, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Fold one event into its batch's snapshot. Events for unregistered
    /// batches are dropped.
    pub fn apply(&self, event: &BroadcastEvent) {
        let mut entries = self.lock();
        match event {
            BroadcastEvent::Started { batch_id, total } => {
                if let Some(entry) = entries.get_mut(batch_id) {
                    entry.snapshot.total = *total;
                }
            }
            BroadcastEvent::Delivery { batch_id, status } => {
                if let Some(entry) = entries.get_mut(batch_id) {
                    let deliveries = &mut entry.snapshot.deliveries;
                    match deliveries
                        .iter_mut()
                        .find(|d| d.contact_id == status.contact_id)
                    {
                        Some(existing) => *existing = status.clone(),
                        None => deliveries.push(status.clone()),
                    }
                }
            }
            BroadcastEvent::Completed {
                batch_id,
                successful,
                failed,
                cancelled,
            } => {
                if let Some(entry) = entries.get_mut(batch_id) {
                    entry.snapshot.successful = *successful;
                    entry.snapshot.failed = *failed;
                    entry.snapshot.state = if *cancelled {
                        BatchState::Cancelled
                    } else {
                        BatchState::Completed
                    };
                }
            }
        }
    }

    /// Consume the event bus until it closes, keeping snapshots current.
    /// Runs as one spawned task for the life of the process.
    pub async fn run_monitor(self, mut events: Receiver<BroadcastEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.apply(&event),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "broadcast monitor lagged behind the event bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, BatchEntry>> {
        self.inner.lock().expect("broadcast registry lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn contact(first: &str, phone: &str) -> Contact {
        Contact {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: String::new(),
            phone: phone.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn register_starts_with_every_recipient_pending() {
        let registry = BroadcastRegistry::default();
        let batch_id = Uuid::new_v4();
        let contacts = vec![contact("Ana", "59170012345"), contact("Luis", "59170012346")];

        let cancel = registry.register(batch_id, &contacts);
        let snapshot = registry.snapshot(batch_id).unwrap();

        assert!(!cancel.load(Ordering::Relaxed));
        assert_eq!(snapshot.state, BatchState::Running);
        assert_eq!(snapshot.total, 2);
        assert!(snapshot
            .deliveries
            .iter()
            .all(|d| d.state == DeliveryState::Pending));
    }

    #[test]
    fn events_fold_into_the_snapshot() {
        let registry = BroadcastRegistry::default();
        let batch_id = Uuid::new_v4();
        let contacts = vec![contact("Ana", "59170012345")];
        registry.register(batch_id, &contacts);

        registry.apply(&BroadcastEvent::Delivery {
            batch_id,
            status: DeliveryStatus {
                contact_id: contacts[0].id,
                phone: contacts[0].phone.clone(),
                name: contacts[0].full_name(),
                state: DeliveryState::Successful,
                detail: Some("Enviado correctamente".to_string()),
            },
        });
        registry.apply(&BroadcastEvent::Completed {
            batch_id,
            successful: 1,
            failed: 0,
            cancelled: false,
        });

        let snapshot = registry.snapshot(batch_id).unwrap();
        assert_eq!(snapshot.state, BatchState::Completed);
        assert_eq!(snapshot.successful, 1);
        assert_eq!(snapshot.deliveries[0].state, DeliveryState::Successful);
    }

    #[test]
    fn cancelling_an_unknown_batch_reports_false() {
        let registry = BroadcastRegistry::default();
        assert!(!registry.cancel(Uuid::new_v4()));

        let batch_id = Uuid::new_v4();
        let cancel = registry.register(batch_id, &[contact("Ana", "59170012345")]);
        assert!(registry.cancel(batch_id));
        assert!(cancel.load(Ordering::Relaxed));
    }

    #[test]
    fn events_for_unknown_batches_are_ignored() {
        let registry = BroadcastRegistry::default();
        registry.apply(&BroadcastEvent::Completed {
            batch_id: Uuid::new_v4(),
            successful: 3,
            failed: 0,
            cancelled: false,
        });
        // Nothing registered, nothing to assert beyond "no panic".
    }
}
