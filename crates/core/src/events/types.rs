use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::broadcast::types::DeliveryStatus;

/// Events published while a broadcast batch runs. Consumed by the SSE
/// stream and by the snapshot monitor that serves batch polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BroadcastEvent {
    Started {
        batch_id: Uuid,
        total: usize,
    },
    Delivery {
        batch_id: Uuid,
        status: DeliveryStatus,
    },
    Completed {
        batch_id: Uuid,
        successful: usize,
        failed: usize,
        cancelled: bool,
    },
}
