use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One visitor contact-form submission. Immutable except for `read`,
/// which only ever moves false → true.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: Uuid,
    pub form_data: HashMap<String, String>,
    pub submitted_at: DateTime<Utc>,
    pub read: bool,
}
