use std::future::Future;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::broadcast::dispatch::DeliveryLog;
use crate::broadcast::types::MessageLogEntry;

use super::StoreError;

/// Append one row to the outbound message log.
pub async fn append(pool: &PgPool, entry: &MessageLogEntry) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO whatsapp_messages
           (id, batch_id, to_number, phone, first_name, last_name,
            message_type, content, outcome, error_message, delay_seconds, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(Uuid::new_v4())
    .bind(entry.batch_id)
    .bind(&entry.to_number)
    .bind(&entry.phone)
    .bind(&entry.first_name)
    .bind(&entry.last_name)
    .bind(entry.message_type.as_str())
    .bind(serde_json::to_value(&entry.content)?)
    .bind(entry.outcome.as_str())
    .bind(&entry.error_message)
    .bind(entry.delay_seconds as i32)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Sends grouped by calendar day over a trailing window, plus the average
/// the admin dashboard charts.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub days: u32,
    pub total: i64,
    pub average_per_day: f64,
    pub per_day: Vec<DayCount>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Count log rows per day over the last `days` calendar days, today
/// included: the window opens at UTC midnight `days - 1` days back, not at
/// a rolling offset from now. Days with no sends do not appear in
/// `per_day` but still divide the average.
pub async fn daily_stats(pool: &PgPool, days: u32) -> Result<DailyStats, StoreError> {
    let window_start = Utc::now().date_naive() - Duration::days(days.max(1) as i64 - 1);
    let since = window_start.and_time(NaiveTime::MIN).and_utc();

    let rows = sqlx::query(
        "SELECT created_at::date AS day, COUNT(*) AS sends
         FROM whatsapp_messages
         WHERE created_at >= $1
         GROUP BY day
         ORDER BY day",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    let per_day: Vec<DayCount> = rows
        .into_iter()
        .map(|row| DayCount {
            day: row.get("day"),
            count: row.get("sends"),
        })
        .collect();
    let total: i64 = per_day.iter().map(|d| d.count).sum();

    Ok(DailyStats {
        days,
        total,
        average_per_day: total as f64 / days.max(1) as f64,
        per_day,
    })
}

/// [`DeliveryLog`] backed by the `whatsapp_messages` table. The dispatch
/// engine warns and keeps going when an append fails.
#[derive(Debug, Clone)]
pub struct PgDeliveryLog {
    pool: PgPool,
}

impl PgDeliveryLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DeliveryLog for PgDeliveryLog {
    fn append(
        &self,
        entry: &MessageLogEntry,
    ) -> impl Future<Output = Result<(), anyhow::Error>> + Send {
        let pool = self.pool.clone();
        let entry = entry.clone();
        async move { append(&pool, &entry).await.map_err(anyhow::Error::from) }
    }
}
