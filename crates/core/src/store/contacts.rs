use std::collections::HashSet;

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::contacts::model::{Contact, NewContact};

use super::StoreError;

/// All contacts, newest first.
pub async fn list(pool: &PgPool) -> Result<Vec<Contact>, StoreError> {
    let rows = sqlx::query(
        "SELECT id, first_name, last_name, phone, created_at
         FROM contacts
         ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(from_row).collect())
}

/// Contacts matching the given ids. The result comes back in `ids` order so
/// a broadcast dispatches in the order the operator selected.
pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Contact>, StoreError> {
    let rows = sqlx::query(
        "SELECT id, first_name, last_name, phone, created_at
         FROM contacts
         WHERE id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    let mut found: Vec<Contact> = rows.into_iter().map(from_row).collect();
    found.sort_by_key(|contact| ids.iter().position(|id| *id == contact.id));
    Ok(found)
}

/// Every normalized phone currently in the store, for import dedup.
pub async fn known_phones(pool: &PgPool) -> Result<HashSet<String>, StoreError> {
    let rows = sqlx::query("SELECT phone FROM contacts")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|row| row.get("phone")).collect())
}

/// Insert one contact. Inserts are always independent; an import that fails
/// partway leaves the earlier contacts persisted.
pub async fn insert(pool: &PgPool, new: NewContact) -> Result<Contact, StoreError> {
    let contact = Contact {
        id: Uuid::new_v4(),
        first_name: new.first_name,
        last_name: new.last_name,
        phone: new.phone,
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO contacts (id, first_name, last_name, phone, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(contact.id)
    .bind(&contact.first_name)
    .bind(&contact.last_name)
    .bind(&contact.phone)
    .bind(contact.created_at)
    .execute(pool)
    .await?;

    Ok(contact)
}

fn from_row(row: PgRow) -> Contact {
    Contact {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        phone: row.get("phone"),
        created_at: row.get("created_at"),
    }
}
