//! Shared test utilities for the support desk.
//!
//! Helpers for setting up stores and desks over an in-memory `SQLite` database
//! and for building records with sensible defaults.

use crate::{
    core::{TicketDesk, promotion::DEFAULT_PROMOTION_THRESHOLD},
    errors::Result,
    models::{Stars, Ticket, Vouch},
    store::{DeskStore, MemoryStore, SqlStore, VouchStore},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database-backed tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A [`SqlStore`] over a fresh in-memory database.
pub async fn setup_sql_store() -> Result<SqlStore> {
    Ok(SqlStore::new(setup_test_db().await?))
}

/// A desk over a fresh in-memory database with the default threshold.
pub async fn setup_sql_desk() -> Result<TicketDesk<SqlStore>> {
    Ok(TicketDesk::new(
        setup_sql_store().await?,
        DEFAULT_PROMOTION_THRESHOLD,
    ))
}

/// A desk over an empty [`MemoryStore`] with the default threshold.
pub fn memory_desk() -> TicketDesk<MemoryStore> {
    TicketDesk::new(MemoryStore::new(), DEFAULT_PROMOTION_THRESHOLD)
}

/// Opens `ticket_id` for `creator_id` and lets `staff_id` claim it.
pub async fn seed_claimed_ticket<S: DeskStore>(
    desk: &TicketDesk<S>,
    ticket_id: u64,
    creator_id: u64,
    staff_id: u64,
) -> Result<Ticket> {
    desk.open(ticket_id, creator_id, "als").await?;
    desk.claim(ticket_id, staff_id).await
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A five-star vouch created `secs_offset` seconds after a fixed base time.
pub fn vouch_at(staff_id: u64, user_id: u64, secs_offset: i64) -> Vouch {
    Vouch {
        staff_id,
        user_id,
        stars: Stars::FIVE,
        description: Some(format!("vouch from {user_id}")),
        created_at: base_time() + Duration::seconds(secs_offset),
    }
}

/// A five-star vouch at the base time without a description.
pub fn sample_vouch(staff_id: u64, user_id: u64) -> Vouch {
    Vouch {
        description: None,
        ..vouch_at(staff_id, user_id, 0)
    }
}

/// Appends `count` vouches by `user_id`, one second apart, oldest first.
pub async fn seed_vouches<S: VouchStore>(store: &S, count: u64, user_id: u64) -> Result<()> {
    for n in 0..count {
        let offset = i64::try_from(n).unwrap_or(i64::MAX);
        store.append_vouch(vouch_at(n + 1, user_id, offset)).await?;
    }
    Ok(())
}
