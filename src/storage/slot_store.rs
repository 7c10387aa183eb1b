//! SQLite-backed slot store.
//!
//! One table, keyed by slot name, with the uniqueness constraint enforced at
//! the storage layer. Connections come from a pool and are scoped to a single
//! operation; every statement here is a single atomic SQLite statement, so a
//! concurrent reader never observes a half-applied write.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::error::{ParkwatchError, Result};
use crate::model::{Slot, SlotStatus};

/// Storage seam for slot records.
///
/// The service is written against this trait so its validation logic can be
/// exercised against any backing store.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Insert a new record with status `off`. Fails with
    /// [`ParkwatchError::Duplicate`] if the name is already registered.
    async fn create(&self, name: &str) -> Result<Slot>;

    /// Update the status of an existing record. Fails with
    /// [`ParkwatchError::NotFound`] if no such record exists; never inserts.
    async fn set_status(&self, name: &str, status: SlotStatus) -> Result<Slot>;

    /// Point lookup; absence is `None`, not an error.
    async fn get(&self, name: &str) -> Result<Option<Slot>>;

    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<Slot>>;
}

/// SQLite implementation of [`SlotStore`] over a connection pool.
pub struct SqliteSlotStore {
    pool: SqlitePool,
}

impl SqliteSlotStore {
    /// Open the database (creating the file if needed) and ensure the schema
    /// exists.
    ///
    /// Accepts either a plain filename (`parking.db`) or a sqlx URL
    /// (`sqlite::memory:`, `sqlite://path/to.db`).
    pub async fn connect(database: &str) -> Result<Self> {
        info!("Opening slot database at {database}");

        let options = if database.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(database)
                .map_err(|e| ParkwatchError::config(format!("Invalid database URL: {e}")))?
        } else {
            SqliteConnectOptions::new().filename(database)
        };
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| ParkwatchError::database(format!("Failed to open database: {e}")))?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool. Tests use this with an in-memory database.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self { pool };
        store.initialize_schema().await?;
        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<()> {
        debug!("Ensuring parking_slots schema");

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS parking_slots (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 slot TEXT NOT NULL UNIQUE,
                 status TEXT NOT NULL
             )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            ParkwatchError::database(format!("Failed to create parking_slots table: {e}"))
        })?;

        Ok(())
    }
}

#[async_trait]
impl SlotStore for SqliteSlotStore {
    async fn create(&self, name: &str) -> Result<Slot> {
        let status = SlotStatus::Free;

        let row = sqlx::query(
            "INSERT INTO parking_slots (slot, status) VALUES (?1, ?2)
             RETURNING id, slot, status",
        )
        .bind(name)
        .bind(status.as_token())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ParkwatchError::duplicate(format!("slot {name:?} already exists"))
            } else {
                ParkwatchError::database(format!("Failed to insert slot: {e}"))
            }
        })?;

        slot_from_row(&row)
    }

    async fn set_status(&self, name: &str, status: SlotStatus) -> Result<Slot> {
        // Single statement: the update and the returned record are atomic.
        let row = sqlx::query(
            "UPDATE parking_slots SET status = ?1 WHERE slot = ?2
             RETURNING id, slot, status",
        )
        .bind(status.as_token())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ParkwatchError::database(format!("Failed to update slot: {e}")))?;

        match row {
            Some(row) => slot_from_row(&row),
            None => Err(ParkwatchError::not_found(format!(
                "slot {name:?} does not exist"
            ))),
        }
    }

    async fn get(&self, name: &str) -> Result<Option<Slot>> {
        let row = sqlx::query("SELECT id, slot, status FROM parking_slots WHERE slot = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ParkwatchError::database(format!("Failed to query slot: {e}")))?;

        row.as_ref().map(slot_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Slot>> {
        let rows = sqlx::query("SELECT id, slot, status FROM parking_slots ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ParkwatchError::database(format!("Failed to list slots: {e}")))?;

        rows.iter().map(slot_from_row).collect()
    }
}

fn slot_from_row(row: &SqliteRow) -> Result<Slot> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| ParkwatchError::database(format!("Failed to read id column: {e}")))?;
    let name: String = row
        .try_get("slot")
        .map_err(|e| ParkwatchError::database(format!("Failed to read slot column: {e}")))?;
    let token: String = row
        .try_get("status")
        .map_err(|e| ParkwatchError::database(format!("Failed to read status column: {e}")))?;

    // The column only ever holds canonical tokens; anything else is corruption.
    let status = SlotStatus::parse_token(&token).map_err(|_| {
        ParkwatchError::database(format!("Corrupt status {token:?} for slot {name:?}"))
    })?;

    Ok(Slot { id, name, status })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteSlotStore {
        // A pool limited to one connection, so every handle sees the same
        // in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteSlotStore::from_pool(pool).await.unwrap()
    }

    #[tokio::test]
    async fn create_initializes_free() {
        let store = memory_store().await;

        let slot = store.create("slot1").await.unwrap();
        assert_eq!(slot.name, "slot1");
        assert_eq!(slot.status, SlotStatus::Free);

        let fetched = store.get("slot1").await.unwrap().unwrap();
        assert_eq!(fetched, slot);
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected_and_keeps_original() {
        let store = memory_store().await;

        store.create("slot1").await.unwrap();
        store
            .set_status("slot1", SlotStatus::Occupied)
            .await
            .unwrap();

        let err = store.create("slot1").await.unwrap_err();
        assert!(matches!(err, ParkwatchError::Duplicate(_)));

        // Still exactly one record, with the status it had before the retry.
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, SlotStatus::Occupied);
    }

    #[tokio::test]
    async fn set_status_requires_existing_slot() {
        let store = memory_store().await;

        let err = store
            .set_status("ghost", SlotStatus::Occupied)
            .await
            .unwrap_err();
        assert!(matches!(err, ParkwatchError::NotFound(_)));

        // No implicit creation.
        assert!(store.get("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let store = memory_store().await;

        store.create("b").await.unwrap();
        store.create("a").await.unwrap();
        store.create("c").await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn names_are_case_sensitive() {
        let store = memory_store().await;

        store.create("Slot1").await.unwrap();
        store.create("slot1").await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 2);
    }
}
