//! Common test utilities

use std::sync::Arc;

use parkwatch::service::SlotService;
use parkwatch::storage::SqliteSlotStore;
use sqlx::sqlite::SqlitePoolOptions;

/// Service over a fresh in-memory database.
///
/// The pool is limited to one connection so every handle sees the same
/// in-memory database.
#[allow(dead_code)]
pub async fn memory_service() -> SlotService {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = SqliteSlotStore::from_pool(pool).await.unwrap();
    SlotService::new(Arc::new(store))
}

/// Service over an on-disk database, for durability and concurrency tests.
#[allow(dead_code)]
pub async fn file_service(path: &std::path::Path) -> SlotService {
    let store = SqliteSlotStore::connect(path.to_str().unwrap())
        .await
        .unwrap();
    SlotService::new(Arc::new(store))
}
