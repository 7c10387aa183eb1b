//! Durable slot persistence.
//!
//! The store is the single authority on slot-name uniqueness and existence:
//! the UNIQUE constraint lives in the database, so concurrent registrations
//! of the same name cannot both succeed no matter which caller drives the
//! operation.

mod slot_store;

pub use slot_store::{SlotStore, SqliteSlotStore};
