//! Slot operations: validation and orchestration over the store.
//!
//! Input checks live here and never reach the store; uniqueness and existence
//! are enforced by the store itself. Every caller (HTTP handler, reporter,
//! test) goes through this one service, so there is a single copy of the
//! rules.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ParkwatchError, Result};
use crate::model::{Slot, SlotStatus};
use crate::storage::SlotStore;

/// Validation and orchestration layer between transport handlers and the
/// slot store.
#[derive(Clone)]
pub struct SlotService {
    store: Arc<dyn SlotStore>,
}

impl SlotService {
    pub fn new(store: Arc<dyn SlotStore>) -> Self {
        Self { store }
    }

    /// Register a new slot with initial status `off`.
    pub async fn register_slot(&self, name: &str) -> Result<Slot> {
        let name = require_name(name)?;
        let slot = self.store.create(name).await?;
        info!("Registered slot {:?} with status \"off\"", slot.name);
        Ok(slot)
    }

    /// Record the status a sensor reported for `name`.
    ///
    /// `token` is matched case-insensitively against `"on"`/`"off"`; anything
    /// else is rejected before the store is touched. Re-reporting the current
    /// status is a successful no-op, so reporters can push truth every cycle.
    pub async fn report_status(&self, name: &str, token: &str) -> Result<Slot> {
        let name = require_name(name)?;
        let status = SlotStatus::parse_token(token)?;
        let slot = self.store.set_status(name, status).await?;
        debug!("Slot {:?} status set to {}", slot.name, slot.status);
        Ok(slot)
    }

    /// Look up a single slot; [`ParkwatchError::NotFound`] if it was never
    /// registered. Lookups never create slots.
    pub async fn query_status(&self, name: &str) -> Result<Slot> {
        let name = require_name(name)?;
        self.store
            .get(name)
            .await?
            .ok_or_else(|| ParkwatchError::not_found(format!("slot {name:?} not found")))
    }

    /// All slots in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Slot>> {
        self.store.list().await
    }
}

fn require_name(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        return Err(ParkwatchError::invalid_input("slot name must not be empty"));
    }
    Ok(name)
}
