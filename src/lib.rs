//! Parking-slot occupancy service.
//!
//! This crate tracks the occupancy of physical parking slots. A sensor
//! reporter samples hardware inputs on a fixed cadence and pushes the current
//! status of every slot to the HTTP service, which persists slot state in
//! SQLite and serves it to API clients and the web view.
//!
//! # Components
//!
//! - [`storage`]: durable slot store, the authority on name uniqueness
//! - [`service`]: validation and orchestration over the store
//! - [`http`]: axum transport exposing the slot API
//! - [`reporter`]: the sensor-side push loop

// Core modules
pub mod error;
pub mod http;
pub mod model;
pub mod reporter;
pub mod service;
pub mod storage;

// Re-export main types for convenience
pub use error::{ParkwatchError, Result};
pub use model::{Slot, SlotStatus};
pub use service::SlotService;
