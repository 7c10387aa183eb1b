//! HTTP transport for the slot API.
//!
//! A thin axum adapter over [`SlotService`]: handlers parse query parameters,
//! call the one shared service, and map the error taxonomy to status codes.
//! The endpoints keep the historical GET-with-query-parameters contract the
//! deployed sensor units speak.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::{ParkwatchError, Result};
use crate::model::Slot;
use crate::service::SlotService;

/// Application state shared across all HTTP handlers
#[derive(Clone)]
struct AppState {
    service: SlotService,
}

/// Build the API router over a slot service.
pub fn router(service: SlotService) -> Router {
    Router::new()
        .route("/", get(list_slots))
        .route("/health", get(health_check))
        .route("/insert", get(insert_slot))
        .route("/update", get(update_slot))
        .route("/status", get(slot_status))
        .with_state(AppState { service })
}

/// Bind and serve the API until shutdown is requested.
pub async fn serve(bind: &str, service: SlotService) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install shutdown handler: {e}");
    } else {
        info!("Shutdown requested");
    }
}

#[derive(Debug, Deserialize)]
struct SlotParams {
    slot: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateParams {
    slot: Option<String>,
    status: Option<String>,
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Row shape served to API clients and the web view.
#[derive(Serialize)]
struct SlotView {
    slot: String,
    status: &'static str,
}

impl From<Slot> for SlotView {
    fn from(slot: Slot) -> Self {
        Self {
            slot: slot.name,
            status: slot.status.as_token(),
        }
    }
}

async fn insert_slot(
    State(state): State<AppState>,
    Query(params): Query<SlotParams>,
) -> std::result::Result<Response, ParkwatchError> {
    let name = params
        .slot
        .ok_or_else(|| ParkwatchError::invalid_input("slot query parameter is required"))?;

    let slot = state.service.register_slot(&name).await?;
    let body = MessageBody {
        message: format!("Slot {} inserted with status \"off\"", slot.name),
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

async fn update_slot(
    State(state): State<AppState>,
    Query(params): Query<UpdateParams>,
) -> std::result::Result<Response, ParkwatchError> {
    let (name, token) = match (params.slot, params.status) {
        (Some(name), Some(token)) => (name, token),
        _ => {
            return Err(ParkwatchError::invalid_input(
                "slot and status query parameters are required",
            ))
        }
    };

    let slot = state.service.report_status(&name, &token).await?;
    let body = MessageBody {
        message: format!(
            "Slot {} status updated to {}",
            slot.name,
            slot.status.as_token()
        ),
    };
    Ok((StatusCode::OK, Json(body)).into_response())
}

async fn slot_status(
    State(state): State<AppState>,
    Query(params): Query<SlotParams>,
) -> std::result::Result<Response, ParkwatchError> {
    let name = params
        .slot
        .ok_or_else(|| ParkwatchError::invalid_input("slot query parameter is required"))?;

    let slot = state.service.query_status(&name).await?;
    Ok((StatusCode::OK, Json(SlotView::from(slot))).into_response())
}

/// Full slot list, as rendered by the (out-of-tree) web view.
async fn list_slots(
    State(state): State<AppState>,
) -> std::result::Result<Response, ParkwatchError> {
    let slots: Vec<SlotView> = state
        .service
        .list_all()
        .await?
        .into_iter()
        .map(SlotView::from)
        .collect();
    Ok((StatusCode::OK, Json(slots)).into_response())
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

impl IntoResponse for ParkwatchError {
    fn into_response(self) -> Response {
        let status = match &self {
            ParkwatchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ParkwatchError::NotFound(_) => StatusCode::NOT_FOUND,
            ParkwatchError::Duplicate(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Taxonomy errors carry caller-safe messages; everything else is
        // logged server-side and sanitized on the wire.
        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Internal error serving request: {self}");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}
