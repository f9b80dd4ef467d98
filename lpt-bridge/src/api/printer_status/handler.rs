//! Printer Status API Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::validate_port;

#[derive(Debug, Default, Deserialize)]
pub struct StatusRequest {
    pub port: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// success | error
    pub status: &'static str,
    pub message: &'static str,
}

/// POST /printer-status
pub async fn printer_status(
    State(state): State<ServerState>,
    Json(req): Json<StatusRequest>,
) -> AppResult<(StatusCode, Json<StatusResponse>)> {
    let port = validate_port(req.port.as_deref())?
        .unwrap_or_else(|| state.settings.current().default_port);

    if state.dispatcher.probe(port).await.is_ready() {
        Ok((
            StatusCode::OK,
            Json(StatusResponse {
                status: "success",
                message: "Printer is ready",
            }),
        ))
    } else {
        Ok((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(StatusResponse {
                status: "error",
                message: "Printer is not ready. Please check if the printer is turned on and connected.",
            }),
        ))
    }
}
