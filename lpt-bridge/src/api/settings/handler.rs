//! Settings API Handlers
//!
//! Manages the default printer port used when a command names none.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::services::PortSettings;
use crate::utils::validation::validate_port;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub port: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateSettingsResponse {
    pub message: &'static str,
}

/// GET /settings
pub async fn get(State(state): State<ServerState>) -> Json<PortSettings> {
    Json(state.settings.current())
}

/// POST /settings
pub async fn update(
    State(state): State<ServerState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> AppResult<Json<UpdateSettingsResponse>> {
    let port = validate_port(req.port.as_deref())
        .ok()
        .flatten()
        .ok_or_else(|| AppError::validation("Invalid printer port"))?;

    state.settings.update(PortSettings { default_port: port });

    Ok(Json(UpdateSettingsResponse {
        message: "Settings saved successfully",
    }))
}
