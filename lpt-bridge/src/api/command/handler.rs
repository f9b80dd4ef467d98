//! Command API Handlers

use axum::Json;
use axum::extract::State;
use lpt_printer::{PortId, PrintInstruction, Terminator};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::validation::{validate_feed_count, validate_port, validate_print_text};
use crate::utils::{AppError, AppResult};

/// POST /command request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandRequest {
    /// printLine | newline | cut
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<String>,
    pub count: Option<i64>,
    /// LPT1 | LPT2, falls back to the configured default
    pub port: Option<String>,
    /// Terminate printed text with CR LF instead of LF
    #[serde(default)]
    pub crlf: bool,
}

impl CommandRequest {
    /// Validate the request into an optional port and an instruction
    pub fn validate(&self) -> AppResult<(Option<PortId>, PrintInstruction)> {
        let instruction = match self.kind.as_deref() {
            Some("printLine") => {
                let text = validate_print_text(self.text.as_deref())?;
                PrintInstruction::Text {
                    content: text.to_string(),
                    terminator: if self.crlf {
                        Terminator::CrLf
                    } else {
                        Terminator::Lf
                    },
                }
            }
            Some("newline") => PrintInstruction::feed(validate_feed_count(self.count)?),
            Some("cut") => PrintInstruction::Cut,
            _ => return Err(AppError::validation("Invalid command type")),
        };

        let port = validate_port(self.port.as_deref())?;
        Ok((port, instruction))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub message: String,
}

/// POST /command
///
/// Probes the printer, then sends one instruction to it.
pub async fn command(
    State(state): State<ServerState>,
    Json(req): Json<CommandRequest>,
) -> AppResult<Json<CommandResponse>> {
    let (port_hint, instruction) = req.validate()?;

    let default_port = state.settings.current().default_port;
    let port = port_hint.unwrap_or(default_port);

    let result = state
        .dispatcher
        .handle_print_request(default_port, port_hint, &instruction)
        .await;

    if let Some(err) = AppError::from_dispatch(port, result) {
        return Err(err);
    }

    Ok(Json(CommandResponse {
        message: format!("Sent to {}, command type: {}", port, instruction.kind()),
    }))
}
