//! 统一错误处理
//!
//! [`AppError`] 覆盖请求校验失败和调度失败，转换为 HTTP 响应：
//!
//! | 变体 | 状态码 |
//! |------|--------|
//! | Validation | 400 |
//! | DeviceNotReady | 503 |
//! | WriteFailed | 500 |
//! | Timeout | 504 |
//!
//! 响应体：
//!
//! ```json
//! { "error": "Printer is not ready. ..." }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lpt_printer::{DispatchResult, PortId};
use serde::Serialize;
use tracing::warn;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    /// 请求校验失败 (400)
    Validation(String),

    #[error("Printer is not ready. Please check if the printer is turned on and connected.")]
    /// 打印机未就绪 (503)
    DeviceNotReady(PortId),

    #[error("Transmission failed: Please check LPT Port settings")]
    /// 写入失败 (500)
    WriteFailed(PortId),

    #[error("Printer did not respond in time")]
    /// 写入超时 (504)
    Timeout(PortId),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Convert a failed dispatch into an error; `None` for `Ok`
    pub fn from_dispatch(port: PortId, result: DispatchResult) -> Option<Self> {
        match result {
            DispatchResult::Ok => None,
            DispatchResult::DeviceNotReady => Some(Self::DeviceNotReady(port)),
            DispatchResult::WriteFailed => Some(Self::WriteFailed(port)),
            DispatchResult::Timeout => Some(Self::Timeout(port)),
        }
    }

    pub fn status(&self) -> StatusCode {
        let code = match self {
            AppError::Validation(_) => 400,
            AppError::DeviceNotReady(_) => DispatchResult::DeviceNotReady.http_status(),
            AppError::WriteFailed(_) => DispatchResult::WriteFailed.http_status(),
            AppError::Timeout(_) => DispatchResult::Timeout.http_status(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::DeviceNotReady(port)
            | AppError::WriteFailed(port)
            | AppError::Timeout(port) => {
                warn!(port = %port, status = status.as_u16(), "Print request failed");
                self.to_string()
            }
            AppError::Validation(_) => self.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
