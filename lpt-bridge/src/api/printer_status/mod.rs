//! Printer Status API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /printer-status | POST | 探测打印机是否就绪 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/printer-status", post(handler::printer_status))
}
