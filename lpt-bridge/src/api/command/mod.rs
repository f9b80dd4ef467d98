//! Command API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /command | POST | 发送一条打印指令 |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub use handler::{CommandRequest, CommandResponse};

pub fn router() -> Router<ServerState> {
    Router::new().route("/command", post(handler::command))
}
