//! Settings API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /settings | GET | 读取默认端口 |
//! | /settings | POST | 更新默认端口 (仅内存) |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/settings", get(handler::get).post(handler::update))
}
