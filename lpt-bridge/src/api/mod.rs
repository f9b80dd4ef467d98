//! API 路由模块
//!
//! - [`command`] - 打印指令
//! - [`printer_status`] - 打印机状态探测
//! - [`settings`] - 默认端口设置
//! - [`health`] - 健康检查、代理心跳

pub mod command;
pub mod health;
pub mod printer_status;
pub mod settings;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(command::router())
        .merge(printer_status::router())
        .merge(settings::router())
        .merge(health::router())
}

/// Build the fully configured application
pub fn build_app(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    build_router().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}
