//! Handlers 模块

pub mod commands;
pub mod devices;
pub mod heartbeat;
pub mod metrics;

pub use commands::*;
pub use devices::*;
pub use heartbeat::*;
pub use metrics::*;

use axum::{Json, response::IntoResponse};

/// 健康检查
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
