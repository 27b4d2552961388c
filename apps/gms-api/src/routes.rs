//! 路由定义
//!
//! 集中管理所有 API 路由，将路径映射到对应的 handlers。
//! 路由包括：
//! - 健康检查：/health
//! - 心跳接入：/hb, /hb/bulk
//! - 设备状态：/devices, /devices/{id}/status
//! - 批量命令：/commands/operation, /commands/aisle-mode, /commands/resume
//! - 指标快照：/metrics

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/hb", get(read_heartbeats).post(ingest_heartbeat))
        .route("/hb/bulk", post(ingest_heartbeat_batch))
        .route("/devices", get(list_devices))
        .route("/devices/:device_id/status", get(get_device_status))
        .route("/commands/operation", post(dispatch_operation))
        .route("/commands/aisle-mode", post(dispatch_aisle_mode))
        .route("/commands/resume", post(resume_last_mode))
        .route("/metrics", get(get_metrics))
}
