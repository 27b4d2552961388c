//! 心跳接入 handlers
//!
//! 网络侧的心跳接收面：
//! - POST /hb - 单条上报（缺 id 返回 400）
//! - POST /hb/bulk - 批量上报（缺 id 的条目静默跳过，不中断整批）
//! - GET /hb - 全量读取（拉取式客户端用）
//!
//! 每个请求独立处理；请求体读完才进 handler，存储锁不跨网络 I/O。

use crate::AppState;
use crate::utils::response::{bad_request, device_to_dto, storage_error};
use api_contract::{AckResponse, BulkIngestResponse, DeviceListResponse, HeartbeatRequest};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gms_storage::HeartbeatReport;
use gms_telemetry::{record_heartbeat_received, record_heartbeat_skipped};
use tracing::debug;

fn normalized_id(req: &HeartbeatRequest) -> Option<String> {
    req.id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn report_from(device_id: String, req: HeartbeatRequest) -> HeartbeatReport {
    HeartbeatReport {
        device_id,
        ip: req.ip,
        declared_status: req.status,
        ts_ms: req.ts,
        gate_id: req.gate_id,
        side: req.side,
        device_type: req.device_type,
        name: req.name,
        message: req.message,
    }
}

/// 单条心跳上报
pub async fn ingest_heartbeat(
    State(state): State<AppState>,
    Json(req): Json<HeartbeatRequest>,
) -> Response {
    let Some(device_id) = normalized_id(&req) else {
        return bad_request("id required");
    };
    record_heartbeat_received();
    match state.store.upsert(report_from(device_id, req)).await {
        Ok(record) => {
            debug!(
                target: "gms.ingest",
                device_id = %record.device_id,
                status = %record.declared_status,
                "heartbeat_applied"
            );
            (StatusCode::OK, Json(AckResponse::ok())).into_response()
        }
        Err(err) => storage_error(err),
    }
}

/// 批量心跳上报
pub async fn ingest_heartbeat_batch(
    State(state): State<AppState>,
    Json(reports): Json<Vec<HeartbeatRequest>>,
) -> Response {
    let mut applied = 0usize;
    for req in reports {
        let Some(device_id) = normalized_id(&req) else {
            record_heartbeat_skipped();
            continue;
        };
        record_heartbeat_received();
        if let Err(err) = state.store.upsert(report_from(device_id, req)).await {
            return storage_error(err);
        }
        applied += 1;
    }
    debug!(target: "gms.ingest", applied, "heartbeat_batch_applied");
    (StatusCode::OK, Json(BulkIngestResponse::applied(applied))).into_response()
}

/// 全量读取当前设备集合
pub async fn read_heartbeats(State(state): State<AppState>) -> Response {
    match state.store.read_all().await {
        Ok(records) => {
            let devices = records.into_iter().map(device_to_dto).collect();
            (StatusCode::OK, Json(DeviceListResponse::of(devices))).into_response()
        }
        Err(err) => storage_error(err),
    }
}
