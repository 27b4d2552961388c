//! 批量命令 handlers
//!
//! 操作面，把一条命令下发到一组设备：
//! - POST /commands/operation - 归一化 operation 后批量下发
//! - POST /commands/aisle-mode - 范围校验 aisleMode 后批量下发
//! - POST /commands/resume - 恢复各设备上次的放行子模式
//!
//! scope 在这里解析：`deviceIds` 缺省取全量已知设备；
//! 下发器本身 scope 无关，只看拿到的候选集合。

use crate::AppState;
use crate::utils::response::{bad_request, bulk_response, storage_error};
use api_contract::{AisleModeCommandRequest, OperationCommandRequest, ResumeCommandRequest};
use axum::{Json, extract::State, response::Response};
use domain::{AisleMode, Operation};
use gms_control::GateCommand;
use gms_storage::DeviceRecord;
use std::collections::HashSet;
use tracing::info;

async fn resolve_scope(
    state: &AppState,
    device_ids: Option<Vec<String>>,
) -> Result<Vec<DeviceRecord>, Response> {
    let records = state.store.read_all().await.map_err(storage_error)?;
    Ok(match device_ids {
        None => records,
        Some(ids) => {
            let wanted: HashSet<String> = ids.into_iter().collect();
            records
                .into_iter()
                .filter(|record| wanted.contains(&record.device_id))
                .collect()
        }
    })
}

/// 批量下发 operation 命令
pub async fn dispatch_operation(
    State(state): State<AppState>,
    Json(req): Json<OperationCommandRequest>,
) -> Response {
    // 归一失败时原输入原样带回，便于排障
    let operation = match Operation::normalize(&req.operation) {
        Ok(operation) => operation,
        Err(err) => return bad_request(err.to_string()),
    };
    let candidates = match resolve_scope(&state, req.device_ids).await {
        Ok(candidates) => candidates,
        Err(response) => return response,
    };
    info!(
        target: "gms.api",
        operation = %operation,
        candidates = candidates.len(),
        "operation_command_requested"
    );
    let dispatch = state
        .dispatcher
        .dispatch(&candidates, GateCommand::Operation(operation))
        .await;
    bulk_response(dispatch)
}

/// 批量下发 aisleMode 命令
pub async fn dispatch_aisle_mode(
    State(state): State<AppState>,
    Json(req): Json<AisleModeCommandRequest>,
) -> Response {
    // 越界一律拒绝，不做静默截断
    let mode = match AisleMode::try_from(req.aisle_mode) {
        Ok(mode) => mode,
        Err(err) => return bad_request(err.to_string()),
    };
    let candidates = match resolve_scope(&state, req.device_ids).await {
        Ok(candidates) => candidates,
        Err(response) => return response,
    };
    info!(
        target: "gms.api",
        aisle_mode = %mode,
        candidates = candidates.len(),
        "aisle_mode_command_requested"
    );
    let dispatch = state
        .dispatcher
        .dispatch(&candidates, GateCommand::AisleMode(mode))
        .await;
    bulk_response(dispatch)
}

/// 恢复各设备上次的放行子模式
pub async fn resume_last_mode(
    State(state): State<AppState>,
    Json(req): Json<ResumeCommandRequest>,
) -> Response {
    let candidates = match resolve_scope(&state, req.device_ids).await {
        Ok(candidates) => candidates,
        Err(response) => return response,
    };
    info!(
        target: "gms.api",
        candidates = candidates.len(),
        "resume_command_requested"
    );
    let dispatch = state.dispatcher.resume_last_mode(&candidates).await;
    bulk_response(dispatch)
}
