//! HTTP 响应辅助函数和 DTO 转换
//!
//! 提供统一的错误响应构造函数和 DTO 转换函数：
//! - 错误响应：bad_request, not_found, storage_error
//! - DTO 转换：device_to_dto, device_status_to_dto, bulk_response
//!
//! 设计原则：
//! - 错误一律 `{ok:false,error}`，HTTP 状态码与错误类别对应
//! - 转换保持 Record 与 DTO 字段一一对应

use api_contract::{
    BulkCommandResponse, CommandOutcomeDto, DeviceDto, DeviceStatusDto, ErrorResponse,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gms_control::BulkDispatch;
use gms_status::DeviceStatus;
use gms_storage::{DeviceRecord, StorageError};

/// 错误请求响应
pub fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(message.into())),
    )
        .into_response()
}

/// 资源未找到响应
pub fn not_found(message: impl Into<String>) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(message.into())),
    )
        .into_response()
}

/// 存储错误响应
pub fn storage_error(err: StorageError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(err.to_string())),
    )
        .into_response()
}

/// DeviceRecord 转 DeviceDto
pub fn device_to_dto(record: DeviceRecord) -> DeviceDto {
    DeviceDto {
        id: record.device_id,
        ip: record.ip,
        status: record.declared_status,
        last_heartbeat_at: record.last_heartbeat_at_ms,
        gate_id: record.gate_id,
        side: record.side,
        device_type: record.device_type,
        name: record.name,
        message: record.message,
    }
}

/// DeviceRecord + DeviceStatus 转 DeviceStatusDto
pub fn device_status_to_dto(record: DeviceRecord, status: &DeviceStatus) -> DeviceStatusDto {
    DeviceStatusDto {
        id: record.device_id,
        ip: record.ip,
        status: record.declared_status,
        last_heartbeat_at: record.last_heartbeat_at_ms,
        gate_id: record.gate_id,
        side: record.side,
        device_type: record.device_type,
        name: record.name,
        message: record.message,
        effective_status: status.effective,
        rtt_ms: status.rtt_ms,
    }
}

/// BulkDispatch 转批量命令响应
pub fn bulk_response(dispatch: BulkDispatch) -> Response {
    let total = dispatch.total();
    let response = BulkCommandResponse {
        ok: true,
        ok_count: dispatch.ok_count,
        fail_count: dispatch.fail_count,
        total,
        no_eligible_targets: dispatch.no_eligible_targets,
        results: dispatch
            .outcomes
            .into_iter()
            .map(|outcome| CommandOutcomeDto {
                device_id: outcome.device_id,
                ok: outcome.ok,
                error: outcome.error,
            })
            .collect(),
    };
    (StatusCode::OK, Json(response)).into_response()
}
