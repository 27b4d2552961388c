//! 设备状态 handlers
//!
//! 读取面，给操作台轮询：
//! - GET /devices - 全量设备 + 现算的有效状态（含探测）
//! - GET /devices/{id}/status - 单台设备状态
//!
//! 有效状态每次现算，不缓存，永远反映当前阈值与探测结果。

use crate::AppState;
use crate::utils::response::{device_status_to_dto, not_found, storage_error};
use api_contract::{DeviceStatusListResponse, DeviceStatusResponse};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(serde::Deserialize)]
pub struct DevicePath {
    device_id: String,
}

/// 全量设备状态列表
pub async fn list_devices(State(state): State<AppState>) -> Response {
    let records = match state.store.read_all().await {
        Ok(records) => records,
        Err(err) => return storage_error(err),
    };
    let statuses = state
        .evaluator
        .evaluate_all(&records, domain::now_epoch_ms())
        .await;
    let devices = records
        .into_iter()
        .zip(statuses)
        .map(|(record, status)| device_status_to_dto(record, &status))
        .collect();
    (StatusCode::OK, Json(DeviceStatusListResponse::of(devices))).into_response()
}

/// 单台设备状态
pub async fn get_device_status(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
) -> Response {
    match state.store.find(&path.device_id).await {
        Ok(Some(record)) => {
            let status = state
                .evaluator
                .evaluate(&record, domain::now_epoch_ms())
                .await;
            let dto = device_status_to_dto(record, &status);
            (StatusCode::OK, Json(DeviceStatusResponse::of(dto))).into_response()
        }
        Ok(None) => not_found("device not found"),
        Err(err) => storage_error(err),
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{body_json, request, test_state};

    #[tokio::test]
    async fn list_carries_effective_status() {
        let state = test_state();
        // 新鲜心跳、无探测地址：有效状态 online
        request(
            state.clone(),
            "POST",
            "/hb",
            Some(r#"{"id":"G1-01","status":"online"}"#),
        )
        .await;
        // 从未心跳：有效状态 offline
        request(
            state.clone(),
            "POST",
            "/hb",
            Some(r#"{"id":"G1-02","ts":1000}"#),
        )
        .await;

        let response = request(state, "GET", "/devices", None).await;
        assert_eq!(response.status(), 200);
        let body = body_json(response).await;
        assert_eq!(body["devices"][0]["id"], "G1-01");
        assert_eq!(body["devices"][0]["effectiveStatus"], "online");
        assert_eq!(body["devices"][1]["effectiveStatus"], "offline");
    }

    #[tokio::test]
    async fn maintenance_wins_in_single_status() {
        let state = test_state();
        request(
            state.clone(),
            "POST",
            "/hb",
            Some(r#"{"id":"G1-01","status":"maintenance"}"#),
        )
        .await;

        let response = request(state, "GET", "/devices/G1-01/status", None).await;
        assert_eq!(response.status(), 200);
        let body = body_json(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["device"]["effectiveStatus"], "maintenance");
    }

    #[tokio::test]
    async fn unknown_device_is_404() {
        let response = request(test_state(), "GET", "/devices/G9-99/status", None).await;
        assert_eq!(response.status(), 404);
        let body = body_json(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "device not found");
    }
}
