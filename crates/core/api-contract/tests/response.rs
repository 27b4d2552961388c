use api_contract::{AckResponse, DeviceDto, DeviceListResponse, ErrorResponse};
use domain::DeclaredStatus;

#[test]
fn ack_is_bare_ok_true() {
    let value = serde_json::to_value(AckResponse::ok()).expect("serialize");
    assert_eq!(value, serde_json::json!({ "ok": true }));
}

#[test]
fn error_carries_ok_false_and_message() {
    let value = serde_json::to_value(ErrorResponse::new("id required")).expect("serialize");
    assert_eq!(value, serde_json::json!({ "ok": false, "error": "id required" }));
}

#[test]
fn device_dto_uses_wire_names_and_omits_absent_fields() {
    let dto = DeviceDto {
        id: "G1-01".to_string(),
        ip: None,
        status: DeclaredStatus::Online,
        last_heartbeat_at: Some(1_700_000_000_000),
        gate_id: Some("G1".to_string()),
        side: None,
        device_type: Some("flap".to_string()),
        name: None,
        message: None,
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert_eq!(value["id"], "G1-01");
    assert_eq!(value["status"], "online");
    assert_eq!(value["lastHeartbeatAt"], 1_700_000_000_000i64);
    assert_eq!(value["type"], "flap");
    assert!(value.get("ip").is_none());
    assert!(value.get("side").is_none());
    assert!(value.get("deviceType").is_none());
}

#[test]
fn device_list_wraps_devices_array() {
    let value = serde_json::to_value(DeviceListResponse::of(Vec::new())).expect("serialize");
    assert_eq!(value["ok"], true);
    assert!(value["devices"].as_array().expect("array").is_empty());
}
