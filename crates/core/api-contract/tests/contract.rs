use api_contract::{
    AisleModeCommandRequest, BulkCommandResponse, CommandOutcomeDto, HeartbeatRequest,
    OperationCommandRequest, ResumeCommandRequest,
};

#[test]
fn heartbeat_request_parses_wire_names() {
    let payload = r#"{
        "id": "G1-01",
        "ip": "10.0.0.5",
        "status": "online",
        "ts": 1700000000000,
        "gateId": "G1",
        "side": "north",
        "type": "flap",
        "name": "Gate 1 entry"
    }"#;
    let req: HeartbeatRequest = serde_json::from_str(payload).expect("parse");
    assert_eq!(req.id.as_deref(), Some("G1-01"));
    assert_eq!(req.ip.as_deref(), Some("10.0.0.5"));
    assert_eq!(req.ts, Some(1_700_000_000_000));
    assert_eq!(req.gate_id.as_deref(), Some("G1"));
    assert_eq!(req.device_type.as_deref(), Some("flap"));
}

#[test]
fn heartbeat_request_tolerates_sparse_body() {
    let req: HeartbeatRequest = serde_json::from_str(r#"{"id":"G1-02"}"#).expect("parse");
    assert_eq!(req.id.as_deref(), Some("G1-02"));
    assert!(req.ip.is_none());
    assert!(req.status.is_none());
    assert!(req.ts.is_none());

    // id 缺失在 DTO 层合法，由 handler 决定 400 或跳过。
    let req: HeartbeatRequest = serde_json::from_str(r#"{"ip":"10.0.0.9"}"#).expect("parse");
    assert!(req.id.is_none());
}

#[test]
fn operation_request_keeps_raw_token() {
    let payload = r#"{"operation":"BI-DIRECTION","deviceIds":["G1-01","G1-02"]}"#;
    let req: OperationCommandRequest = serde_json::from_str(payload).expect("parse");
    assert_eq!(req.operation, "BI-DIRECTION");
    assert_eq!(
        req.device_ids.as_deref(),
        Some(&["G1-01".to_string(), "G1-02".to_string()][..])
    );

    let req: OperationCommandRequest =
        serde_json::from_str(r#"{"operation":"station_close"}"#).expect("parse");
    assert!(req.device_ids.is_none());
}

#[test]
fn aisle_mode_request_keeps_raw_value() {
    let req: AisleModeCommandRequest =
        serde_json::from_str(r#"{"aisleMode":7}"#).expect("parse");
    assert_eq!(req.aisle_mode, 7);
}

#[test]
fn resume_request_accepts_empty_body() {
    let req: ResumeCommandRequest = serde_json::from_str("{}").expect("parse");
    assert!(req.device_ids.is_none());
}

#[test]
fn bulk_command_response_is_camel_case() {
    let response = BulkCommandResponse {
        ok: true,
        ok_count: 1,
        fail_count: 2,
        total: 3,
        no_eligible_targets: false,
        results: vec![CommandOutcomeDto {
            device_id: "G1-01".to_string(),
            ok: false,
            error: Some("connect refused".to_string()),
        }],
    };
    let value = serde_json::to_value(response).expect("serialize");
    assert!(value.get("okCount").is_some());
    assert!(value.get("failCount").is_some());
    assert!(value.get("noEligibleTargets").is_some());
    assert!(value.get("ok_count").is_none());
    let result = &value["results"][0];
    assert_eq!(result["deviceId"], "G1-01");
    assert_eq!(result["error"], "connect refused");
}
