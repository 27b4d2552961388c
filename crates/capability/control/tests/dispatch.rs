use async_trait::async_trait;
use domain::{AisleMode, DeclaredStatus, Operation, now_epoch_ms};
use gms_control::{BulkDispatcher, CommandTransport, GateCommand, TransportError};
use gms_status::{FusionThresholds, StatusEvaluator};
use gms_storage::DeviceRecord;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn gate(device_id: &str, declared: DeclaredStatus, last_heartbeat_at_ms: Option<i64>) -> DeviceRecord {
    DeviceRecord {
        device_id: device_id.to_string(),
        // 不配地址：资格判定走纯心跳路径，不依赖真实网络
        ip: None,
        declared_status: declared,
        last_heartbeat_at_ms,
        gate_id: None,
        side: None,
        device_type: None,
        name: None,
        message: None,
    }
}

fn online(device_id: &str) -> DeviceRecord {
    gate(device_id, DeclaredStatus::Online, Some(now_epoch_ms()))
}

fn evaluator() -> StatusEvaluator {
    StatusEvaluator::new(FusionThresholds::default(), 7700, Duration::from_millis(200))
}

/// 可编程的测试传输：记录每次调用，按 id 注入失败或 panic。
#[derive(Default)]
struct RecordingTransport {
    fail_ids: HashSet<String>,
    panic_ids: HashSet<String>,
    last_modes: HashMap<String, Operation>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }

    async fn record_send(
        &self,
        device: &DeviceRecord,
        command: String,
    ) -> Result<(), TransportError> {
        if self.panic_ids.contains(&device.device_id) {
            panic!("injected panic for {}", device.device_id);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls
            .lock()
            .expect("calls lock")
            .push((device.device_id.clone(), command));
        if self.fail_ids.contains(&device.device_id) {
            return Err(TransportError::Http("connect refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CommandTransport for RecordingTransport {
    async fn send_operation(
        &self,
        device: &DeviceRecord,
        operation: Operation,
    ) -> Result<(), TransportError> {
        self.record_send(device, operation.to_string()).await
    }

    async fn send_aisle_mode(
        &self,
        device: &DeviceRecord,
        mode: AisleMode,
    ) -> Result<(), TransportError> {
        self.record_send(device, format!("aisle_mode={mode}")).await
    }

    async fn fetch_operation(&self, device: &DeviceRecord) -> Result<Operation, TransportError> {
        self.last_modes
            .get(&device.device_id)
            .copied()
            .ok_or_else(|| TransportError::Http("lookup failed".to_string()))
    }
}

#[tokio::test]
async fn station_close_reaches_only_online_targets_with_full_accounting() {
    // 5 台候选：3 台 online，1 台心跳过期（stale），1 台维护中。
    let candidates = vec![
        online("G1-01"),
        online("G1-02"),
        online("G1-03"),
        gate(
            "G1-04",
            DeclaredStatus::Online,
            Some(now_epoch_ms() - 120_000),
        ),
        gate("G1-05", DeclaredStatus::Maintenance, Some(now_epoch_ms())),
    ];
    let transport = Arc::new(RecordingTransport {
        fail_ids: HashSet::from(["G1-02".to_string(), "G1-03".to_string()]),
        ..RecordingTransport::default()
    });
    let dispatcher = BulkDispatcher::new(evaluator(), transport.clone());

    let dispatch = dispatcher
        .dispatch(&candidates, GateCommand::Operation(Operation::StationClose))
        .await;

    assert_eq!(dispatch.ok_count, 1);
    assert_eq!(dispatch.fail_count, 2);
    assert_eq!(dispatch.total(), 3);
    assert!(!dispatch.no_eligible_targets);
    assert_eq!(dispatch.ok_count + dispatch.fail_count, dispatch.total());

    // 不合格设备完全不出现在结果里，也没有收到命令
    let outcome_ids: HashSet<&str> = dispatch
        .outcomes
        .iter()
        .map(|outcome| outcome.device_id.as_str())
        .collect();
    assert!(!outcome_ids.contains("G1-04"));
    assert!(!outcome_ids.contains("G1-05"));
    for (device_id, command) in transport.calls() {
        assert!(["G1-01", "G1-02", "G1-03"].contains(&device_id.as_str()));
        assert_eq!(command, "station_close");
    }

    // 失败的两台带错误文本
    for outcome in &dispatch.outcomes {
        if outcome.ok {
            assert!(outcome.error.is_none());
        } else {
            assert_eq!(outcome.error.as_deref(), Some("http error: connect refused"));
        }
    }
}

#[tokio::test]
async fn empty_eligible_set_returns_without_command_io() {
    let candidates = vec![
        gate("G1-01", DeclaredStatus::Online, None),
        gate("G1-02", DeclaredStatus::Maintenance, Some(now_epoch_ms())),
    ];
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = BulkDispatcher::new(evaluator(), transport.clone());

    let dispatch = dispatcher
        .dispatch(&candidates, GateCommand::Operation(Operation::Emergency))
        .await;

    assert!(dispatch.no_eligible_targets);
    assert_eq!(dispatch.total(), 0);
    assert_eq!(dispatch.ok_count + dispatch.fail_count, 0);
    assert!(dispatch.outcomes.is_empty());
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn aisle_mode_commands_use_the_mode_channel() {
    let candidates = vec![online("G1-01")];
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = BulkDispatcher::new(evaluator(), transport.clone());

    let mode = AisleMode::try_from(1).expect("mode");
    let dispatch = dispatcher
        .dispatch(&candidates, GateCommand::AisleMode(mode))
        .await;

    assert_eq!(dispatch.ok_count, 1);
    assert_eq!(
        transport.calls(),
        vec![("G1-01".to_string(), "aisle_mode=1".to_string())]
    );
}

#[tokio::test]
async fn resume_resolves_per_device_and_falls_back_to_bidirect() {
    let candidates = vec![online("G1-01"), online("G1-02"), online("G1-03")];
    let transport = Arc::new(RecordingTransport {
        last_modes: HashMap::from([
            ("G1-01".to_string(), Operation::InserviceEntry),
            // G1-02 无记录：查询失败
            ("G1-03".to_string(), Operation::StationClose),
        ]),
        ..RecordingTransport::default()
    });
    let dispatcher = BulkDispatcher::new(evaluator(), transport.clone());

    let dispatch = dispatcher.resume_last_mode(&candidates).await;
    assert_eq!(dispatch.ok_count, 3);

    let sent: HashMap<String, String> = transport.calls().into_iter().collect();
    assert_eq!(sent["G1-01"], "inservice_entry");
    assert_eq!(sent["G1-02"], "inservice_bidirect");
    assert_eq!(sent["G1-03"], "inservice_bidirect");
}

#[tokio::test]
async fn sends_run_concurrently_not_sequentially() {
    let candidates: Vec<DeviceRecord> = (1..=8).map(|i| online(&format!("G1-{i:02}"))).collect();
    let transport = Arc::new(RecordingTransport {
        delay: Some(Duration::from_millis(100)),
        ..RecordingTransport::default()
    });
    let dispatcher = BulkDispatcher::new(evaluator(), transport);

    let started = Instant::now();
    let dispatch = dispatcher
        .dispatch(
            &candidates,
            GateCommand::Operation(Operation::OutOfService),
        )
        .await;

    assert_eq!(dispatch.ok_count, 8);
    // 串行要 800ms 往上；并发应远低于此
    assert!(started.elapsed() < Duration::from_millis(600));
}

#[tokio::test]
async fn a_panicking_send_is_accounted_and_does_not_abort_siblings() {
    let candidates = vec![online("G1-01"), online("G1-02")];
    let transport = Arc::new(RecordingTransport {
        panic_ids: HashSet::from(["G1-01".to_string()]),
        ..RecordingTransport::default()
    });
    let dispatcher = BulkDispatcher::new(evaluator(), transport);

    let dispatch = dispatcher
        .dispatch(&candidates, GateCommand::Operation(Operation::StationClose))
        .await;

    assert_eq!(dispatch.total(), 2);
    assert_eq!(dispatch.ok_count, 1);
    assert_eq!(dispatch.fail_count, 1);
    let failed = dispatch
        .outcomes
        .iter()
        .find(|outcome| !outcome.ok)
        .expect("failed outcome");
    assert_eq!(failed.device_id, "G1-01");
    assert!(failed.error.is_some());
}
