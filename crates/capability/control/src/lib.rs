//! 命令下发能力
//!
//! 把一条命令（operation 或 aisleMode）下发到一组设备：
//! - CommandTransport：设备命令传输抽象（HTTP 实现 + 占位实现）
//! - BulkDispatcher：资格过滤（仅 online）、全员并发单发、逐台结果聚合
//!
//! 失败语义：单台失败只记在该台的结果里，绝不中断兄弟发送，
//! 也绝不以整体成功掩盖部分失败。

use async_trait::async_trait;
use domain::{AisleMode, Operation};
use gms_status::StatusEvaluator;
use gms_storage::DeviceRecord;
use gms_telemetry::{
    record_command_issued, record_command_send_failure, record_command_send_success,
    record_dispatch_latency_ms, record_dispatch_no_eligible,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// 一次下发的命令内容。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateCommand {
    Operation(Operation),
    AisleMode(AisleMode),
}

impl std::fmt::Display for GateCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateCommand::Operation(operation) => write!(f, "{operation}"),
            GateCommand::AisleMode(mode) => write!(f, "aisle_mode={mode}"),
        }
    }
}

/// 传输层错误。逐台记入结果，不向上抛。
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("device has no address")]
    NoAddress,
    #[error("http error: {0}")]
    Http(String),
    #[error("device rejected: {0}")]
    Rejected(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// 设备命令传输抽象。
///
/// 每个方法必须受传输自身的超时约束，永不悬挂。
#[async_trait]
pub trait CommandTransport: Send + Sync {
    async fn send_operation(
        &self,
        device: &DeviceRecord,
        operation: Operation,
    ) -> Result<(), TransportError>;

    async fn send_aisle_mode(
        &self,
        device: &DeviceRecord,
        mode: AisleMode,
    ) -> Result<(), TransportError>;

    /// 读取设备当前 operation（恢复上次模式用）。
    async fn fetch_operation(&self, device: &DeviceRecord) -> Result<Operation, TransportError>;
}

/// 空传输（占位与测试用）：发送即成功，读取恒为 bidirect。
#[derive(Debug, Default)]
pub struct NoopTransport;

#[async_trait]
impl CommandTransport for NoopTransport {
    async fn send_operation(
        &self,
        _device: &DeviceRecord,
        _operation: Operation,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    async fn send_aisle_mode(
        &self,
        _device: &DeviceRecord,
        _mode: AisleMode,
    ) -> Result<(), TransportError> {
        Ok(())
    }

    async fn fetch_operation(&self, _device: &DeviceRecord) -> Result<Operation, TransportError> {
        Ok(Operation::InserviceBidirect)
    }
}

#[derive(serde::Serialize)]
struct OperationBody {
    operation: Operation,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct AisleModeBody {
    aisle_mode: AisleMode,
}

#[derive(serde::Deserialize)]
struct DeviceAck {
    ok: bool,
    error: Option<String>,
}

#[derive(serde::Deserialize)]
struct OperationRead {
    ok: bool,
    operation: Option<String>,
    error: Option<String>,
}

/// HTTP 传输实现：对闸机侧 agent 说设备 wire 协议。
///
/// - `POST http://{ip}:{port}/operation/{id}`，体 `{"operation":...}`
/// - `POST http://{ip}:{port}/aisle-mode/{id}`，体 `{"aisleMode":0..3}`
/// - `GET  http://{ip}:{port}/operation/{id}` → `{"ok":...,"operation":...}`
pub struct HttpCommandTransport {
    client: reqwest::Client,
    command_port: u16,
}

impl HttpCommandTransport {
    pub fn new(command_port: u16, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Http(err.to_string()))?;
        Ok(Self {
            client,
            command_port,
        })
    }

    fn device_url(&self, device: &DeviceRecord, resource: &str) -> Result<String, TransportError> {
        let ip = device.ip.as_deref().ok_or(TransportError::NoAddress)?;
        Ok(format!(
            "http://{}:{}/{}/{}",
            ip, self.command_port, resource, device.device_id
        ))
    }

    async fn post_command<B: serde::Serialize>(
        &self,
        url: String,
        body: &B,
    ) -> Result<(), TransportError> {
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;
        if !response.status().is_success() {
            return Err(TransportError::Http(format!(
                "unexpected status {}",
                response.status()
            )));
        }
        let ack: DeviceAck = response
            .json()
            .await
            .map_err(|err| TransportError::Decode(err.to_string()))?;
        if !ack.ok {
            return Err(TransportError::Rejected(
                ack.error.unwrap_or_else(|| "unspecified".to_string()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CommandTransport for HttpCommandTransport {
    async fn send_operation(
        &self,
        device: &DeviceRecord,
        operation: Operation,
    ) -> Result<(), TransportError> {
        let url = self.device_url(device, "operation")?;
        self.post_command(url, &OperationBody { operation }).await
    }

    async fn send_aisle_mode(
        &self,
        device: &DeviceRecord,
        mode: AisleMode,
    ) -> Result<(), TransportError> {
        let url = self.device_url(device, "aisle-mode")?;
        self.post_command(url, &AisleModeBody { aisle_mode: mode })
            .await
    }

    async fn fetch_operation(&self, device: &DeviceRecord) -> Result<Operation, TransportError> {
        let url = self.device_url(device, "operation")?;
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;
        if !response.status().is_success() {
            return Err(TransportError::Http(format!(
                "unexpected status {}",
                response.status()
            )));
        }
        let read: OperationRead = response
            .json()
            .await
            .map_err(|err| TransportError::Decode(err.to_string()))?;
        if !read.ok {
            return Err(TransportError::Rejected(
                read.error.unwrap_or_else(|| "unspecified".to_string()),
            ));
        }
        let token = read
            .operation
            .ok_or_else(|| TransportError::Decode("missing operation".to_string()))?;
        // 设备侧可能回别名拼写，归一后再用
        Operation::normalize(&token).map_err(|err| TransportError::Decode(err.to_string()))
    }
}

/// 单台设备的命令结果。
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub device_id: String,
    pub ok: bool,
    pub error: Option<String>,
}

/// 一次批量下发的聚合结果。
///
/// 不变式：`ok_count + fail_count == total() == 合格目标数`，
/// 空合格集时 `no_eligible_targets` 置位且不发生任何命令 I/O。
#[derive(Debug, Clone)]
pub struct BulkDispatch {
    pub outcomes: Vec<CommandOutcome>,
    pub ok_count: usize,
    pub fail_count: usize,
    pub no_eligible_targets: bool,
}

impl BulkDispatch {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    fn no_eligible() -> Self {
        Self {
            outcomes: Vec::new(),
            ok_count: 0,
            fail_count: 0,
            no_eligible_targets: true,
        }
    }

    fn from_outcomes(outcomes: Vec<CommandOutcome>) -> Self {
        let ok_count = outcomes.iter().filter(|outcome| outcome.ok).count();
        let fail_count = outcomes.len() - ok_count;
        Self {
            outcomes,
            ok_count,
            fail_count,
            no_eligible_targets: false,
        }
    }
}

#[derive(Clone, Copy)]
enum SendPlan {
    Fixed(GateCommand),
    ResumeLastMode,
}

/// 批量命令下发器。
///
/// scope 无关：候选集合由调用方解析好传入。
pub struct BulkDispatcher {
    evaluator: StatusEvaluator,
    transport: Arc<dyn CommandTransport>,
}

impl BulkDispatcher {
    pub fn new(evaluator: StatusEvaluator, transport: Arc<dyn CommandTransport>) -> Self {
        Self {
            evaluator,
            transport,
        }
    }

    /// 对候选集合下发一条命令。
    ///
    /// 仅有效状态为 online 的设备合格（严格白名单）；
    /// 合格设备全员并发、各发一次；全部任务收尾后才返回。
    pub async fn dispatch(&self, candidates: &[DeviceRecord], command: GateCommand) -> BulkDispatch {
        self.run(candidates, SendPlan::Fixed(command)).await
    }

    /// 恢复上次模式：逐台查询设备上次的放行子模式，
    /// 非放行值或查询失败一律回退 bidirect，再照常下发。
    pub async fn resume_last_mode(&self, candidates: &[DeviceRecord]) -> BulkDispatch {
        self.run(candidates, SendPlan::ResumeLastMode).await
    }

    async fn run(&self, candidates: &[DeviceRecord], plan: SendPlan) -> BulkDispatch {
        record_command_issued();
        let started = Instant::now();
        let eligible = self.eligible_targets(candidates).await;
        info!(
            target: "gms.control",
            candidates = candidates.len(),
            eligible = eligible.len(),
            "bulk_dispatch_start"
        );
        if eligible.is_empty() {
            record_dispatch_no_eligible();
            record_dispatch_latency_ms(started.elapsed().as_millis() as u64);
            return BulkDispatch::no_eligible();
        }
        let outcomes = self.send_all(eligible, plan).await;
        let dispatch = BulkDispatch::from_outcomes(outcomes);
        record_dispatch_latency_ms(started.elapsed().as_millis() as u64);
        info!(
            target: "gms.control",
            ok_count = dispatch.ok_count,
            fail_count = dispatch.fail_count,
            total = dispatch.total(),
            "bulk_dispatch_done"
        );
        dispatch
    }

    async fn eligible_targets(&self, candidates: &[DeviceRecord]) -> Vec<DeviceRecord> {
        let now_ms = domain::now_epoch_ms();
        let statuses = self.evaluator.evaluate_all(candidates, now_ms).await;
        candidates
            .iter()
            .zip(statuses)
            .filter(|(_, status)| status.effective.is_controllable())
            .map(|(record, _)| record.clone())
            .collect()
    }

    async fn send_all(&self, targets: Vec<DeviceRecord>, plan: SendPlan) -> Vec<CommandOutcome> {
        let mut handles = Vec::with_capacity(targets.len());
        for device in targets {
            let transport = self.transport.clone();
            let device_id = device.device_id.clone();
            handles.push((
                device_id,
                tokio::spawn(async move { send_one(transport, device, plan).await }),
            ));
        }
        let mut outcomes = Vec::with_capacity(handles.len());
        for (device_id, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                // 发送任务夭折同样记账，不许丢结果
                Err(err) => {
                    record_command_send_failure();
                    outcomes.push(CommandOutcome {
                        device_id,
                        ok: false,
                        error: Some(format!("send task failed: {err}")),
                    });
                }
            }
        }
        outcomes
    }
}

async fn send_one(
    transport: Arc<dyn CommandTransport>,
    device: DeviceRecord,
    plan: SendPlan,
) -> CommandOutcome {
    let command = match plan {
        SendPlan::Fixed(command) => command,
        SendPlan::ResumeLastMode => {
            GateCommand::Operation(resolve_last_mode(transport.as_ref(), &device).await)
        }
    };
    let result = match command {
        GateCommand::Operation(operation) => transport.send_operation(&device, operation).await,
        GateCommand::AisleMode(mode) => transport.send_aisle_mode(&device, mode).await,
    };
    match result {
        Ok(()) => {
            record_command_send_success();
            info!(
                target: "gms.control",
                device_id = %device.device_id,
                command = %command,
                "command_sent"
            );
            CommandOutcome {
                device_id: device.device_id,
                ok: true,
                error: None,
            }
        }
        Err(err) => {
            record_command_send_failure();
            warn!(
                target: "gms.control",
                device_id = %device.device_id,
                command = %command,
                error = %err,
                "command_send_failed"
            );
            CommandOutcome {
                device_id: device.device_id,
                ok: false,
                error: Some(err.to_string()),
            }
        }
    }
}

async fn resolve_last_mode(transport: &dyn CommandTransport, device: &DeviceRecord) -> Operation {
    match transport.fetch_operation(device).await {
        Ok(operation) if operation.is_inservice() => operation,
        Ok(_) | Err(_) => Operation::InserviceBidirect,
    }
}
