//! 稳定的 wire DTO 与 API 响应契约。
//!
//! 所有 HTTP 端点的请求/响应体在此集中定义：
//! - 通用确认：`{ok:true}` / `{ok:false,error}`
//! - 心跳接入：单条上报、批量上报、全量读取
//! - 设备视图：存储记录 + 有效状态
//! - 批量命令：operation / aisleMode / resume 请求与逐设备结果
//! - 指标快照：GET /metrics
//!
//! 字段名一律 camelCase；可选字段缺省时不序列化。

use domain::{DeclaredStatus, EffectiveStatus};
use serde::{Deserialize, Serialize};

/// 简单确认响应：`{"ok":true}`。
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub ok: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// 失败响应：`{"ok":false,"error":...}`。
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

/// 心跳上报体（单条与批量共用）。
///
/// `id` 在 DTO 层保持可选：单条路径缺 id 返回 400，
/// 批量路径缺 id 的条目静默跳过，不中断整批。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatRequest {
    pub id: Option<String>,
    pub ip: Option<String>,
    pub status: Option<DeclaredStatus>,
    pub ts: Option<i64>,
    pub gate_id: Option<String>,
    pub side: Option<String>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub name: Option<String>,
    pub message: Option<String>,
}

/// 批量心跳应用结果：`{"ok":true,"count":N}`。
#[derive(Debug, Serialize)]
pub struct BulkIngestResponse {
    pub ok: bool,
    pub count: usize,
}

impl BulkIngestResponse {
    pub fn applied(count: usize) -> Self {
        Self { ok: true, count }
    }
}

/// 设备存储记录的 wire 形式。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDto {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub status: DeclaredStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_heartbeat_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 设备记录 + 现算的有效状态。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatusDto {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub status: DeclaredStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_heartbeat_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub effective_status: EffectiveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtt_ms: Option<u64>,
}

/// 存储记录列表：`{"ok":true,"devices":[...]}`。
#[derive(Debug, Serialize)]
pub struct DeviceListResponse {
    pub ok: bool,
    pub devices: Vec<DeviceDto>,
}

impl DeviceListResponse {
    pub fn of(devices: Vec<DeviceDto>) -> Self {
        Self { ok: true, devices }
    }
}

/// 设备状态列表：`{"ok":true,"devices":[...]}`（含有效状态）。
#[derive(Debug, Serialize)]
pub struct DeviceStatusListResponse {
    pub ok: bool,
    pub devices: Vec<DeviceStatusDto>,
}

impl DeviceStatusListResponse {
    pub fn of(devices: Vec<DeviceStatusDto>) -> Self {
        Self { ok: true, devices }
    }
}

/// 单设备状态：`{"ok":true,"device":{...}}`。
#[derive(Debug, Serialize)]
pub struct DeviceStatusResponse {
    pub ok: bool,
    pub device: DeviceStatusDto,
}

impl DeviceStatusResponse {
    pub fn of(device: DeviceStatusDto) -> Self {
        Self { ok: true, device }
    }
}

/// 批量 operation 命令请求。
///
/// `operation` 保留原始字符串，由 handler 归一化，
/// 归一失败时把原输入原样带回 400 响应。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationCommandRequest {
    pub operation: String,
    #[serde(default)]
    pub device_ids: Option<Vec<String>>,
}

/// 批量 aisleMode 命令请求。
///
/// `aisle_mode` 保留原始整数，由 handler 做范围校验，越界返回 400。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AisleModeCommandRequest {
    pub aisle_mode: i64,
    #[serde(default)]
    pub device_ids: Option<Vec<String>>,
}

/// 恢复上次模式命令请求。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeCommandRequest {
    #[serde(default)]
    pub device_ids: Option<Vec<String>>,
}

/// 批量命令中单个设备的结果。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcomeDto {
    pub device_id: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 批量命令聚合结果。
///
/// 不变式：`okCount + failCount == total == 合格目标数`；
/// 部分失败必须逐台列出，绝不以整体成功掩盖。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCommandResponse {
    pub ok: bool,
    pub ok_count: usize,
    pub fail_count: usize,
    pub total: usize,
    pub no_eligible_targets: bool,
    pub results: Vec<CommandOutcomeDto>,
}

/// 指标快照的 wire 形式。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub heartbeats_received: u64,
    pub heartbeats_skipped: u64,
    pub probes_attempted: u64,
    pub probes_reachable: u64,
    pub probes_refused: u64,
    pub probe_failures: u64,
    pub commands_issued: u64,
    pub command_send_success: u64,
    pub command_send_failure: u64,
    pub dispatch_no_eligible: u64,
    pub dispatch_latency_ms_total: u64,
    pub dispatch_latency_ms_count: u64,
}

/// 指标响应：`{"ok":true,"metrics":{...}}`。
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub ok: bool,
    pub metrics: MetricsSnapshotDto,
}

impl MetricsResponse {
    pub fn of(metrics: MetricsSnapshotDto) -> Self {
        Self { ok: true, metrics }
    }
}
