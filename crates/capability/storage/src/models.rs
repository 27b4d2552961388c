//! 数据模型
//!
//! 定义存储相关的数据模型：
//! - 设备模型：DeviceRecord（权威记录，持久化形式即 wire 形式）
//! - 上报模型：HeartbeatReport（一次心跳携带的部分字段）

use domain::DeclaredStatus;
use serde::{Deserialize, Serialize};

/// 设备记录：一台物理闸机的身份与最近已知事实。
///
/// `device_id` 创建后不可变；记录只通过合并写入变更，核心不删除。
/// 序列化形式同时用于持久化文件与 `GET /hb` 读取面。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    #[serde(rename = "id")]
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(rename = "status", default)]
    pub declared_status: DeclaredStatus,
    #[serde(
        rename = "lastHeartbeatAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_heartbeat_at_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DeviceRecord {
    /// 把一条上报合并到已有记录上（无记录时新建）。
    ///
    /// 带值的字段覆盖旧值，缺失字段保留旧值；
    /// `last_heartbeat_at_ms` 取上报自带的 ts，缺省用接收时间。
    pub fn merged(
        existing: Option<DeviceRecord>,
        report: HeartbeatReport,
        received_at_ms: i64,
    ) -> DeviceRecord {
        let mut record = existing.unwrap_or_else(|| DeviceRecord {
            device_id: report.device_id.clone(),
            ip: None,
            declared_status: DeclaredStatus::default(),
            last_heartbeat_at_ms: None,
            gate_id: None,
            side: None,
            device_type: None,
            name: None,
            message: None,
        });
        if let Some(ip) = report.ip {
            record.ip = Some(ip);
        }
        if let Some(status) = report.declared_status {
            record.declared_status = status;
        }
        record.last_heartbeat_at_ms = Some(report.ts_ms.unwrap_or(received_at_ms));
        if let Some(gate_id) = report.gate_id {
            record.gate_id = Some(gate_id);
        }
        if let Some(side) = report.side {
            record.side = Some(side);
        }
        if let Some(device_type) = report.device_type {
            record.device_type = Some(device_type);
        }
        if let Some(name) = report.name {
            record.name = Some(name);
        }
        if let Some(message) = report.message {
            record.message = Some(message);
        }
        record
    }
}

/// 心跳上报：一次上报携带的部分设备字段。
///
/// 存储层要求 `device_id` 必有；缺 id 的 DTO 在接入层就被拦下或跳过。
#[derive(Debug, Clone)]
pub struct HeartbeatReport {
    pub device_id: String,
    pub ip: Option<String>,
    pub declared_status: Option<DeclaredStatus>,
    pub ts_ms: Option<i64>,
    pub gate_id: Option<String>,
    pub side: Option<String>,
    pub device_type: Option<String>,
    pub name: Option<String>,
    pub message: Option<String>,
}

impl HeartbeatReport {
    /// 只带 id 的空上报，其余字段按需填充。
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ip: None,
            declared_status: None,
            ts_ms: None,
            gate_id: None,
            side: None,
            device_type: None,
            name: None,
            message: None,
        }
    }
}
