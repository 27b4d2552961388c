pub mod operation;

pub use operation::{Operation, UnknownOperation};

use serde::{Deserialize, Serialize};

/// 设备自报状态：心跳中声明的状态，或由操作员显式设置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredStatus {
    Online,
    #[default]
    Offline,
    Fault,
    Maintenance,
}

impl DeclaredStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclaredStatus::Online => "online",
            DeclaredStatus::Offline => "offline",
            DeclaredStatus::Fault => "fault",
            DeclaredStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for DeclaredStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 有效状态：系统对设备可操作性的裁决，融合心跳与探测得出。
///
/// 派生值，每次查询现算，不落盘。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveStatus {
    Online,
    Offline,
    Stale,
    Fault,
    Maintenance,
}

impl EffectiveStatus {
    /// 是否允许接收操作员命令。
    ///
    /// 严格白名单：仅 `online` 可控，状态不明一律拒绝。
    pub fn is_controllable(&self) -> bool {
        matches!(self, EffectiveStatus::Online)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectiveStatus::Online => "online",
            EffectiveStatus::Offline => "offline",
            EffectiveStatus::Stale => "stale",
            EffectiveStatus::Fault => "fault",
            EffectiveStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for EffectiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 通道门摆模式取值非法。
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("aisle mode out of range: {0}")]
pub struct InvalidAisleMode(pub i64);

/// 通道门摆模式。
///
/// 固定取值 0..=3，越界一律拒绝，不做静默截断：
/// - 0：关闭（无管制）
/// - 1：开启
/// - 2：关闭（仅左摆）
/// - 3：关闭（仅右摆）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum AisleMode {
    Closed,
    Open,
    ClosedLeftFlap,
    ClosedRightFlap,
}

impl AisleMode {
    pub fn value(&self) -> u8 {
        match self {
            AisleMode::Closed => 0,
            AisleMode::Open => 1,
            AisleMode::ClosedLeftFlap => 2,
            AisleMode::ClosedRightFlap => 3,
        }
    }
}

impl TryFrom<i64> for AisleMode {
    type Error = InvalidAisleMode;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AisleMode::Closed),
            1 => Ok(AisleMode::Open),
            2 => Ok(AisleMode::ClosedLeftFlap),
            3 => Ok(AisleMode::ClosedRightFlap),
            other => Err(InvalidAisleMode(other)),
        }
    }
}

impl From<AisleMode> for u8 {
    fn from(mode: AisleMode) -> Self {
        mode.value()
    }
}

impl std::fmt::Display for AisleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// 当前 Unix epoch 毫秒时间戳。
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
