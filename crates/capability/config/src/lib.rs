//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
///
/// 全部来自 `GMS_*` 环境变量，缺省用默认值；
/// 数值解析失败在启动时立刻报错，不带病运行。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub state_path: String,
    pub stale_threshold_ms: u64,
    pub offline_threshold_ms: u64,
    pub probe_port: u16,
    pub probe_timeout_ms: u64,
    pub command_port: u16,
    pub command_timeout_ms: u64,
    pub snapshot_debounce_ms: u64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr = env::var("GMS_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let state_path =
            env::var("GMS_STATE_PATH").unwrap_or_else(|_| "data/devices.json".to_string());
        let stale_threshold_ms = read_u64_with_default("GMS_STALE_THRESHOLD_MS", 60_000)?;
        let offline_threshold_ms = read_u64_with_default("GMS_OFFLINE_THRESHOLD_MS", 300_000)?;
        let probe_port = read_u16_with_default("GMS_PROBE_PORT", 7700)?;
        let probe_timeout_ms = read_u64_with_default("GMS_PROBE_TIMEOUT_MS", 1_500)?;
        let command_port = read_u16_with_default("GMS_COMMAND_PORT", 7700)?;
        let command_timeout_ms = read_u64_with_default("GMS_COMMAND_TIMEOUT_MS", 3_000)?;
        let snapshot_debounce_ms = read_u64_with_default("GMS_SNAPSHOT_DEBOUNCE_MS", 300)?;

        Ok(Self {
            http_addr,
            state_path,
            stale_threshold_ms,
            offline_threshold_ms,
            probe_port,
            probe_timeout_ms,
            command_port,
            command_timeout_ms,
            snapshot_debounce_ms,
        })
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u16_with_default(key: &str, default: u16) -> Result<u16, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}
