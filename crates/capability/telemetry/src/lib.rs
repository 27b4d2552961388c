//! 追踪、请求 ID 与进程级指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
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

/// 基础指标。
pub struct TelemetryMetrics {
    heartbeats_received: AtomicU64,
    heartbeats_skipped: AtomicU64,
    probes_attempted: AtomicU64,
    probes_reachable: AtomicU64,
    probes_refused: AtomicU64,
    probe_failures: AtomicU64,
    commands_issued: AtomicU64,
    command_send_success: AtomicU64,
    command_send_failure: AtomicU64,
    dispatch_no_eligible: AtomicU64,
    dispatch_latency_ms_total: AtomicU64,
    dispatch_latency_ms_count: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            heartbeats_received: AtomicU64::new(0),
            heartbeats_skipped: AtomicU64::new(0),
            probes_attempted: AtomicU64::new(0),
            probes_reachable: AtomicU64::new(0),
            probes_refused: AtomicU64::new(0),
            probe_failures: AtomicU64::new(0),
            commands_issued: AtomicU64::new(0),
            command_send_success: AtomicU64::new(0),
            command_send_failure: AtomicU64::new(0),
            dispatch_no_eligible: AtomicU64::new(0),
            dispatch_latency_ms_total: AtomicU64::new(0),
            dispatch_latency_ms_count: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            heartbeats_received: self.heartbeats_received.load(Ordering::Relaxed),
            heartbeats_skipped: self.heartbeats_skipped.load(Ordering::Relaxed),
            probes_attempted: self.probes_attempted.load(Ordering::Relaxed),
            probes_reachable: self.probes_reachable.load(Ordering::Relaxed),
            probes_refused: self.probes_refused.load(Ordering::Relaxed),
            probe_failures: self.probe_failures.load(Ordering::Relaxed),
            commands_issued: self.commands_issued.load(Ordering::Relaxed),
            command_send_success: self.command_send_success.load(Ordering::Relaxed),
            command_send_failure: self.command_send_failure.load(Ordering::Relaxed),
            dispatch_no_eligible: self.dispatch_no_eligible.load(Ordering::Relaxed),
            dispatch_latency_ms_total: self.dispatch_latency_ms_total.load(Ordering::Relaxed),
            dispatch_latency_ms_count: self.dispatch_latency_ms_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录接收的心跳上报条数。
pub fn record_heartbeat_received() {
    metrics()
        .heartbeats_received
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录批量上报中因缺 id 跳过的条数。
pub fn record_heartbeat_skipped() {
    metrics().heartbeats_skipped.fetch_add(1, Ordering::Relaxed);
}

/// 记录发起的探测次数。
pub fn record_probe_attempted() {
    metrics().probes_attempted.fetch_add(1, Ordering::Relaxed);
}

/// 记录判定可达的探测次数。
pub fn record_probe_reachable() {
    metrics().probes_reachable.fetch_add(1, Ordering::Relaxed);
}

/// 记录被明确拒绝的探测次数。
pub fn record_probe_refused() {
    metrics().probes_refused.fetch_add(1, Ordering::Relaxed);
}

/// 记录无法判定的探测次数（超时、网络错误）。
pub fn record_probe_failure() {
    metrics().probe_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录批量命令请求次数。
pub fn record_command_issued() {
    metrics().commands_issued.fetch_add(1, Ordering::Relaxed);
}

/// 记录单台设备命令发送成功次数。
pub fn record_command_send_success() {
    metrics()
        .command_send_success
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录单台设备命令发送失败次数。
pub fn record_command_send_failure() {
    metrics()
        .command_send_failure
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录无合格目标的批量命令次数。
pub fn record_dispatch_no_eligible() {
    metrics()
        .dispatch_no_eligible
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录一次批量下发的整体耗时（毫秒）。
pub fn record_dispatch_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .dispatch_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .dispatch_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}
