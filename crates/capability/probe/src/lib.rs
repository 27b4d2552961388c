//! 网络可达性探测能力
//!
//! 对设备地址发起一次有界超时的 TCP 连接，独立于设备自报心跳，
//! 给状态融合提供第二路证据。
//!
//! 三种结局严格区分：
//! - 连上：`reachable: true`（设备在网且端口开着）
//! - 被明确拒绝：`reachable: false`（主机应答了，端口说不）
//! - 超时/解析失败/其他网络错误：[`ProbeError`]，表示「无法判定」，
//!   调用方不得当作 unreachable 处理
//!
//! 本层不做重试；重试策略属于调用方。

use std::io::ErrorKind;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tracing::debug;

/// 一次已判定的探测结果。
///
/// 仅在本次探测的生命周期内有效；核心不缓存。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub reachable: bool,
    pub rtt_ms: u64,
}

/// 探测失败：与 `reachable: false` 严格区分的「无法判定」。
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("probe timed out after {0}ms")]
    Timeout(u64),
    #[error("invalid probe address: {0}")]
    InvalidAddress(String),
    #[error("probe network error: {0}")]
    Network(String),
}

/// 对 `host:port` 发起一次有界超时的连接探测。
///
/// 无论哪条路径都会在 `timeout` 加常数调度开销内返回，
/// 连接资源在返回前释放。
pub async fn probe(host: &str, port: u16, timeout: Duration) -> Result<ProbeOutcome, ProbeError> {
    let addr = format!("{host}:{port}");
    let started = Instant::now();
    let connect = tokio::time::timeout(timeout, TcpStream::connect(&addr)).await;
    let rtt_ms = started.elapsed().as_millis() as u64;
    match connect {
        Ok(Ok(stream)) => {
            drop(stream);
            debug!(target: "gms.probe", addr = %addr, rtt_ms, "probe connected");
            Ok(ProbeOutcome {
                reachable: true,
                rtt_ms,
            })
        }
        Ok(Err(err)) => match err.kind() {
            // 主机在线但端口拒绝：这是明确的「不可达」判定
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted => {
                debug!(target: "gms.probe", addr = %addr, rtt_ms, "probe refused");
                Ok(ProbeOutcome {
                    reachable: false,
                    rtt_ms,
                })
            }
            ErrorKind::InvalidInput => Err(ProbeError::InvalidAddress(addr)),
            _ => Err(ProbeError::Network(err.to_string())),
        },
        Err(_) => Err(ProbeError::Timeout(timeout.as_millis() as u64)),
    }
}
