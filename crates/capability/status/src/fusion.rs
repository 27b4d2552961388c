//! 融合策略：声明状态 + 心跳新鲜度 + 探测证据 → 有效状态。
//!
//! 规则按序评估，先匹配者定案：
//! 1. 声明维护态永远胜出，心跳和探测都不能推翻
//! 2. 心跳年龄按阈值分级：fresh / stale / dead（从未上报视作 dead）
//! 3. dead：探测可达 → fault（在网却不心跳，异常），否则 offline
//! 4. stale：探测可达 → online，探测不可达 → offline，无探测 → stale
//! 5. fresh：探测明确不可达 → fault，否则 online
//!
//! 探测失败（超时、网络错误）不是证据，调用方传 `None`。

use domain::{DeclaredStatus, EffectiveStatus};
use gms_probe::ProbeOutcome;

/// 心跳新鲜度分级阈值（毫秒），按调用配置。
#[derive(Debug, Clone, Copy)]
pub struct FusionThresholds {
    pub stale_ms: u64,
    pub offline_ms: u64,
}

impl Default for FusionThresholds {
    fn default() -> Self {
        Self {
            stale_ms: 60_000,
            offline_ms: 300_000,
        }
    }
}

/// 心跳新鲜度。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatFreshness {
    Fresh,
    Stale,
    Dead,
}

impl FusionThresholds {
    /// 按心跳年龄分级。从未收到心跳视作年龄无穷大。
    pub fn classify(&self, last_heartbeat_at_ms: Option<i64>, now_ms: i64) -> HeartbeatFreshness {
        let Some(last) = last_heartbeat_at_ms else {
            return HeartbeatFreshness::Dead;
        };
        let age = now_ms.saturating_sub(last).max(0) as u64;
        if age <= self.stale_ms {
            HeartbeatFreshness::Fresh
        } else if age <= self.offline_ms {
            HeartbeatFreshness::Stale
        } else {
            HeartbeatFreshness::Dead
        }
    }
}

/// 融合出有效状态。纯函数，无 I/O。
pub fn fuse(
    declared: DeclaredStatus,
    freshness: HeartbeatFreshness,
    probe: Option<&ProbeOutcome>,
) -> EffectiveStatus {
    if declared == DeclaredStatus::Maintenance {
        return EffectiveStatus::Maintenance;
    }
    match freshness {
        HeartbeatFreshness::Dead => match probe {
            Some(outcome) if outcome.reachable => EffectiveStatus::Fault,
            _ => EffectiveStatus::Offline,
        },
        HeartbeatFreshness::Stale => match probe {
            Some(outcome) if outcome.reachable => EffectiveStatus::Online,
            Some(_) => EffectiveStatus::Offline,
            None => EffectiveStatus::Stale,
        },
        HeartbeatFreshness::Fresh => match probe {
            Some(outcome) if !outcome.reachable => EffectiveStatus::Fault,
            _ => EffectiveStatus::Online,
        },
    }
}
