//! 状态融合能力
//!
//! 把设备自报状态、心跳年龄与网络探测结果合成一个有效状态：
//! - fusion：纯融合策略（固定优先级，先匹配者定案）
//! - evaluator：按需并发探测并套用融合策略的评估器
//!
//! 有效状态是派生值，每次查询现算，本层不缓存。

mod evaluator;
mod fusion;

pub use evaluator::{DeviceStatus, StatusEvaluator};
pub use fusion::{FusionThresholds, HeartbeatFreshness, fuse};
