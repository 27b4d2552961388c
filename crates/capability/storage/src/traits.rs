//! 存储接口 Trait 定义
//!
//! 设计原则：
//! - 同一设备 id 的 upsert 线性化，不同 id 互不阻塞排序
//! - 读取面拿到的永远是不可变快照
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::models::{DeviceRecord, HeartbeatReport};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// 心跳存储接口
///
/// 持有权威设备记录集合；所有变更经由 upsert 合并写入。
#[async_trait]
pub trait HeartbeatStore: Send + Sync {
    /// 合并写入一条心跳上报，返回合并后的记录。
    ///
    /// 上报缺 ts 时由存储补当前时间；返回前完成持久化。
    async fn upsert(&self, report: HeartbeatReport) -> Result<DeviceRecord, StorageError>;

    /// 读取全量设备记录的时间点快照。
    async fn read_all(&self) -> Result<Vec<DeviceRecord>, StorageError>;

    /// 查找单台设备。
    async fn find(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError>;

    /// 订阅快照流：每次应用 upsert 后推送一份不可变全量快照。
    ///
    /// 防抖是订阅方的策略，见 [`crate::debounced`]。
    fn subscribe(&self) -> watch::Receiver<Arc<Vec<DeviceRecord>>>;
}
