//! 心跳内存存储实现
//!
//! 仅用于测试和本地演示，不持久化。
//!
//! 使用 RwLock + HashMap 提供线程安全的内存存储，
//! 快照订阅行为与文件实现一致。

use crate::error::StorageError;
use crate::models::{DeviceRecord, HeartbeatReport};
use crate::traits::HeartbeatStore;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

/// 心跳内存存储
pub struct InMemoryHeartbeatStore {
    inner: RwLock<HashMap<String, DeviceRecord>>,
    snapshots: watch::Sender<Arc<Vec<DeviceRecord>>>,
}

impl InMemoryHeartbeatStore {
    /// 创建空的内存存储
    pub fn new() -> Self {
        let (snapshots, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            inner: RwLock::new(HashMap::new()),
            snapshots,
        }
    }
}

impl Default for InMemoryHeartbeatStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HeartbeatStore for InMemoryHeartbeatStore {
    async fn upsert(&self, report: HeartbeatReport) -> Result<DeviceRecord, StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        let merged = DeviceRecord::merged(
            map.get(&report.device_id).cloned(),
            report,
            domain::now_epoch_ms(),
        );
        map.insert(merged.device_id.clone(), merged.clone());
        let _ = self.snapshots.send(Arc::new(snapshot_of(&map)));
        Ok(merged)
    }

    async fn read_all(&self) -> Result<Vec<DeviceRecord>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(snapshot_of(&map))
    }

    async fn find(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(map.get(device_id).cloned())
    }

    fn subscribe(&self) -> watch::Receiver<Arc<Vec<DeviceRecord>>> {
        self.snapshots.subscribe()
    }
}

fn snapshot_of(map: &HashMap<String, DeviceRecord>) -> Vec<DeviceRecord> {
    let mut records: Vec<DeviceRecord> = map.values().cloned().collect();
    records.sort_by(|a, b| a.device_id.cmp(&b.device_id));
    records
}
