//! 心跳 JSON 文件存储实现
//!
//! 权威实现：设备集合整体序列化为一个 JSON 文件。
//!
//! - 读取兼容两种布局：裸数组 `[...]` 与 `{"devices":[...]}`
//! - 写出固定为 `{"devices":[...]}`
//! - 落盘走临时文件 + sync_all + rename，写一半不会留下损坏状态
//! - 启动时文件损坏或不可读：告警并按空库启动，不致命

use crate::error::StorageError;
use crate::models::{DeviceRecord, HeartbeatReport};
use crate::traits::HeartbeatStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, watch};
use tracing::warn;

/// 持久化布局。读取端两种都认，写出端只用 `Wrapped`。
#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedLayout {
    Wrapped { devices: Vec<DeviceRecord> },
    Bare(Vec<DeviceRecord>),
}

impl PersistedLayout {
    fn into_records(self) -> Vec<DeviceRecord> {
        match self {
            PersistedLayout::Wrapped { devices } => devices,
            PersistedLayout::Bare(devices) => devices,
        }
    }
}

#[derive(Serialize)]
struct PersistedState<'a> {
    devices: &'a [DeviceRecord],
}

/// 心跳 JSON 文件存储
///
/// 锁覆盖内存合并与落盘；同一设备 id 的 upsert 由此线性化。
pub struct JsonFileHeartbeatStore {
    path: PathBuf,
    inner: Mutex<HashMap<String, DeviceRecord>>,
    snapshots: watch::Sender<Arc<Vec<DeviceRecord>>>,
}

impl JsonFileHeartbeatStore {
    /// 打开（或新建）状态文件。
    ///
    /// 文件不存在按空库处理；存在但损坏或不可读，告警后同样按空库处理。
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let map = load_state(&path).await;
        let (snapshots, _) = watch::channel(Arc::new(snapshot_of(&map)));
        Ok(Self {
            path,
            inner: Mutex::new(map),
            snapshots,
        })
    }

    async fn flush(&self, snapshot: &[DeviceRecord]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(&PersistedState { devices: snapshot })?;
        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl HeartbeatStore for JsonFileHeartbeatStore {
    async fn upsert(&self, report: HeartbeatReport) -> Result<DeviceRecord, StorageError> {
        let mut map = self.inner.lock().await;
        let merged = DeviceRecord::merged(
            map.get(&report.device_id).cloned(),
            report,
            domain::now_epoch_ms(),
        );
        map.insert(merged.device_id.clone(), merged.clone());
        let snapshot = snapshot_of(&map);
        self.flush(&snapshot).await?;
        let _ = self.snapshots.send(Arc::new(snapshot));
        Ok(merged)
    }

    async fn read_all(&self) -> Result<Vec<DeviceRecord>, StorageError> {
        let map = self.inner.lock().await;
        Ok(snapshot_of(&map))
    }

    async fn find(&self, device_id: &str) -> Result<Option<DeviceRecord>, StorageError> {
        let map = self.inner.lock().await;
        Ok(map.get(device_id).cloned())
    }

    fn subscribe(&self) -> watch::Receiver<Arc<Vec<DeviceRecord>>> {
        self.snapshots.subscribe()
    }
}

async fn load_state(path: &Path) -> HashMap<String, DeviceRecord> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return HashMap::new(),
        Err(err) => {
            warn!(
                target: "gms.storage",
                path = %path.display(),
                error = %err,
                "state file unreadable, starting empty"
            );
            return HashMap::new();
        }
    };
    match serde_json::from_slice::<PersistedLayout>(&bytes) {
        Ok(layout) => layout
            .into_records()
            .into_iter()
            .map(|record| (record.device_id.clone(), record))
            .collect(),
        Err(err) => {
            warn!(
                target: "gms.storage",
                path = %path.display(),
                error = %err,
                "state file corrupt, starting empty"
            );
            HashMap::new()
        }
    }
}

fn snapshot_of(map: &HashMap<String, DeviceRecord>) -> Vec<DeviceRecord> {
    let mut records: Vec<DeviceRecord> = map.values().cloned().collect();
    records.sort_by(|a, b| a.device_id.cmp(&b.device_id));
    records
}
