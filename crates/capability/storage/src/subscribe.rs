//! 快照订阅的防抖辅助
//!
//! 文件监听式的「外部变更推送」在这里收敛为显式订阅：
//! 消费方拿 [`HeartbeatStore::subscribe`] 的 watch 流，需要合并
//! 密集写入时套一层 [`debounced`]。防抖窗口是订阅方的策略，
//! 不属于存储本身。

use crate::models::DeviceRecord;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// 把 watch 快照流防抖成 mpsc 流。
///
/// 每收到一次变更后再等 `window`，窗口内的后续写入只保留最后一份快照。
/// 存储端（watch 发送方）或消费端任一 drop，后台任务随之结束，
/// 不留定时器和通道。
pub fn debounced(
    mut snapshots: watch::Receiver<Arc<Vec<DeviceRecord>>>,
    window: Duration,
) -> mpsc::Receiver<Arc<Vec<DeviceRecord>>> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            // 等窗口内的写入落定，只取最后一份
            loop {
                match tokio::time::timeout(window, snapshots.changed()).await {
                    Ok(Ok(())) => continue,
                    Ok(Err(_)) => break,
                    Err(_) => break,
                }
            }
            let snapshot = snapshots.borrow_and_update().clone();
            if tx.send(snapshot).await.is_err() {
                return;
            }
        }
    });
    rx
}
