//! 存储层错误类型
//!
//! 封装底层错误：
//! - 状态文件读写错误
//! - 记录序列化错误
//! - 锁中毒（持锁线程 panic）

/// 存储层错误。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("lock poisoned")]
    LockPoisoned,
}
