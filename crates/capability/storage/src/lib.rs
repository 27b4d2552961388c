//! 心跳存储能力
//!
//! 持有权威的设备记录集合，提供：
//! - HeartbeatStore：合并写入（upsert）、全量快照、单台查找、快照订阅
//! - JsonFileHeartbeatStore：JSON 文件持久化实现（原子落盘、损坏自恢复）
//! - InMemoryHeartbeatStore：内存实现（测试与本地演示）
//! - debounced：把快照订阅流防抖成 mpsc 流
//!
//! 设计原则：
//! - 记录只通过 upsert 变更，核心不删除设备
//! - 锁只覆盖内存合并与落盘，绝不跨网络 I/O
//! - 所有接口返回 StorageError

pub mod error;
pub mod models;
pub mod traits;

mod in_memory;
mod json_file;
mod subscribe;

pub use error::StorageError;
pub use in_memory::InMemoryHeartbeatStore;
pub use json_file::JsonFileHeartbeatStore;
pub use models::{DeviceRecord, HeartbeatReport};
pub use subscribe::debounced;
pub use traits::HeartbeatStore;
