//! 内存事件通知引擎（notify-engine）
//!
//! 生产者按批次提交带标识的事件；消费者登记对某个事件标识的兴趣，
//! 在保留的历史或之后的提交中出现匹配事件时恰好收到一次通知。
//!
//! - 事件与批次（`event`）
//! - 处理器 actor、句柄与 `EventProcessor` 协议（`processor`）
//! - 配置（`config`）与统一错误（`error`）
//!
//! 所有可变状态由单一 actor 独占，调用方只通过消息传递交互，无需显式加锁。
//!
//! 典型用法：
//! 1. 在 tokio 运行时中调用 `EventProcessorActor::start` 获得 `ProcessorHandle`；
//! 2. 生产者调用 `submit_events` 提交批次；
//! 3. 消费者调用 `subscribe`（等待）或 `subscribe_and_then`（回调）；
//! 4. 结束时调用 `stop`，可通过 `closed` 等待处理器释放状态。
//!
pub mod config;
pub mod error;
pub mod event;
pub mod processor;

pub use config::ProcessorConfig;
pub use error::{EngineError, EngineResult};
pub use event::{Event, EventBatch, EventId};
pub use processor::{EventProcessor, EventProcessorActor, OnMatch, ProcessorHandle};
