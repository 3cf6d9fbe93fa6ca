//! 事件处理器（processor）
//!
//! 以 actor 方式实现的事件通知引擎：
//! - `EventProcessorActor`：独占历史与订阅状态的串行分发循环；
//! - `ProcessorHandle`：对外门面，实现 `EventProcessor` 协议；
//! - 历史存储按事件总数整批淘汰，订阅每次至多命中一次。
//!
//! 所有状态变更仅发生在分发循环内，调用方只通过消息与一次性回复通道交互，无需加锁。
//!
mod actor;
mod handle;
mod history;
mod registry;

pub use actor::EventProcessorActor;
pub use handle::{EventProcessor, OnMatch, ProcessorHandle};
