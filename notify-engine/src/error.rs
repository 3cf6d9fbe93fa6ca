//! 事件通知引擎统一错误定义
//!
//! 引擎本身没有 I/O，也没有部分失败路径，错误集合因此很窄：
//! 调用方契约违背（空批次、非法配置）、处理器已停止、以及可选的等待超时。
//!
use crate::event::EventId;
use std::time::Duration;
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    // --- 调用方契约 ---
    #[error("event batch must contain at least one event")]
    EmptyBatch,
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    // --- 运行时 ---
    #[error("processor stopped")]
    Stopped,
    #[error("subscription timed out: id={id}, waited={waited:?}")]
    Timeout { id: EventId, waited: Duration },
}

impl EngineError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
