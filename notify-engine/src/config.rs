//! 处理器配置
//!
//! 可通过 `ProcessorConfig::builder()` 构建，也可借助任意 serde 数据源反序列化，
//! 缺省字段取默认值。
//!
use crate::error::{EngineError, EngineResult};
use bon::Builder;
use serde::Deserialize;

/// 历史中保留的事件总数上限（默认）
pub const DEFAULT_HISTORY_CAPACITY: usize = 120;

/// 邮箱可排队的消息数（默认）
pub const DEFAULT_MAILBOX_CAPACITY: usize = 1;

/// 事件处理器配置
#[derive(Builder, Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// 历史中保留的事件总数上限（按批次整体淘汰）
    #[builder(default = DEFAULT_HISTORY_CAPACITY)]
    pub history_capacity: usize,
    /// 等待处理器接收的消息排队数；每条消息仍需处理器确认接收后调用方才返回
    #[builder(default = DEFAULT_MAILBOX_CAPACITY)]
    pub mailbox_capacity: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}

impl ProcessorConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.history_capacity == 0 {
            return Err(EngineError::invalid_config("history_capacity must be > 0"));
        }
        if self.mailbox_capacity == 0 {
            return Err(EngineError::invalid_config("mailbox_capacity must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        assert_eq!(ProcessorConfig::builder().build(), ProcessorConfig::default());
        assert_eq!(ProcessorConfig::default().history_capacity, 120);
    }

    #[test]
    fn zero_capacities_are_rejected() {
        let cfg = ProcessorConfig::builder().history_capacity(0).build();
        assert!(matches!(
            cfg.validate(),
            Err(EngineError::InvalidConfig { .. })
        ));

        let cfg = ProcessorConfig::builder().mailbox_capacity(0).build();
        assert!(cfg.validate().is_err());

        assert!(ProcessorConfig::default().validate().is_ok());
    }

    #[test]
    fn deserialize_fills_missing_fields() {
        let cfg: ProcessorConfig = serde_json::from_str(r#"{"history_capacity":10}"#).unwrap();
        assert_eq!(cfg.history_capacity, 10);
        assert_eq!(cfg.mailbox_capacity, DEFAULT_MAILBOX_CAPACITY);
    }
}
