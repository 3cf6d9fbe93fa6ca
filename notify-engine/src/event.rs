//! 事件与事件批次
//!
//! `Event` 是带标识、负载不透明的数据单元；事件总是以 `EventBatch` 为单位提交与存储，
//! 批次也是历史淘汰的原子单位。
//!
use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// 事件标识（由调用方提供，不保证唯一）
pub type EventId = i64;

/// 事件：创建后不可变
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    payload: String,
}

impl Event {
    pub fn new(id: EventId, payload: impl Into<String>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// 事件批次：一次提交的、非空且有序的事件序列
///
/// # 示例
///
/// ```
/// use notify_engine::event::{Event, EventBatch};
///
/// let batch = EventBatch::new(vec![Event::new(1, "x"), Event::new(2, "y")]).unwrap();
/// assert_eq!(batch.len(), 2);
/// assert_eq!(batch.find(2).map(Event::payload), Some("y"));
///
/// assert!(EventBatch::new(Vec::new()).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventBatch {
    events: Vec<Event>,
}

impl EventBatch {
    /// 创建批次；空批次属于调用方契约违背，直接拒绝
    pub fn new(events: Vec<Event>) -> EngineResult<Self> {
        if events.is_empty() {
            return Err(EngineError::EmptyBatch);
        }
        Ok(Self { events })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// 恒为 false，保留以配合 `len`
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// 按提交顺序返回第一个标识匹配的事件
    pub fn find(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }
}

impl TryFrom<Vec<Event>> for EventBatch {
    type Error = EngineError;

    fn try_from(events: Vec<Event>) -> EngineResult<Self> {
        Self::new(events)
    }
}

impl<'a> IntoIterator for &'a EventBatch {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

// 反序列化同样经过非空校验
impl<'de> Deserialize<'de> for EventBatch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            events: Vec<Event>,
        }

        let raw = Raw::deserialize(deserializer)?;
        EventBatch::new(raw.events).map_err(serde::de::Error::custom)
    }
}
