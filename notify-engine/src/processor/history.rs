//! 历史存储（HistoryStore）
//!
//! 按提交顺序保存事件批次（最旧在前），以事件总数为上限、按整批从最旧端淘汰。
//! 仅由处理器 actor 持有与调用。
//!
use crate::event::{Event, EventBatch, EventId};
use std::collections::VecDeque;
use tracing::debug;

pub(crate) struct HistoryStore {
    batches: VecDeque<EventBatch>,
    event_count: usize,
    capacity: usize,
}

impl HistoryStore {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            batches: VecDeque::new(),
            event_count: 0,
            capacity,
        }
    }

    /// 追加批次，并从最旧端整批淘汰直到总数不超过上限；返回淘汰的批次数
    ///
    /// 被淘汰批次可能大于超出量，此时总数会低于上限。
    pub(crate) fn append(&mut self, batch: EventBatch) -> usize {
        self.event_count += batch.len();
        self.batches.push_back(batch);

        let mut evicted = 0;
        while self.event_count > self.capacity {
            let Some(oldest) = self.batches.pop_front() else {
                break;
            };
            self.event_count -= oldest.len();
            evicted += 1;
        }

        if evicted > 0 {
            debug!(
                evicted,
                retained_batches = self.batches.len(),
                retained_events = self.event_count,
                "history trimmed"
            );
        }
        evicted
    }

    /// 由旧到新扫描批次、批内按提交顺序扫描事件，返回首个匹配
    pub(crate) fn find_first(&self, id: EventId) -> Option<&Event> {
        self.batches.iter().find_map(|batch| batch.find(id))
    }

    pub(crate) fn event_count(&self) -> usize {
        self.event_count
    }

    pub(crate) fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &EventBatch> {
        self.batches.iter()
    }
}
