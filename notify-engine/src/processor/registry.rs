//! 订阅登记表（SubscriptionRegistry）
//!
//! 保存尚未命中的订阅，按登记顺序排列。仅由处理器 actor 持有与调用。
//!
use crate::event::{Event, EventBatch, EventId};
use tokio::sync::oneshot;
use tracing::{debug, trace};

/// 订阅：目标事件标识 + 一次性通知通道
#[derive(Debug)]
pub(crate) struct Subscription {
    pub(crate) id: EventId,
    pub(crate) sink: oneshot::Sender<Event>,
}

impl Subscription {
    pub(crate) fn new(id: EventId, sink: oneshot::Sender<Event>) -> Self {
        Self { id, sink }
    }

    /// 投递事件并结束该订阅；等待方已离开时退回事件
    pub(crate) fn resolve(self, event: &Event) -> Result<(), Event> {
        let id = self.id;
        self.sink.send(event.clone()).inspect_err(|_| {
            debug!(id, "subscriber went away before delivery");
        })?;
        trace!(id, "subscription resolved");
        Ok(())
    }

    fn is_abandoned(&self) -> bool {
        self.sink.is_closed()
    }
}

#[derive(Default)]
pub(crate) struct SubscriptionRegistry {
    pending: Vec<Subscription>,
}

impl SubscriptionRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_pending(&mut self, subscription: Subscription) {
        self.prune_abandoned();
        self.pending.push(subscription);
    }

    /// 以批次内事件为主序、登记顺序为次序进行匹配；
    /// 每个事件至多结束一个订阅，返回本批结束的订阅数
    pub(crate) fn resolve_against(&mut self, batch: &EventBatch) -> usize {
        self.prune_abandoned();

        let mut resolved = 0;
        for event in batch {
            if self.pending.is_empty() {
                break;
            }
            if self.resolve_first(event) {
                resolved += 1;
            }
        }
        resolved
    }

    /// 按登记顺序把事件交给第一个仍在等待的匹配订阅；
    /// 投递时才发现等待方已离开的订阅被移除，事件继续尝试下一个匹配
    fn resolve_first(&mut self, event: &Event) -> bool {
        while let Some(pos) = self.pending.iter().position(|s| s.id == event.id()) {
            // 保持其余订阅的登记顺序
            if self.pending.remove(pos).resolve(event).is_ok() {
                return true;
            }
        }
        false
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// 等待方已丢弃接收端的订阅不再参与匹配
    fn prune_abandoned(&mut self) {
        let before = self.pending.len();
        self.pending.retain(|s| !s.is_abandoned());
        let pruned = before - self.pending.len();
        if pruned > 0 {
            debug!(pruned, "dropped abandoned subscriptions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot::error::TryRecvError;

    fn subscribe(registry: &mut SubscriptionRegistry, id: EventId) -> oneshot::Receiver<Event> {
        let (tx, rx) = oneshot::channel();
        registry.add_pending(Subscription::new(id, tx));
        rx
    }

    fn batch(events: &[(EventId, &str)]) -> EventBatch {
        EventBatch::new(events.iter().map(|(id, p)| Event::new(*id, *p)).collect()).unwrap()
    }

    #[test]
    fn resolves_matching_subscriptions_and_removes_them() {
        let mut registry = SubscriptionRegistry::new();
        let mut r42 = subscribe(&mut registry, 42);
        let mut r7 = subscribe(&mut registry, 7);

        let n = registry.resolve_against(&batch(&[(41, "a"), (42, "b")]));
        assert_eq!(n, 1);
        assert_eq!(r42.try_recv(), Ok(Event::new(42, "b")));
        assert_eq!(r7.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(registry.len(), 1);

        // 已结束的订阅不会再次命中
        assert_eq!(registry.resolve_against(&batch(&[(42, "c")])), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn one_event_resolves_at_most_one_subscription() {
        let mut registry = SubscriptionRegistry::new();
        let mut first = subscribe(&mut registry, 5);
        let mut second = subscribe(&mut registry, 5);

        assert_eq!(registry.resolve_against(&batch(&[(5, "one")])), 1);
        assert_eq!(first.try_recv(), Ok(Event::new(5, "one")));
        assert_eq!(second.try_recv(), Err(TryRecvError::Empty));

        assert_eq!(registry.resolve_against(&batch(&[(5, "two")])), 1);
        assert_eq!(second.try_recv(), Ok(Event::new(5, "two")));
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_events_in_one_batch_resolve_duplicate_subscriptions_in_order() {
        let mut registry = SubscriptionRegistry::new();
        let mut first = subscribe(&mut registry, 3);
        let mut other = subscribe(&mut registry, 8);
        let mut second = subscribe(&mut registry, 3);

        let n = registry.resolve_against(&batch(&[(3, "p"), (8, "q"), (3, "r")]));
        assert_eq!(n, 3);
        assert_eq!(first.try_recv(), Ok(Event::new(3, "p")));
        assert_eq!(other.try_recv(), Ok(Event::new(8, "q")));
        assert_eq!(second.try_recv(), Ok(Event::new(3, "r")));
    }

    #[test]
    fn subscriber_gone_at_delivery_passes_event_to_next_match() {
        let mut registry = SubscriptionRegistry::new();
        let mut live = subscribe(&mut registry, 7);
        let gone = subscribe(&mut registry, 7);
        let mut other = subscribe(&mut registry, 8);

        // 登记后再把已关闭的订阅移到最前，绕过登记与匹配前的清理，直达投递失败分支
        drop(gone);
        let closed = registry.pending.remove(1);
        registry.pending.insert(0, closed);

        assert!(registry.resolve_first(&Event::new(7, "x")));
        assert_eq!(live.try_recv(), Ok(Event::new(7, "x")));
        assert_eq!(other.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(registry.len(), 1);

        // 只剩已离开的等待方时，事件不算命中
        let gone = subscribe(&mut registry, 9);
        drop(gone);
        assert!(!registry.resolve_first(&Event::new(9, "y")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn add_pending_drops_abandoned_subscriptions() {
        let mut registry = SubscriptionRegistry::new();
        for id in 0..100 {
            drop(subscribe(&mut registry, id));
        }
        let _live = subscribe(&mut registry, 1_000);

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn abandoned_subscription_does_not_consume_event() {
        let mut registry = SubscriptionRegistry::new();
        let dropped = subscribe(&mut registry, 1);
        let mut live = subscribe(&mut registry, 1);
        drop(dropped);

        assert_eq!(registry.resolve_against(&batch(&[(1, "x")])), 1);
        assert_eq!(live.try_recv(), Ok(Event::new(1, "x")));
        assert!(registry.is_empty());
    }
}
