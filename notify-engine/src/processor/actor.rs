//! 事件处理器 actor（EventProcessorActor）
//!
//! 单一串行任务独占历史存储与订阅登记表，所有状态变更都在分发循环中完成：
//! - 提交批次：追加到历史并与待命中订阅匹配，二者对其他调用方原子可见；
//! - 订阅：历史中已有则立即投递，否则登记为待命中；
//! - 关闭：退出循环并释放全部状态，之后的调用一律得到 `EngineError::Stopped`。
//!
use super::handle::ProcessorHandle;
use super::history::HistoryStore;
use super::registry::{Subscription, SubscriptionRegistry};
use crate::config::ProcessorConfig;
use crate::error::EngineResult;
use crate::event::EventBatch;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// 邮箱中的消息，携带处理器接收确认
#[derive(Debug)]
pub(crate) enum Envelope {
    Submit {
        batch: EventBatch,
        accepted: oneshot::Sender<()>,
    },
    Subscribe {
        subscription: Subscription,
        accepted: oneshot::Sender<()>,
    },
}

impl Envelope {
    /// 确认接收并拆出消息体
    fn accept(self) -> Message {
        match self {
            Envelope::Submit { batch, accepted } => {
                let _ = accepted.send(());
                Message::Submit(batch)
            }
            Envelope::Subscribe {
                subscription,
                accepted,
            } => {
                let _ = accepted.send(());
                Message::Subscribe(subscription)
            }
        }
    }
}

/// 分发步骤处理的三类消息
#[derive(Debug)]
enum Message {
    Submit(EventBatch),
    Subscribe(Subscription),
    Shutdown,
}

pub struct EventProcessorActor {
    history: HistoryStore,
    registry: SubscriptionRegistry,
    mailbox: mpsc::Receiver<Envelope>,
    shutdown: CancellationToken,
}

impl EventProcessorActor {
    /// 校验配置并在当前 tokio 运行时中启动处理器，返回对外句柄
    pub fn start(config: ProcessorConfig) -> EngineResult<ProcessorHandle> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.mailbox_capacity);
        let shutdown = CancellationToken::new();

        let actor = Self {
            history: HistoryStore::new(config.history_capacity),
            registry: SubscriptionRegistry::new(),
            mailbox: rx,
            shutdown: shutdown.clone(),
        };

        info!(
            history_capacity = config.history_capacity,
            mailbox_capacity = config.mailbox_capacity,
            "event processor started"
        );
        tokio::spawn(actor.run());

        Ok(ProcessorHandle::new(tx, shutdown))
    }

    async fn run(mut self) {
        loop {
            let message = tokio::select! {
                _ = self.shutdown.cancelled() => Message::Shutdown,
                envelope = self.mailbox.recv() => match envelope {
                    Some(envelope) => envelope.accept(),
                    // 所有句柄均已释放
                    None => Message::Shutdown,
                },
            };

            if !self.dispatch(message) {
                break;
            }
        }

        info!(
            pending_subscriptions = self.registry.len(),
            retained_events = self.history.event_count(),
            "event processor stopped"
        );
        // self 在此释放：待命中订阅与排队消息的发送端一并丢弃，邮箱随之关闭
    }

    /// 处理一条消息；返回 false 表示应退出循环
    fn dispatch(&mut self, message: Message) -> bool {
        match message {
            Message::Submit(batch) => {
                debug!(events = batch.len(), "actor received event batch");
                // 匹配与追加在同一分发步骤内完成，对其他调用方不可分割
                if !self.registry.is_empty() {
                    let resolved = self.registry.resolve_against(&batch);
                    debug!(
                        resolved,
                        pending = self.registry.len(),
                        "batch matched against subscriptions"
                    );
                }
                self.history.append(batch);
                true
            }
            Message::Subscribe(subscription) => {
                debug!(id = subscription.id, "actor received subscription");
                match self.history.find_first(subscription.id) {
                    Some(event) => {
                        let _ = subscription.resolve(event);
                    }
                    None => {
                        debug!(
                            id = subscription.id,
                            retained_batches = self.history.batch_count(),
                            capacity = self.history.capacity(),
                            "no match in history, subscription pending"
                        );
                        self.registry.add_pending(subscription);
                    }
                }
                true
            }
            Message::Shutdown => {
                info!("actor shutting down");
                false
            }
        }
    }
}
