//! 处理器句柄（ProcessorHandle）
//!
//! 对外门面：把调用翻译为邮箱消息，并通过每次调用独立创建的一次性通道等待结果。
//! 句柄本身不接触任何共享状态，可自由克隆给多个生产者与消费者。
//!
use super::actor::Envelope;
use super::registry::Subscription;
use crate::error::{EngineError, EngineResult};
use crate::event::{Event, EventBatch, EventId};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// 订阅命中后的回调，每次订阅至多调用一次
pub type OnMatch = Box<dyn FnOnce(Event) + Send + 'static>;

/// 事件处理器协议
#[async_trait]
pub trait EventProcessor: Send + Sync {
    /// 提交一个批次；挂起直到处理器接收该消息（而非处理完成）
    async fn submit_events(&self, batch: EventBatch) -> EngineResult<()>;

    /// 订阅并等待匹配事件；无超时，事件不出现则一直等待
    async fn subscribe(&self, id: EventId) -> EngineResult<Event>;

    /// 订阅后立即返回，由独立任务等待事件并调用 `on_match`
    async fn subscribe_and_then(&self, id: EventId, on_match: OnMatch) -> EngineResult<()>;

    /// 请求处理器退出，不等待确认
    fn stop(&self);
}

#[derive(Clone, Debug)]
pub struct ProcessorHandle {
    mailbox: mpsc::Sender<Envelope>,
    shutdown: CancellationToken,
}

impl ProcessorHandle {
    pub(crate) fn new(mailbox: mpsc::Sender<Envelope>, shutdown: CancellationToken) -> Self {
        Self { mailbox, shutdown }
    }

    /// 是否已请求停止或处理器已退出
    pub fn is_stopped(&self) -> bool {
        self.shutdown.is_cancelled() || self.mailbox.is_closed()
    }

    /// 等待处理器循环退出并释放其状态
    pub async fn closed(&self) {
        self.mailbox.closed().await
    }

    /// 带超时的订阅（可选扩展）；超时后订阅被放弃，不会再消耗事件
    pub async fn subscribe_timeout(&self, id: EventId, timeout: Duration) -> EngineResult<Event> {
        match tokio::time::timeout(timeout, self.subscribe(id)).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout {
                id,
                waited: timeout,
            }),
        }
    }

    async fn deliver(
        &self,
        envelope: Envelope,
        accepted: oneshot::Receiver<()>,
    ) -> EngineResult<()> {
        if self.shutdown.is_cancelled() {
            return Err(EngineError::Stopped);
        }
        self.mailbox
            .send(envelope)
            .await
            .map_err(|_| EngineError::Stopped)?;
        // 处理器在取走消息前退出时确认端被丢弃
        accepted.await.map_err(|_| EngineError::Stopped)
    }

    async fn register(&self, id: EventId) -> EngineResult<oneshot::Receiver<Event>> {
        let (sink, notified) = oneshot::channel();
        let (accepted_tx, accepted_rx) = oneshot::channel();
        let envelope = Envelope::Subscribe {
            subscription: Subscription::new(id, sink),
            accepted: accepted_tx,
        };
        self.deliver(envelope, accepted_rx).await?;
        Ok(notified)
    }
}

#[async_trait]
impl EventProcessor for ProcessorHandle {
    async fn submit_events(&self, batch: EventBatch) -> EngineResult<()> {
        let (accepted_tx, accepted_rx) = oneshot::channel();
        let envelope = Envelope::Submit {
            batch,
            accepted: accepted_tx,
        };
        self.deliver(envelope, accepted_rx).await
    }

    async fn subscribe(&self, id: EventId) -> EngineResult<Event> {
        let notified = self.register(id).await?;
        // 处理器退出时待命中订阅随之丢弃
        notified.await.map_err(|_| EngineError::Stopped)
    }

    async fn subscribe_and_then(&self, id: EventId, on_match: OnMatch) -> EngineResult<()> {
        let notified = self.register(id).await?;
        tokio::spawn(async move {
            match notified.await {
                Ok(event) => on_match(event),
                Err(_) => warn!(id, "processor stopped before subscription resolved"),
            }
        });
        Ok(())
    }

    fn stop(&self) {
        self.shutdown.cancel();
    }
}
