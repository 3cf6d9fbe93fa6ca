/// 事件通知引擎（内存版）示例
/// 展示历史命中、延迟命中、回调订阅与关闭后的调用结果
use anyhow::Result as AnyResult;
use notify_engine::{
    EngineError, Event, EventBatch, EventProcessor, EventProcessorActor, ProcessorConfig,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> AnyResult<()> {
    let processor =
        EventProcessorActor::start(ProcessorConfig::builder().history_capacity(10).build())?;

    // 历史命中
    processor
        .submit_events(EventBatch::new(vec![Event::new(1, "x"), Event::new(2, "y")])?)
        .await?;
    let event = processor.subscribe(1).await?;
    println!("from history: {event:?}");

    // 回调订阅，之后的提交触发
    processor
        .subscribe_and_then(
            42,
            Box::new(|event: Event| println!("callback received: {}", event.payload())),
        )
        .await?;
    processor
        .submit_events(EventBatch::new(vec![Event::new(41, "a"), Event::new(42, "b")])?)
        .await?;

    // 超时订阅
    match processor.subscribe_timeout(7, Duration::from_millis(50)).await {
        Err(EngineError::Timeout { id, waited }) => println!("id {id} not seen within {waited:?}"),
        other => println!("unexpected: {other:?}"),
    }

    processor.stop();
    processor.closed().await;
    println!("after stop: {:?}", processor.subscribe(1).await);

    Ok(())
}
