mod ring_buffer;

use anyhow::{Context, Result as AnyResult};
use notify_engine::{
    Event, EventBatch, EventId, EventProcessor, EventProcessorActor, ProcessorConfig,
    ProcessorHandle,
};
use rand::Rng;
use ring_buffer::RingBuffer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const ROUNDS: usize = 50;
const SEEN_IDS: usize = 50;

/// 以 NOTIFY_LOG 初始化日志，缺省为 info
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("NOTIFY_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// 从 NOTIFY_* 环境变量加载处理器配置，例如 NOTIFY_HISTORY_CAPACITY=64
fn load_config() -> AnyResult<ProcessorConfig> {
    let config = config::Config::builder()
        .add_source(config::Environment::with_prefix("NOTIFY").try_parsing(true))
        .build()
        .context("read NOTIFY_* environment")?
        .try_deserialize::<ProcessorConfig>()
        .context("parse processor config")?;
    Ok(config)
}

fn create_event(rng: &mut impl Rng) -> Event {
    let payload: String = (0..5).map(|_| Uuid::new_v4().to_string()).collect();
    Event::new(rng.random::<EventId>(), payload)
}

fn create_batch(rng: &mut impl Rng) -> AnyResult<EventBatch> {
    let size = rng.random_range(5..10);
    let events = (0..size).map(|_| create_event(rng)).collect();
    Ok(EventBatch::new(events)?)
}

async fn subscribe(processor: &ProcessorHandle, id: EventId) -> AnyResult<()> {
    processor
        .subscribe_and_then(
            id,
            Box::new(|event: Event| {
                info!(id = event.id(), data = event.payload(), "client received event data")
            }),
        )
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    init_tracing();

    let config = load_config()?;
    let processor = EventProcessorActor::start(config)?;
    let mut seen = RingBuffer::<EventId>::new(SEEN_IDS);
    let mut rng = rand::rng();

    for _ in 0..ROUNDS {
        let batch = create_batch(&mut rng)?;
        seen.add(batch.iter().map(Event::id));

        let fresh = batch.events()[rng.random_range(0..batch.len())].id();
        subscribe(&processor, fresh).await?;
        processor.submit_events(batch).await?;

        let earlier = seen
            .get(rng.random_range(0..seen.len()))
            .copied()
            .context("ring buffer is empty")?;
        subscribe(&processor, earlier).await?;
    }

    processor.stop();
    processor.closed().await;
    info!("demo finished");
    Ok(())
}
