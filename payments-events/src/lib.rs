//! # Payments Events
//!
//! Publisher adapters that implement the `EventPublisher` port.
//!
//! - `kafka` (feature `kafka`) - rdkafka producer with topic provisioning
//! - `memory` - in-process publisher for local runs and tests

use std::time::Duration;

use async_trait::async_trait;
use payments_types::{EventPublisher, PaymentEvent, PublishError, TopicSpec};

#[cfg(feature = "kafka")]
pub mod kafka;
pub mod memory;

#[cfg(feature = "kafka")]
pub use kafka::KafkaPublisher;
pub use memory::{InMemoryPublisher, PublishedMessage};

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherSettings {
    pub brokers: Vec<String>,
    pub client_id: String,
    /// Broker acknowledgement level (`all`, `1`, `0`).
    pub acks: String,
    /// Upper bound for one delivery attempt, including the broker ack.
    pub delivery_timeout: Duration,
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:9092".to_string()],
            client_id: "payments-service".to_string(),
            acks: "all".to_string(),
            delivery_timeout: Duration::from_secs(5),
        }
    }
}

/// Publisher selected at compile time: Kafka with the `kafka` feature,
/// otherwise the in-memory publisher.
pub struct Publisher {
    #[cfg(feature = "kafka")]
    inner: kafka::KafkaPublisher,
    #[cfg(not(feature = "kafka"))]
    inner: memory::InMemoryPublisher,
}

/// Builds the publisher and provisions the `payment.events` topic.
///
/// Provisioning failures are logged and do not fail construction; a broken
/// broker shows up later as failed publishes.
pub async fn build_publisher(settings: &PublisherSettings) -> anyhow::Result<Publisher> {
    Publisher::new(settings).await
}

impl Publisher {
    #[cfg(feature = "kafka")]
    pub async fn new(settings: &PublisherSettings) -> anyhow::Result<Self> {
        let inner = kafka::KafkaPublisher::connect(settings, &[TopicSpec::payment_events()]).await?;
        Ok(Self { inner })
    }

    #[cfg(not(feature = "kafka"))]
    pub async fn new(settings: &PublisherSettings) -> anyhow::Result<Self> {
        tracing::warn!(
            brokers = ?settings.brokers,
            "Built without the `kafka` feature; events are kept in memory"
        );
        let inner = memory::InMemoryPublisher::new();
        if let Err(e) = inner.ensure_topic(&TopicSpec::payment_events()).await {
            tracing::warn!("Failed to provision topic: {}", e);
        }
        Ok(Self { inner })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement EventPublisher for Publisher (delegation)
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl EventPublisher for Publisher {
    async fn ensure_topic(&self, topic: &TopicSpec) -> Result<(), PublishError> {
        self.inner.ensure_topic(topic).await
    }

    async fn publish(
        &self,
        topic: &str,
        key: &str,
        event: &PaymentEvent,
    ) -> Result<(), PublishError> {
        self.inner.publish(topic, key, event).await
    }

    async fn close(&self) -> Result<(), PublishError> {
        self.inner.close().await
    }
}
