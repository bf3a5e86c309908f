//! Event publisher port.
//!
//! Implementations deliver serialized events to a broker topic. The service
//! layer depends on this trait, not on a particular broker client.

use crate::domain::{
    PAYMENT_EVENTS_PARTITIONS, PAYMENT_EVENTS_REPLICATION, PAYMENT_EVENTS_TOPIC, PaymentEvent,
};
use crate::error::PublishError;

/// Topic provisioning parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpec {
    pub name: String,
    pub partitions: i32,
    pub replication_factor: i32,
}

impl TopicSpec {
    pub fn new(name: impl Into<String>, partitions: i32, replication_factor: i32) -> Self {
        Self {
            name: name.into(),
            partitions,
            replication_factor,
        }
    }

    /// The `payment.events` topic: 3 partitions, replication factor 1.
    pub fn payment_events() -> Self {
        Self::new(
            PAYMENT_EVENTS_TOPIC,
            PAYMENT_EVENTS_PARTITIONS,
            PAYMENT_EVENTS_REPLICATION,
        )
    }
}

/// Port trait for broker publishers.
///
/// Implementations must be safe to share across concurrent requests and
/// must never interleave the bytes of distinct messages. Events sharing a
/// key are delivered in send order.
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// Creates the topic if it does not exist. An existing topic is success.
    async fn ensure_topic(&self, topic: &TopicSpec) -> Result<(), PublishError>;

    /// Serializes `event` as JSON and sends it, waiting for the broker to
    /// acknowledge. Makes exactly one delivery attempt.
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        event: &PaymentEvent,
    ) -> Result<(), PublishError>;

    /// Releases broker resources. Calling it more than once is a no-op;
    /// `publish` fails with [`PublishError::Closed`] afterwards.
    async fn close(&self) -> Result<(), PublishError>;
}

#[async_trait::async_trait]
impl<T: EventPublisher> EventPublisher for std::sync::Arc<T> {
    async fn ensure_topic(&self, topic: &TopicSpec) -> Result<(), PublishError> {
        (**self).ensure_topic(topic).await
    }

    async fn publish(
        &self,
        topic: &str,
        key: &str,
        event: &PaymentEvent,
    ) -> Result<(), PublishError> {
        (**self).publish(topic, key, event).await
    }

    async fn close(&self) -> Result<(), PublishError> {
        (**self).close().await
    }
}
