//! Kafka publisher adapter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::util::Timeout;
use tracing::{debug, info, instrument, warn};

use payments_types::{EventPublisher, PaymentEvent, PublishError, TopicSpec};

use crate::PublisherSettings;

/// How long `send` may wait for room in the local producer queue. A full
/// queue fails the publish at once, leaving `message.timeout.ms` as the
/// only bound on a delivery attempt.
const QUEUE_TIMEOUT: Timeout = Timeout::After(Duration::ZERO);

/// Synchronous Kafka publisher.
///
/// One `FutureProducer` is shared by every request; librdkafka keeps
/// messages intact and orders them per partition. Internal retries are
/// disabled so each `publish` is a single delivery attempt.
pub struct KafkaPublisher {
    producer: FutureProducer,
    admin: AdminClient<DefaultClientContext>,
    delivery_timeout: Duration,
    closed: AtomicBool,
}

impl KafkaPublisher {
    /// Creates the producer and provisions `topics`.
    ///
    /// Only an invalid client configuration is fatal. Provisioning problems
    /// are logged; publishing is attempted regardless.
    pub async fn connect(settings: &PublisherSettings, topics: &[TopicSpec]) -> anyhow::Result<Self> {
        let brokers = settings.brokers.join(",");
        info!(brokers = %brokers, "Initializing Kafka publisher");

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &brokers)
            .set("client.id", &settings.client_id)
            .set("acks", &settings.acks)
            .set("message.send.max.retries", "0")
            .set(
                "message.timeout.ms",
                settings.delivery_timeout.as_millis().to_string(),
            )
            .create()?;

        let admin: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &brokers)
            .set("client.id", &settings.client_id)
            .create()?;

        let publisher = Self {
            producer,
            admin,
            delivery_timeout: settings.delivery_timeout,
            closed: AtomicBool::new(false),
        };

        for topic in topics {
            if let Err(e) = publisher.ensure_topic(topic).await {
                warn!("Failed to provision topic: {}", e);
            }
        }

        Ok(publisher)
    }

    fn provisioning_error(topic: &TopicSpec, reason: impl ToString) -> PublishError {
        PublishError::Provisioning {
            topic: topic.name.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl EventPublisher for KafkaPublisher {
    #[instrument(skip(self), fields(topic = %topic.name))]
    async fn ensure_topic(&self, topic: &TopicSpec) -> Result<(), PublishError> {
        let new_topic = NewTopic::new(
            &topic.name,
            topic.partitions,
            TopicReplication::Fixed(topic.replication_factor),
        );
        let options = AdminOptions::new()
            .operation_timeout(Some(self.delivery_timeout))
            .request_timeout(Some(self.delivery_timeout));

        let results = self
            .admin
            .create_topics([&new_topic], &options)
            .await
            .map_err(|e| Self::provisioning_error(topic, e))?;

        for result in results {
            match result {
                Ok(name) => info!(topic = %name, "Topic created"),
                Err((name, RDKafkaErrorCode::TopicAlreadyExists)) => {
                    info!(topic = %name, "Topic already exists")
                }
                Err((_, code)) => return Err(Self::provisioning_error(topic, code)),
            }
        }

        Ok(())
    }

    #[instrument(skip(self, event))]
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        event: &PaymentEvent,
    ) -> Result<(), PublishError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PublishError::Closed);
        }

        let payload = serde_json::to_vec(event)?;
        debug!(size = payload.len(), "Message serialized");

        let record = FutureRecord::to(topic).key(key).payload(&payload);
        self.producer
            .send(record, QUEUE_TIMEOUT)
            .await
            .map_err(|(e, _)| PublishError::Delivery(e.to_string()))?;

        debug!("Message acknowledged");
        Ok(())
    }

    async fn close(&self) -> Result<(), PublishError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        info!("Closing Kafka publisher");
        let producer = self.producer.clone();
        let timeout = self.delivery_timeout;
        tokio::task::spawn_blocking(move || producer.flush(timeout))
            .await
            .map_err(|e| PublishError::Delivery(e.to_string()))?
            .map_err(|e| PublishError::Delivery(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use payments_types::{
        PAYMENT_EVENTS_TOPIC, Payment, PaymentId, PaymentMethod, PaymentStatus,
    };

    use super::*;

    /// Nothing listens on port 1, so every broker call fails fast.
    fn unreachable() -> PublisherSettings {
        PublisherSettings {
            brokers: vec!["127.0.0.1:1".to_string()],
            delivery_timeout: Duration::from_millis(500),
            ..PublisherSettings::default()
        }
    }

    fn event() -> PaymentEvent {
        PaymentEvent::created(&Payment::from_parts(
            PaymentId::from_i64(1),
            100.50,
            PaymentMethod::Pix,
            PaymentStatus::Created,
            Utc::now(),
        ))
    }

    #[tokio::test]
    async fn test_connect_survives_failed_provisioning() {
        let publisher = KafkaPublisher::connect(&unreachable(), &[TopicSpec::payment_events()])
            .await
            .unwrap();

        let result = publisher.ensure_topic(&TopicSpec::payment_events()).await;
        assert!(matches!(result, Err(PublishError::Provisioning { .. })));
    }

    #[tokio::test]
    async fn test_publish_to_unreachable_broker_fails() {
        let publisher = KafkaPublisher::connect(&unreachable(), &[]).await.unwrap();

        let result = publisher.publish(PAYMENT_EVENTS_TOPIC, "1", &event()).await;

        assert!(matches!(result, Err(PublishError::Delivery(_))));
    }

    #[tokio::test]
    async fn test_failed_publish_is_bounded_by_delivery_timeout() {
        let settings = unreachable();
        let publisher = KafkaPublisher::connect(&settings, &[]).await.unwrap();

        let started = std::time::Instant::now();
        let result = publisher.publish(PAYMENT_EVENTS_TOPIC, "1", &event()).await;
        let elapsed = started.elapsed();

        assert!(result.is_err());
        // librdkafka scans for expired messages about once a second.
        assert!(
            elapsed < settings.delivery_timeout + Duration::from_millis(1500),
            "publish took {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn test_close_is_idempotent_and_blocks_publish() {
        let publisher = KafkaPublisher::connect(&unreachable(), &[]).await.unwrap();

        let _ = publisher.close().await;
        assert!(publisher.close().await.is_ok());

        let result = publisher.publish(PAYMENT_EVENTS_TOPIC, "1", &event()).await;
        assert!(matches!(result, Err(PublishError::Closed)));
    }
}
