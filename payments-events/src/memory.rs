//! In-memory publisher.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::{debug, info};

use payments_types::{EventPublisher, PaymentEvent, PublishError, TopicSpec};

/// A message accepted by [`InMemoryPublisher`], stored as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub key: String,
    pub payload: Vec<u8>,
}

impl PublishedMessage {
    /// Decodes the payload back into an event.
    pub fn event(&self) -> Result<PaymentEvent, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

/// Publisher that keeps every message in process memory.
///
/// Messages are appended under a single lock, so the log preserves send
/// order for every key. Delivery can be switched off to exercise failure
/// handling.
#[derive(Default)]
pub struct InMemoryPublisher {
    topics: Mutex<HashMap<String, TopicSpec>>,
    messages: Mutex<Vec<PublishedMessage>>,
    unavailable: AtomicBool,
    closed: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `publish` fail as if the broker were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Every message accepted so far, in send order.
    pub fn messages(&self) -> Vec<PublishedMessage> {
        lock(&self.messages).clone()
    }

    /// Messages sent with `key`, in send order.
    pub fn messages_for_key(&self, key: &str) -> Vec<PublishedMessage> {
        lock(&self.messages)
            .iter()
            .filter(|m| m.key == key)
            .cloned()
            .collect()
    }

    /// Provisioning parameters of a known topic.
    pub fn topic(&self, name: &str) -> Option<TopicSpec> {
        lock(&self.topics).get(name).cloned()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventPublisher for InMemoryPublisher {
    async fn ensure_topic(&self, topic: &TopicSpec) -> Result<(), PublishError> {
        let mut topics = lock(&self.topics);
        if topics.contains_key(&topic.name) {
            info!(topic = %topic.name, "Topic already exists");
        } else {
            topics.insert(topic.name.clone(), topic.clone());
            info!(topic = %topic.name, partitions = topic.partitions, "Topic created");
        }
        Ok(())
    }

    async fn publish(
        &self,
        topic: &str,
        key: &str,
        event: &PaymentEvent,
    ) -> Result<(), PublishError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PublishError::Closed);
        }

        let payload = serde_json::to_vec(event)?;

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PublishError::Delivery("broker unavailable".into()));
        }

        debug!(topic, key, size = payload.len(), "Message stored");
        lock(&self.messages).push(PublishedMessage {
            topic: topic.to_string(),
            key: key.to_string(),
            payload,
        });
        Ok(())
    }

    async fn close(&self) -> Result<(), PublishError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!("Closing in-memory publisher");
        }
        Ok(())
    }
}
