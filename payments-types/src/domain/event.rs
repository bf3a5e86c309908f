//! Domain events emitted after a payment is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::payment::{Payment, PaymentId, PaymentMethod, PaymentStatus};

/// Topic that carries payment lifecycle events.
pub const PAYMENT_EVENTS_TOPIC: &str = "payment.events";

/// Partition count used when provisioning [`PAYMENT_EVENTS_TOPIC`].
pub const PAYMENT_EVENTS_PARTITIONS: i32 = 3;

/// Replication factor used when provisioning [`PAYMENT_EVENTS_TOPIC`].
pub const PAYMENT_EVENTS_REPLICATION: i32 = 1;

/// Snapshot of a stored payment, tagged with what happened to it.
///
/// Serialized as JSON onto the bus; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub id: PaymentId,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub event_type: String,
}

impl PaymentEvent {
    pub const CREATED: &'static str = "payment.created";

    /// Builds the `payment.created` event for a freshly stored payment.
    pub fn created(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            amount: payment.amount,
            method: payment.method,
            status: payment.status,
            created_at: payment.created_at,
            event_type: Self::CREATED.to_string(),
        }
    }

    /// Partition key for this event: the payment id in decimal.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}
