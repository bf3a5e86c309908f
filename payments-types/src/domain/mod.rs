//! Domain models for the payment service.

pub mod event;
pub mod payment;

pub use event::{
    PAYMENT_EVENTS_PARTITIONS, PAYMENT_EVENTS_REPLICATION, PAYMENT_EVENTS_TOPIC, PaymentEvent,
};
pub use payment::{NewPayment, Payment, PaymentId, PaymentMethod, PaymentStatus};
