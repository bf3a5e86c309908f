//! Diagnostics port for the payment creation flow.

use crate::domain::{Payment, PaymentEvent};
use crate::error::PublishError;

/// Receives notable moments of a payment creation.
///
/// Injected into the service at construction so that diagnostics are an
/// explicit collaborator. Publish failures are reported here and nowhere
/// else: they are not returned to the caller.
pub trait CreationObserver: Send + Sync + 'static {
    /// The payment row is durable.
    fn payment_persisted(&self, _payment: &Payment) {}

    /// The broker acknowledged the event.
    fn event_published(&self, _event: &PaymentEvent) {}

    /// The event could not be delivered. The payment stays persisted.
    fn publish_failed(&self, event: &PaymentEvent, error: &PublishError);
}
