//! Default diagnostics for payment creation.

use tracing::{info, warn};

use payments_types::{CreationObserver, Payment, PaymentEvent, PublishError};

/// Reports creation milestones as `tracing` events on the current span.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CreationObserver for TracingObserver {
    fn payment_persisted(&self, payment: &Payment) {
        info!(payment_id = %payment.id, "Payment saved to database");
    }

    fn event_published(&self, event: &PaymentEvent) {
        info!(payment_id = %event.id, event_type = %event.event_type, "Event published");
    }

    fn publish_failed(&self, event: &PaymentEvent, error: &PublishError) {
        warn!(
            payment_id = %event.id,
            event_type = %event.event_type,
            error = %error,
            "Failed to publish event; payment remains stored"
        );
    }
}
