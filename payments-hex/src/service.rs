//! Payment Application Service
//!
//! Orchestrates payment creation through the repository and publisher ports.
//! Contains NO infrastructure logic - pure business orchestration.

use std::sync::Arc;

use tracing::{Span, error, instrument, warn};

use payments_types::{
    AppError, CreationObserver, EventPublisher, NewPayment, PAYMENT_EVENTS_TOPIC, Payment,
    PaymentEvent, PaymentId, PaymentMethod, PaymentRepository,
};

use crate::observer::TracingObserver;

/// Application service for payment operations.
///
/// Generic over the repository and publisher - adapters are injected at
/// compile time. Diagnostics go to an injected [`CreationObserver`].
///
/// Creation succeeds as soon as the payment is durable. The
/// `payment.created` event is published afterwards on a best-effort basis:
/// a failed publish is reported to the observer and otherwise ignored, so a
/// stored payment may have no event. An event is never published for a
/// payment that was not stored.
pub struct PaymentService<R: PaymentRepository, P: EventPublisher> {
    repo: R,
    publisher: P,
    observer: Arc<dyn CreationObserver>,
}

impl<R: PaymentRepository, P: EventPublisher> PaymentService<R, P> {
    /// Creates a new payment service that reports through `tracing`.
    pub fn new(repo: R, publisher: P) -> Self {
        Self::with_observer(repo, publisher, Arc::new(TracingObserver))
    }

    /// Creates a new payment service with a custom observer.
    pub fn with_observer(repo: R, publisher: P, observer: Arc<dyn CreationObserver>) -> Self {
        Self {
            repo,
            publisher,
            observer,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns a reference to the underlying publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a payment and announces it on `payment.events`.
    ///
    /// `amount` must already be validated as positive by the caller.
    #[instrument(skip(self), fields(payment_id = tracing::field::Empty))]
    pub async fn create_payment(&self, amount: f64, method: &str) -> Result<Payment, AppError> {
        let method = method.parse::<PaymentMethod>().map_err(|e| {
            warn!("Rejected payment: {}", e);
            AppError::from(e)
        })?;

        let payment = self
            .repo
            .create(NewPayment::new(amount, method))
            .await
            .map_err(|e| {
                error!("Failed to save payment: {}", e);
                AppError::persistence("failed to create payment", e)
            })?;

        Span::current().record("payment_id", payment.id.as_i64());
        self.observer.payment_persisted(&payment);

        let event = PaymentEvent::created(&payment);
        match self
            .publisher
            .publish(PAYMENT_EVENTS_TOPIC, &event.key(), &event)
            .await
        {
            Ok(()) => self.observer.event_published(&event),
            // Not propagated: the payment is already stored.
            Err(e) => self.observer.publish_failed(&event, &e),
        }

        Ok(payment)
    }

    /// Gets a payment by ID.
    #[instrument(skip(self), fields(payment_id = %id))]
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| AppError::persistence("failed to load payment", e))
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Payment {}", id))))
    }

    /// Releases the publisher. Further creations still store payments but
    /// their events fail to publish.
    pub async fn shutdown(&self) {
        if let Err(e) = self.publisher.close().await {
            warn!("Failed to close publisher: {}", e);
        }
    }
}
