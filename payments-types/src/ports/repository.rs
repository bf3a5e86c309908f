//! Repository port trait.
//!
//! This is the persistence port in our hexagonal architecture.
//! Adapters (Postgres, SQLite, in-memory mocks) implement this trait.

use crate::domain::{NewPayment, Payment, PaymentId};
use crate::error::RepoError;

/// Durable storage for payments.
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    /// Stores a new payment.
    ///
    /// Assigns the id, forces the status to `CREATED` and stamps the store's
    /// current time. All of that happens in one atomic write: on `Err` no row
    /// exists and the caller never sees a partially assigned payment.
    async fn create(&self, payment: NewPayment) -> Result<Payment, RepoError>;

    /// Looks a payment up by id.
    ///
    /// Returns `Ok(None)` when no such payment exists; `Err` is reserved for
    /// infrastructure failures.
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError>;
}
