//! Error types for the payment service.

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    #[error("invalid payment status: {0}")]
    InvalidPaymentStatus(String),
}

/// Repository-level errors (data access failures).
///
/// Connectivity loss and constraint violations both land in `Database`;
/// callers treat every variant as a single persistence failure.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A stored row could not be mapped back into the domain.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),
}

/// Event publishing errors.
///
/// These never reach the caller of a payment creation; they are recorded
/// for diagnostics and dropped.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to serialize event: {0}")]
    Serialization(String),

    #[error("failed to deliver event: {0}")]
    Delivery(String),

    #[error("failed to provision topic {topic}: {reason}")]
    Provisioning { topic: String, reason: String },

    #[error("publisher is closed")]
    Closed,
}

impl From<serde_json::Error> for PublishError {
    fn from(err: serde_json::Error) -> Self {
        PublishError::Serialization(err.to_string())
    }
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Client fault: the request was rejected before any side effect.
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Server fault: the store could not complete the operation.
    #[error("{context}: {source}")]
    Persistence {
        context: String,
        #[source]
        source: RepoError,
    },
}

impl AppError {
    /// Wraps a repository failure with a description of what was attempted.
    pub fn persistence(context: impl Into<String>, source: RepoError) -> Self {
        AppError::Persistence {
            context: context.into(),
            source,
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_method_becomes_validation() {
        let err: AppError = DomainError::InvalidPaymentMethod("BOLETO".into()).into();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "invalid payment method: BOLETO"));
    }

    #[test]
    fn test_unknown_status_becomes_validation() {
        let err: AppError = DomainError::InvalidPaymentStatus("REFUNDED".into()).into();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "invalid payment status: REFUNDED"));
    }

    #[test]
    fn test_persistence_keeps_source() {
        let err = AppError::persistence(
            "failed to create payment",
            RepoError::Database("connection refused".into()),
        );
        assert_eq!(
            err.to_string(),
            "failed to create payment: Database error: connection refused"
        );
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "Database error: connection refused");
    }
}
