//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Payment, PaymentId, PaymentMethod, PaymentStatus};
use crate::error::AppError;

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a new payment.
///
/// `method` stays a plain string here so that an unknown method reaches the
/// service and is reported as a validation error rather than a body
/// deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    /// Amount to charge, must be greater than zero
    #[schema(example = 100.50)]
    pub amount: f64,
    /// Payment method: `PIX` or `CARD`
    #[schema(example = "PIX")]
    pub method: String,
}

impl CreatePaymentRequest {
    /// Boundary checks that the core relies on but does not repeat.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(AppError::Validation(
                "amount must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// A stored payment as returned to API callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    /// Store-assigned payment identifier
    #[schema(value_type = i64, example = 1)]
    pub id: PaymentId,
    #[schema(example = 100.50)]
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// When the payment was stored (RFC 3339)
    #[schema(value_type = String, example = "2024-01-01T10:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            amount: payment.amount,
            method: payment.method,
            status: payment.status,
            created_at: payment.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: f64) -> CreatePaymentRequest {
        CreatePaymentRequest {
            amount,
            method: "PIX".into(),
        }
    }

    #[test]
    fn test_positive_amount_is_accepted() {
        assert!(request(100.50).validate().is_ok());
        assert!(request(0.01).validate().is_ok());
    }

    #[test]
    fn test_non_positive_amount_is_rejected() {
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(request(amount).validate(), Err(AppError::Validation(_))),
                "{amount} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_ignores_method() {
        // Method is checked by the service, not at the boundary.
        let req = CreatePaymentRequest {
            amount: 50.0,
            method: "BOLETO".into(),
        };
        assert!(req.validate().is_ok());
    }
}
