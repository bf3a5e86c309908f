//! Payment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// Store-generated identifier for a Payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentId(i64);

impl PaymentId {
    /// Wraps a raw identity assigned by the store.
    pub fn from_i64(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PaymentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Payment methods accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Pix,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Card => "CARD",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = DomainError;

    /// Matching is exact: `"pix"` is not a valid method.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PIX" => Ok(PaymentMethod::Pix),
            "CARD" => Ok(PaymentMethod::Card),
            other => Err(DomainError::InvalidPaymentMethod(other.to_string())),
        }
    }
}

/// Lifecycle status of a payment.
///
/// Only `Created` is ever produced when a payment is stored. The other two
/// variants are recognised when decoding rows so that a store populated by
/// another writer does not fail to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Created,
    Processing,
    Completed,
}

impl AsRef<str> for PaymentStatus {
    fn as_ref(&self) -> &str {
        match self {
            Self::Created => "CREATED",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(Self::Created),
            "PROCESSING" => Ok(Self::Processing),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(DomainError::InvalidPaymentStatus(other.to_string())),
        }
    }
}

/// A payment that has not been stored yet.
///
/// Carries only what the caller supplies. Identity, status and creation time
/// are assigned by the repository, which turns this into a [`Payment`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewPayment {
    pub amount: f64,
    pub method: PaymentMethod,
}

impl NewPayment {
    pub fn new(amount: f64, method: PaymentMethod) -> Self {
        Self { amount, method }
    }
}

/// A durably stored payment.
///
/// Every field is set by the time a value of this type exists; there is no
/// way to observe a half-persisted payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Reconstructs a payment from database fields.
    pub fn from_parts(
        id: PaymentId,
        amount: f64,
        method: PaymentMethod,
        status: PaymentStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            amount,
            method,
            status,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing_is_exact() {
        assert_eq!("PIX".parse::<PaymentMethod>().unwrap(), PaymentMethod::Pix);
        assert_eq!("CARD".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);

        for bad in ["BOLETO", "pix", "Card", "", " PIX"] {
            let result = bad.parse::<PaymentMethod>();
            assert!(
                matches!(result, Err(DomainError::InvalidPaymentMethod(ref m)) if m == bad),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_status_defaults_to_created() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Created);
        assert_eq!(PaymentStatus::Created.to_string(), "CREATED");
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [
            PaymentStatus::Created,
            PaymentStatus::Processing,
            PaymentStatus::Completed,
        ] {
            assert_eq!(status.as_ref().parse::<PaymentStatus>().unwrap(), status);
        }
        assert!("REFUNDED".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_method_serializes_uppercase() {
        let json = serde_json::to_string(&PaymentMethod::Pix).unwrap();
        assert_eq!(json, "\"PIX\"");
    }
}
