//! Database row types, one per backend.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use payments_types::{Payment, PaymentId, RepoError};

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Payment row from PostgreSQL. `amount` is selected as `FLOAT8`.
#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct PgPaymentRow {
    pub id: i64,
    pub amount: f64,
    pub method: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(feature = "postgres")]
impl PgPaymentRow {
    pub fn into_domain(self) -> Result<Payment, RepoError> {
        payment_from_columns(
            self.id,
            self.amount,
            &self.method,
            &self.status,
            self.created_at,
        )
    }
}

/// Payment row from SQLite, where timestamps are RFC 3339 text.
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct SqlitePaymentRow {
    pub id: i64,
    pub amount: f64,
    pub method: String,
    pub status: String,
    pub created_at: String,
}

#[cfg(feature = "sqlite")]
impl SqlitePaymentRow {
    pub fn into_domain(self) -> Result<Payment, RepoError> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| RepoError::Database(e.to_string()))?
            .with_timezone(&Utc);

        payment_from_columns(self.id, self.amount, &self.method, &self.status, created_at)
    }
}

fn payment_from_columns(
    id: i64,
    amount: f64,
    method: &str,
    status: &str,
    created_at: DateTime<Utc>,
) -> Result<Payment, RepoError> {
    Ok(Payment::from_parts(
        PaymentId::from_i64(id),
        amount,
        method.parse()?,
        status.parse()?,
        created_at,
    ))
}
