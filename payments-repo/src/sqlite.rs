//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info, instrument};

use payments_types::{
    NewPayment, Payment, PaymentId, PaymentRepository, PaymentStatus, RepoError,
};

use crate::PoolSettings;
use crate::types::SqlitePaymentRow;

/// Embedded migrations, applied in order: (version, filename, sql).
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "0001_create_payments.sql",
    include_str!("../migrations/0001_create_payments.sql"),
)];

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), anyhow::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            filename TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )"#,
    )
    .execute(pool)
    .await?;

    for (version, filename, sql) in MIGRATIONS {
        let applied: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = ?)"#,
        )
        .bind(*version)
        .fetch_one(pool)
        .await?;

        if applied {
            debug!(version, filename, "Skipping migration (already applied)");
            continue;
        }

        let mut tx = pool.begin().await?;
        for statement in sql.split(';') {
            let stmt = statement.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", filename, e))?;
            }
        }
        sqlx::query(r#"INSERT INTO schema_migrations (version, filename) VALUES (?, ?)"#)
            .bind(*version)
            .bind(*filename)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(version, filename, "Applied migration");
    }

    Ok(())
}

/// Whether the URL names a database that lives only in memory, either
/// `sqlite::memory:` or a `mode=memory` query parameter.
pub(crate) fn is_in_memory(database_url: &str) -> bool {
    let (path, query) = database_url
        .split_once('?')
        .unwrap_or((database_url, ""));
    path.ends_with(":memory:") || query.split('&').any(|param| param == "mode=memory")
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::with_settings(database_url, &PoolSettings::default()).await
    }

    /// Creates a new SQLite repository with the given pool limits.
    ///
    /// In-memory databases live only as long as a connection is open, so
    /// they get a single connection that is never recycled.
    pub async fn with_settings(database_url: &str, settings: &PoolSettings) -> anyhow::Result<Self> {
        let in_memory = is_in_memory(database_url);

        // Ensure on-disk SQLite target directory exists.
        if let Some(path) = database_url.strip_prefix("sqlite://").filter(|_| !in_memory) {
            let path = path.split('?').next().unwrap_or(path);
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .max_lifetime(None)
                .idle_timeout(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(settings.max_connections)
                .min_connections(settings.min_connections)
                .max_lifetime(settings.max_lifetime)
                .idle_timeout(settings.idle_timeout)
        };

        let pool = pool_options
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await?;

        run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentRepository for SqliteRepo {
    #[instrument(skip(self), fields(method = %payment.method))]
    async fn create(&self, payment: NewPayment) -> Result<Payment, RepoError> {
        let row: SqlitePaymentRow = sqlx::query_as(
            r#"INSERT INTO payments (amount, method, status)
               VALUES (?, ?, ?)
               RETURNING id, amount, method, status, created_at"#,
        )
        .bind(payment.amount)
        .bind(payment.method.as_str())
        .bind(PaymentStatus::Created.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.into_domain()
    }

    #[instrument(skip(self), fields(payment_id = %id))]
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let row: Option<SqlitePaymentRow> = sqlx::query_as(
            r#"SELECT id, amount, method, status, created_at FROM payments WHERE id = ?"#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(SqlitePaymentRow::into_domain).transpose()
    }
}
