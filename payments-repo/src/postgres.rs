//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info, instrument};

use payments_types::{
    NewPayment, Payment, PaymentId, PaymentRepository, PaymentStatus, RepoError,
};

use crate::PoolSettings;
use crate::types::PgPaymentRow;

/// Embedded migrations, applied in order: (version, filename, sql).
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "0001_create_payments_pg.sql",
    include_str!("../migrations/0001_create_payments_pg.sql"),
)];

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository backed by a bounded pool.
#[derive(Clone)]
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    sql: &str,
    name: &str,
) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(&mut **tx)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Applies every migration not yet recorded in `schema_migrations`.
///
/// Each migration and its bookkeeping row commit together.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS schema_migrations (
            version BIGINT PRIMARY KEY,
            filename TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
    )
    .execute(pool)
    .await?;

    for (version, filename, sql) in MIGRATIONS {
        let applied: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = $1)"#,
        )
        .bind(*version)
        .fetch_one(pool)
        .await?;

        if applied {
            debug!(version, filename, "Skipping migration (already applied)");
            continue;
        }

        let mut tx = pool.begin().await?;
        execute_migration(&mut tx, sql, filename).await?;
        sqlx::query(r#"INSERT INTO schema_migrations (version, filename) VALUES ($1, $2)"#)
            .bind(*version)
            .bind(*filename)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(version, filename, "Applied migration");
    }

    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with default pool limits and automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::with_settings(database_url, &PoolSettings::default()).await
    }

    /// Creates a new PostgreSQL repository with the given pool limits.
    pub async fn with_settings(database_url: &str, settings: &PoolSettings) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .max_lifetime(settings.max_lifetime)
            .idle_timeout(settings.idle_timeout)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await?;

        info!("Database connection established");
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
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
impl PaymentRepository for PostgresRepo {
    /// Single `INSERT … RETURNING`: the row, its id and its timestamp are
    /// committed together or not at all, even if the caller is cancelled.
    #[instrument(skip(self), fields(method = %payment.method))]
    async fn create(&self, payment: NewPayment) -> Result<Payment, RepoError> {
        let row: PgPaymentRow = sqlx::query_as(
            r#"INSERT INTO payments (amount, method, status)
               VALUES ($1, $2, $3)
               RETURNING id, amount::FLOAT8 AS amount, method, status, created_at"#,
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
        let row: Option<PgPaymentRow> = sqlx::query_as(
            r#"SELECT id, amount::FLOAT8 AS amount, method, status, created_at
               FROM payments WHERE id = $1"#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(PgPaymentRow::into_domain).transpose()
    }
}
