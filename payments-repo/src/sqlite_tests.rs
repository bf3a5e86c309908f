//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use payments_types::{
        NewPayment, PaymentId, PaymentMethod, PaymentRepository, PaymentStatus, RepoError,
    };

    use crate::PoolSettings;
    use crate::SqliteRepo;
    use crate::sqlite::is_in_memory;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_create_payment() {
        let repo = setup_repo().await;

        let payment = repo
            .create(NewPayment::new(100.50, PaymentMethod::Pix))
            .await
            .unwrap();

        assert!(payment.id.as_i64() > 0);
        assert_eq!(payment.amount, 100.50);
        assert_eq!(payment.method, PaymentMethod::Pix);
        assert_eq!(payment.status, PaymentStatus::Created);
    }

    #[tokio::test]
    async fn test_created_at_is_assigned_by_store() {
        let repo = setup_repo().await;
        let before = chrono::Utc::now() - chrono::Duration::seconds(5);

        let payment = repo
            .create(NewPayment::new(10.0, PaymentMethod::Card))
            .await
            .unwrap();

        let after = chrono::Utc::now() + chrono::Duration::seconds(5);
        assert!(payment.created_at > before && payment.created_at < after);
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_increasing() {
        let repo = setup_repo().await;

        let first = repo
            .create(NewPayment::new(1.0, PaymentMethod::Pix))
            .await
            .unwrap();
        let second = repo
            .create(NewPayment::new(2.0, PaymentMethod::Card))
            .await
            .unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_find_by_id_returns_created_payment() {
        let repo = setup_repo().await;

        let created = repo
            .create(NewPayment::new(250.75, PaymentMethod::Card))
            .await
            .unwrap();

        let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let repo = setup_repo().await;

        let result = repo.find_by_id(PaymentId::from_i64(9999)).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_constraint_violation_is_database_error() {
        let repo = setup_repo().await;

        let result = repo.create(NewPayment::new(-5.0, PaymentMethod::Pix)).await;

        assert!(matches!(result, Err(RepoError::Database(_))));

        // Nothing was written.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_unknown_stored_method_is_domain_error() {
        let repo = setup_repo().await;

        // Bypass the CHECK constraint by writing through a fresh table shape.
        sqlx::query("DROP TABLE payments")
            .execute(repo.pool())
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE payments (id INTEGER PRIMARY KEY, amount REAL, method TEXT, status TEXT, created_at TEXT)",
        )
        .execute(repo.pool())
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO payments VALUES (1, 10.0, 'BOLETO', 'CREATED', '2024-01-01T10:00:00.000Z')",
        )
        .execute(repo.pool())
        .await
        .unwrap();

        let result = repo.find_by_id(PaymentId::from_i64(1)).await;

        assert!(matches!(result, Err(RepoError::Domain(_))));
    }

    #[tokio::test]
    async fn test_reserved_statuses_decode() {
        let repo = setup_repo().await;

        sqlx::query(
            "INSERT INTO payments (amount, method, status) VALUES (20.0, 'PIX', 'PROCESSING')",
        )
        .execute(repo.pool())
        .await
        .unwrap();

        let payment = repo
            .find_by_id(PaymentId::from_i64(1))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Processing);
    }

    #[tokio::test]
    async fn test_migrations_are_recorded_once() {
        let repo = setup_repo().await;

        repo.create_schema().await.unwrap();
        repo.create_schema().await.unwrap();

        let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(applied, 1);
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!(
            "sqlite://{}/nested/payments.db?mode=rwc",
            dir.path().display()
        );

        let created = {
            let repo = SqliteRepo::new(&url).await.unwrap();
            let payment = repo
                .create(NewPayment::new(42.0, PaymentMethod::Pix))
                .await
                .unwrap();
            repo.pool().close().await;
            payment
        };

        let repo = SqliteRepo::new(&url).await.unwrap();
        let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        repo.pool().close().await;
    }

    #[test]
    fn test_in_memory_urls_are_recognised() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://:memory:"));
        assert!(is_in_memory("sqlite://payments?mode=memory"));
        assert!(is_in_memory("sqlite://payments?cache=shared&mode=memory"));
        assert!(!is_in_memory("sqlite://payments.db?mode=rwc"));
        assert!(!is_in_memory("sqlite://data/memory.db"));
    }

    #[tokio::test]
    async fn test_mode_memory_url_shares_one_database() {
        let settings = PoolSettings {
            max_connections: 5,
            min_connections: 5,
            ..PoolSettings::default()
        };
        let repo = Arc::new(
            SqliteRepo::with_settings("sqlite://payments-mem?mode=memory", &settings)
                .await
                .unwrap(),
        );

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    let created = repo
                        .create(NewPayment::new(1.0 + i as f64, PaymentMethod::Pix))
                        .await
                        .unwrap();
                    repo.find_by_id(created.id).await.unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }
        assert_eq!(repo.pool().size(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let repo = Arc::new(setup_repo().await);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(NewPayment::new(1.0 + i as f64, PaymentMethod::Card))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().id);
        }
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), 20);
    }
}
