//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use payments_events::PublisherSettings;
use payments_repo::PoolSettings;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("unknown log format: {}", other)),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub database_url: String,
    pub pool: PoolSettings,
    pub publisher: PublisherSettings,
    pub log_format: LogFormat,
    pub otel_service_name: String,
    /// OTLP export is enabled only when an endpoint is configured.
    pub otel_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = parse(&lookup, "PORT", 8080)?;

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                var("DB_USER", "payments_user"),
                var("DB_PASSWORD", "payments_pass"),
                var("DB_HOST", "localhost"),
                parse::<u16>(&lookup, "DB_PORT", 5432)?,
                var("DB_NAME", "payments"),
            ),
        };

        let defaults = PoolSettings::default();
        let pool = PoolSettings {
            max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse(&lookup, "DB_MIN_CONNECTIONS", defaults.min_connections)?,
            max_lifetime: Duration::from_secs(parse(
                &lookup,
                "DB_MAX_LIFETIME_SECS",
                defaults.max_lifetime.as_secs(),
            )?),
            idle_timeout: Duration::from_secs(parse(
                &lookup,
                "DB_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout.as_secs(),
            )?),
            ..defaults
        };
        if pool.min_connections > pool.max_connections {
            anyhow::bail!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                pool.min_connections,
                pool.max_connections
            );
        }

        let otel_service_name = var("OTEL_SERVICE_NAME", "payments-service");

        let brokers: Vec<String> = var("KAFKA_BROKERS", "localhost:9092")
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(String::from)
            .collect();
        if brokers.is_empty() {
            anyhow::bail!("KAFKA_BROKERS must name at least one broker");
        }

        let publisher = PublisherSettings {
            brokers,
            client_id: otel_service_name.clone(),
            acks: var("KAFKA_ACKS", "all"),
            delivery_timeout: Duration::from_millis(parse(
                &lookup,
                "KAFKA_DELIVERY_TIMEOUT_MS",
                5000,
            )?),
        };

        Ok(Self {
            port,
            environment: var("ENVIRONMENT", "dev"),
            database_url,
            pool,
            publisher,
            log_format: var("LOG_FORMAT", "pretty").parse()?,
            otel_service_name,
            otel_endpoint: lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|e| !e.is_empty()),
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
