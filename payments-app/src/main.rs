//! # Payments Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository and publisher adapters
//! - Create the payment service
//! - Start the HTTP server and release resources on shutdown

mod config;
mod telemetry;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payments_events::build_publisher;
use payments_hex::{PaymentService, inbound::HttpServer};
use payments_repo::build_repo;

use config::{Config, LogFormat};
use telemetry::Telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize OpenTelemetry traces and metrics when a collector is configured
    let otel = config
        .otel_endpoint
        .as_deref()
        .map(|endpoint| Telemetry::init(endpoint, &config.otel_service_name))
        .transpose()?;
    let (telemetry, otel_providers) = match otel {
        Some((tracer, providers)) => (
            Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Some(providers),
        ),
        None => (None, None),
    };

    let json = config.log_format == LogFormat::Json;

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,payments_app=debug,payments_hex=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .with(telemetry)
        .init();

    tracing::info!(
        environment = %config.environment,
        service = %config.otel_service_name,
        "Starting payments server on port {}",
        config.port
    );

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url, &config.pool).await?;

    // Build publisher (provisions the payment.events topic)
    let publisher = build_publisher(&config.publisher).await?;

    // Create the payment service
    let service = PaymentService::new(repo.clone(), publisher);

    // Create and run the HTTP server; the publisher is closed once it stops
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    repo.close().await;

    // Ensure traces and metrics are flushed before exit
    if let Some(providers) = otel_providers {
        providers.shutdown();
    }
    Ok(())
}
