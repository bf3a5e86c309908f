//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use payments_types::{EventPublisher, PaymentRepository};

use super::handlers::{self, AppState};
use crate::PaymentService;
use crate::openapi::ApiDoc;

/// HTTP Server for the Payments API.
pub struct HttpServer<R: PaymentRepository, P: EventPublisher> {
    state: Arc<AppState<R, P>>,
}

impl<R: PaymentRepository, P: EventPublisher> HttpServer<R, P> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: PaymentService<R, P>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/v1/payments", post(handlers::create_payment::<R, P>))
            .route("/v1/payments/health", get(handlers::health))
            .route("/v1/payments/{id}", get(handlers::get_payment::<R, P>))
            .merge(
                SwaggerUi::new("/docs/payments")
                    .url("/docs/payments/openapi.json", ApiDoc::openapi()),
            )
            .layer(metrics)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    ///
    /// Once in-flight requests have drained the publisher is closed.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.state.service.shutdown().await;
        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
