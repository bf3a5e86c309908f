//! Client example demonstrating the payment creation flow against a running server.
//!
//! Run with: cargo run -p payments-app --example client_example --no-default-features --features sqlite

use std::net::SocketAddr;
use std::sync::Arc;

use payments_client::PaymentsClient;
use payments_events::InMemoryPublisher;
use payments_hex::{PaymentService, inbound::HttpServer};
use payments_repo::SqliteRepo;
use payments_types::PaymentId;
use tempfile::tempdir;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    let port = addr.port();
    drop(listener);

    // Use a temp file-backed SQLite DB
    let tmp = tempdir()?;
    let db_path = tmp.path().join("payments.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    println!("🚀 Starting server on port {port}...");
    println!("   Database: {db_url}");

    // Build repository (handles connection and migration)
    let repo = SqliteRepo::new(&db_url).await?;
    let publisher = Arc::new(InMemoryPublisher::new());

    // Start server in background
    let service = PaymentService::new(repo, publisher.clone());
    let server = HttpServer::new(service);
    let router = server.router();

    let server_addr = format!("127.0.0.1:{port}");
    let server_listener = TcpListener::bind(&server_addr).await?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(server_listener, router.into_make_service()).await {
            eprintln!("server error: {e}");
        }
    });

    // Create client
    let base_url = format!("http://127.0.0.1:{port}");
    let client = PaymentsClient::new(&base_url);

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: Payment creation flow
    // ─────────────────────────────────────────────────────────────────────────

    // Health check
    let health = client.health().await?;
    println!("✅ Server health: {health}");

    // Create payments
    let pix = client.create_payment(100.50, "PIX").await?;
    println!("✅ Created payment: {} {} (id={})", pix.amount, pix.method, pix.id);

    let card = client.create_payment(42.00, "CARD").await?;
    println!("✅ Created payment: {} {} (id={})", card.amount, card.method, card.id);

    // Invalid method is rejected before anything is stored
    let rejected = client.create_payment(10.00, "BOLETO").await;
    println!("✅ Rejected BOLETO: {}", rejected.unwrap_err());

    // Broker outage: the payment is still created, only the event is lost
    publisher.set_unavailable(true);
    let unannounced = client.create_payment(7.25, "PIX").await?;
    publisher.set_unavailable(false);
    println!(
        "✅ Created payment during broker outage (id={})",
        unannounced.id
    );

    // Lookup
    let fetched = client.get_payment(pix.id).await?;
    println!("   Fetched payment {}: status {}", fetched.id, fetched.status);

    let missing = client.get_payment(PaymentId::from_i64(9_999)).await;
    if let Err(e) = missing {
        println!("   Payment 9999 not found: {}", e.is_not_found());
    }

    // Events that reached the topic
    println!("\n📋 Published events:");
    for message in publisher.messages() {
        let event = message.event()?;
        println!(
            "   - {} key={} {} {} {}",
            message.topic, message.key, event.event_type, event.amount, event.method
        );
    }

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
