//! Payments CLI
//!
//! Command-line interface for the Payments API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use payments_client::PaymentsClient;
use payments_types::{PaymentId, PaymentMethod};

#[derive(Parser)]
#[command(name = "payments")]
#[command(author, version, about = "Payments API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Payments API
    #[arg(
        long,
        env = "PAYMENTS_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a payment
    Create {
        /// Amount to charge
        #[arg(long)]
        amount: f64,
        /// Payment method (PIX, CARD)
        #[arg(long, default_value = "PIX")]
        method: String,
    },
    /// Get payment details
    Get {
        /// Payment ID
        id: String,
    },
    /// Check API health
    Health,
}

fn parse_method(s: &str) -> Result<PaymentMethod> {
    s.to_uppercase()
        .parse::<PaymentMethod>()
        .map_err(|_| anyhow::anyhow!("Unknown payment method: {}. Supported: PIX, CARD", s))
}

fn parse_payment_id(s: &str) -> Result<PaymentId> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid payment ID: {}", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = PaymentsClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Create { amount, method } => {
            let method = parse_method(&method)?;
            let payment = client.create_payment(amount, method.as_str()).await?;
            println!("{}", serde_json::to_string_pretty(&payment)?);
        }

        Commands::Get { id } => {
            let payment_id = parse_payment_id(&id)?;
            match client.get_payment(payment_id).await {
                Ok(payment) => println!("{}", serde_json::to_string_pretty(&payment)?),
                Err(e) if e.is_not_found() => {
                    println!("✗ Payment {} not found", payment_id);
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_is_case_insensitive() {
        assert_eq!(parse_method("pix").unwrap(), PaymentMethod::Pix);
        assert_eq!(parse_method("Card").unwrap(), PaymentMethod::Card);
        assert!(parse_method("BOLETO").is_err());
    }

    #[test]
    fn test_parse_payment_id() {
        assert_eq!(parse_payment_id("42").unwrap(), PaymentId::from_i64(42));
        assert!(parse_payment_id("abc").is_err());
    }

    #[test]
    fn test_cli_parses_create() {
        let cli = Cli::parse_from(["payments", "create", "--amount", "10.5", "--method", "CARD"]);
        match cli.command {
            Commands::Create { amount, method } => {
                assert_eq!(amount, 10.5);
                assert_eq!(method, "CARD");
            }
            _ => panic!("expected create"),
        }
    }
}
