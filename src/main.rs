//! Farewatch Server
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - FAREWATCH_FROM / FAREWATCH_TO: Origin and destination airport codes (required)
//! - FAREWATCH_LEAVE_DATE / FAREWATCH_RETURN_DATE: Travel dates as YYYY-MM-DD (required)
//! - FAREWATCH_PASSENGERS: Adult passengers (default: 1)
//! - FAREWATCH_INTERVAL: Minutes between checks (default: 30)
//! - FAREWATCH_DEAL_PRICE: Alert when either leg is at or below this price (default: off)
//! - FAREWATCH_SOURCE_URL: Fare search page
//! - FAREWATCH_FETCH_TIMEOUT_SECS: Fare search timeout (default: 30)
//! - FAREWATCH_WEBHOOK_URL: Also post deal alerts to this webhook
//! - TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, TWILIO_FROM_NUMBER, TWILIO_TO_NUMBER: SMS deal alerts
//! - FAREWATCH_HOST: Status server bind address (default: 0.0.0.0)
//! - FAREWATCH_PORT: Status server port (default: 8080)
//! - RUST_LOG: Log level (default: info)

use farewatch::api::{run_service, ServiceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farewatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env()?;

    tracing::info!("Farewatch configuration:");
    tracing::info!("  Status server: {}:{}", config.host, config.port);
    tracing::info!("  Source: {}", config.monitor.source_url);
    tracing::info!("  Notification targets: {}", config.monitor.targets.len());

    println!(
        r#"
  ___                          _       _
 | __|_ _ _ _ _____ __ ____ _| |_ __| |_
 | _/ _` | '_/ -_) V  V / _` |  _/ _| ' \
 |_|\__,_|_| \___|\_/\_/\__,_|\__\__|_||_|

 Round-Trip Airfare Monitor
 Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );

    run_service(config).await
}
