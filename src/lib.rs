//! Farewatch: Round-Trip Airfare Monitor
//!
//! Polls a fare search page on a fixed interval, keeps the lowest outbound
//! and return fares from the last trustworthy check, reports how they moved,
//! and sends a deal alert when either leg drops to a configured price.
//!
//! # Features
//!
//! - **Fare Extraction**: Currency-prefixed prices pulled out of raw markup
//! - **Aggregation**: Lowest fare per direction for each check
//! - **Trend Tracking**: Signed deltas against the last committed fares
//! - **Glitch Protection**: Checks missing a leg never replace the baseline
//! - **Deal Alerts**: Log, webhook and SMS notification targets
//! - **Status Server**: Latest fares and settings over HTTP
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use farewatch::monitor::{MonitorConfig, Notifier, Scheduler};
//! use farewatch::report::TracingSink;
//! use farewatch::source::HttpFareSource;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MonitorConfig::from_env()?;
//! let notifier = Notifier::new(config.targets.clone());
//!
//! let handle = Scheduler::new(config, Arc::new(HttpFareSource::new()?), Arc::new(notifier))
//!     .with_sink(Arc::new(TracingSink))
//!     .start();
//!
//! tokio::signal::ctrl_c().await?;
//! let tracker = handle.stop().await?;
//! println!("Last fares: {:?}", tracker.read());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod fares;
pub mod monitor;
pub mod report;
pub mod source;

// Re-export commonly used types
pub use fares::{aggregate, diff, evaluate, DiffResult, FareSnapshot, RawObservationBatch, Trend};
pub use monitor::{MonitorConfig, Scheduler, TrackerState};
pub use report::{DisplaySink, ReportEvent};
