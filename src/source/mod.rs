//! Fare sources
//!
//! A source turns the monitor config into a batch of raw price fragments
//! per direction. Parsing the fragments is left to the fare pipeline.

pub mod http;

use async_trait::async_trait;

use crate::fares::RawObservationBatch;
use crate::monitor::MonitorConfig;

pub use http::{parse_fare_markup, HttpFareSource};

/// Remote lookup of raw fare fragments
#[async_trait]
pub trait FareSource: Send + Sync {
    async fn fetch(&self, config: &MonitorConfig) -> Result<RawObservationBatch, FetchError>;
}

/// Fetch errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Source returned status {0}")]
    Status(u16),

    #[error("Failed to read response body: {0}")]
    Body(String),
}
