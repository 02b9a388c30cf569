//! Display sinks and the events the monitor reports to them
//!
//! The monitor only hands over [`ReportEvent`]s. How a sink renders them
//! (log output, a status page, a channel consumer) is up to the sink.

pub mod board;
pub mod render;
pub mod sinks;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fares::Fare;

pub use board::{BoardSnapshot, StatusBoard};
pub use render::{fare_summary, trend_label};
pub use sinks::{ChannelSink, TracingSink};

/// One point on the fare graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub outbound: Fare,
    #[serde(rename = "return")]
    pub inbound: Fare,
    pub at: DateTime<Utc>,
}

/// Something the monitor wants displayed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ReportEvent {
    LogLines(Vec<String>),
    PlotPoint(PlotPoint),
    SettingsInfo(Vec<String>),
}

/// Receiver of report events
#[async_trait]
pub trait DisplaySink: Send + Sync {
    async fn report(&self, event: &ReportEvent);
}
