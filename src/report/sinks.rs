//! Built-in display sinks: tracing output and an in-process channel

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{DisplaySink, ReportEvent};

/// Writes every event to the tracing subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl DisplaySink for TracingSink {
    async fn report(&self, event: &ReportEvent) {
        match event {
            ReportEvent::LogLines(lines) => {
                for line in lines {
                    tracing::info!("{}", line);
                }
            }
            ReportEvent::PlotPoint(point) => {
                tracing::debug!(
                    outbound = point.outbound,
                    inbound = point.inbound,
                    at = %point.at,
                    "Plot point"
                );
            }
            ReportEvent::SettingsInfo(lines) => {
                for line in lines {
                    tracing::info!("  {}", line);
                }
            }
        }
    }
}

/// Forwards events to an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ReportEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<ReportEvent>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ReportEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl DisplaySink for ChannelSink {
    async fn report(&self, event: &ReportEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!("Report receiver dropped, discarding event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::PlotPoint;

    #[tokio::test]
    async fn test_channel_sink_forwards_in_order() {
        let (sink, mut rx) = ChannelSink::channel();

        let point = PlotPoint {
            outbound: 180,
            inbound: 250,
            at: chrono::Utc::now(),
        };
        sink.report(&ReportEvent::LogLines(vec!["hello".to_string()]))
            .await;
        sink.report(&ReportEvent::PlotPoint(point)).await;

        assert_eq!(
            rx.recv().await,
            Some(ReportEvent::LogLines(vec!["hello".to_string()]))
        );
        assert_eq!(rx.recv().await, Some(ReportEvent::PlotPoint(point)));
    }

    #[tokio::test]
    async fn test_channel_sink_survives_closed_receiver() {
        let (sink, rx) = ChannelSink::channel();
        drop(rx);
        sink.report(&ReportEvent::SettingsInfo(vec![])).await;
    }

    #[tokio::test]
    async fn test_tracing_sink_accepts_all_events() {
        let sink = TracingSink;
        sink.report(&ReportEvent::SettingsInfo(vec!["Route: OAK -> DEN".to_string()]))
            .await;
        sink.report(&ReportEvent::LogLines(vec!["line".to_string()]))
            .await;
    }
}
