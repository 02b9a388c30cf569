//! Latest-state board behind the status endpoint

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use super::{DisplaySink, PlotPoint, ReportEvent};

/// What the status endpoint shows. Only the most recent values are kept.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoardSnapshot {
    pub settings: Vec<String>,
    pub latest_lines: Vec<String>,
    pub latest_point: Option<PlotPoint>,
    /// Number of events received
    pub reports: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Display sink that remembers the latest report of each kind
#[derive(Debug, Default)]
pub struct StatusBoard {
    inner: RwLock<BoardSnapshot>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.inner.read().clone()
    }
}

#[async_trait]
impl DisplaySink for StatusBoard {
    async fn report(&self, event: &ReportEvent) {
        let mut board = self.inner.write();
        match event {
            ReportEvent::LogLines(lines) => board.latest_lines = lines.clone(),
            ReportEvent::PlotPoint(point) => board.latest_point = Some(*point),
            ReportEvent::SettingsInfo(lines) => board.settings = lines.clone(),
        }
        board.reports += 1;
        board.updated_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_board_keeps_latest_only() {
        let board = StatusBoard::new();
        assert_eq!(board.snapshot().reports, 0);

        board
            .report(&ReportEvent::LogLines(vec!["first".to_string()]))
            .await;
        board
            .report(&ReportEvent::LogLines(vec!["second".to_string()]))
            .await;
        board
            .report(&ReportEvent::SettingsInfo(vec!["Passengers: 1".to_string()]))
            .await;

        let snapshot = board.snapshot();
        assert_eq!(snapshot.latest_lines, vec!["second".to_string()]);
        assert_eq!(snapshot.settings, vec!["Passengers: 1".to_string()]);
        assert_eq!(snapshot.latest_point, None);
        assert_eq!(snapshot.reports, 3);
        assert!(snapshot.updated_at.is_some());
    }
}
