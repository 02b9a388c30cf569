//! Last committed fares

use crate::fares::FareSnapshot;

/// Holds the most recent snapshot that passed validation.
///
/// Owned by the scheduler, which is the only writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerState {
    last_committed: Option<FareSnapshot>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the committed snapshot. Only call with snapshots whose diff was valid.
    pub fn commit(&mut self, snapshot: FareSnapshot) {
        self.last_committed = Some(snapshot);
    }

    /// Baseline for the next diff, `None` before the first commit
    pub fn read(&self) -> Option<&FareSnapshot> {
        self.last_committed.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        assert_eq!(TrackerState::new().read(), None);
    }

    #[test]
    fn test_commit_overwrites() {
        let mut state = TrackerState::new();
        state.commit(FareSnapshot::complete(300, 310));
        state.commit(FareSnapshot::complete(280, 310));
        assert_eq!(state.read(), Some(&FareSnapshot::complete(280, 310)));
    }
}
