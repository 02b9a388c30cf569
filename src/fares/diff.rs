//! Fare deltas, trend classification and cycle validity

use serde::{Deserialize, Serialize};

use super::extract::Fare;
use super::snapshot::{Direction, FareSnapshot};

/// Direction a fare moved since the last committed snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Unchanged,
    Unknown,
}

/// Change for one leg of the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegDiff {
    /// `previous - current`; positive means the fare dropped.
    /// `None` when either side is missing.
    pub delta: Option<i64>,
    pub trend: Trend,
}

impl LegDiff {
    const UNKNOWN: LegDiff = LegDiff {
        delta: None,
        trend: Trend::Unknown,
    };

    fn between(previous: Option<Fare>, current: Option<Fare>) -> Self {
        match (previous, current) {
            (Some(prev), Some(cur)) => {
                let delta = i64::from(prev) - i64::from(cur);
                let trend = match delta {
                    d if d > 0 => Trend::Down,
                    d if d < 0 => Trend::Up,
                    _ => Trend::Unchanged,
                };
                LegDiff {
                    delta: Some(delta),
                    trend,
                }
            }
            _ => Self::UNKNOWN,
        }
    }
}

/// Comparison of a fresh snapshot against the last committed one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub outbound: LegDiff,
    #[serde(rename = "return")]
    pub inbound: LegDiff,
    /// False when either leg of the current snapshot is missing
    pub is_valid: bool,
}

impl DiffResult {
    pub fn leg(&self, direction: Direction) -> &LegDiff {
        match direction {
            Direction::Outbound => &self.outbound,
            Direction::Return => &self.inbound,
        }
    }
}

/// Compare `current` against the previously committed snapshot.
///
/// A missing previous value only makes the trend unknown. A missing
/// current value makes the whole cycle invalid so it is never committed.
pub fn diff(previous: Option<&FareSnapshot>, current: &FareSnapshot) -> DiffResult {
    let prev = |direction| previous.and_then(|p: &FareSnapshot| p.get(direction));

    DiffResult {
        outbound: LegDiff::between(prev(Direction::Outbound), current.outbound),
        inbound: LegDiff::between(prev(Direction::Return), current.inbound),
        is_valid: current.is_complete(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_drop_and_unchanged() {
        let previous = FareSnapshot::complete(200, 250);
        let current = FareSnapshot::complete(180, 250);

        let result = diff(Some(&previous), &current);
        assert!(result.is_valid);
        assert_eq!(result.outbound.delta, Some(20));
        assert_eq!(result.outbound.trend, Trend::Down);
        assert_eq!(result.inbound.delta, Some(0));
        assert_eq!(result.inbound.trend, Trend::Unchanged);
    }

    #[test]
    fn test_price_increase() {
        let previous = FareSnapshot::complete(200, 250);
        let current = FareSnapshot::complete(215, 260);

        let result = diff(Some(&previous), &current);
        assert_eq!(result.outbound.delta, Some(-15));
        assert_eq!(result.outbound.trend, Trend::Up);
        assert_eq!(result.leg(Direction::Return).trend, Trend::Up);
    }

    #[test]
    fn test_missing_current_leg_is_invalid() {
        let previous = FareSnapshot::complete(200, 250);
        let current = FareSnapshot::new(None, Some(240));

        let result = diff(Some(&previous), &current);
        assert!(!result.is_valid);
        assert_eq!(result.outbound.delta, None);
        assert_eq!(result.outbound.trend, Trend::Unknown);
        assert_eq!(result.inbound.delta, Some(10));
        assert_eq!(result.inbound.trend, Trend::Down);

        let result = diff(None, &current);
        assert!(!result.is_valid);

        let result = diff(Some(&previous), &FareSnapshot::default());
        assert!(!result.is_valid);
    }

    #[test]
    fn test_first_cycle_is_valid_with_unknown_trends() {
        let current = FareSnapshot::complete(300, 310);

        let result = diff(None, &current);
        assert!(result.is_valid);
        assert_eq!(result.outbound, LegDiff::UNKNOWN);
        assert_eq!(result.inbound, LegDiff::UNKNOWN);
    }

    #[test]
    fn test_partial_previous_leaves_that_leg_unknown() {
        let previous = FareSnapshot::new(Some(120), None);
        let current = FareSnapshot::complete(130, 90);

        let result = diff(Some(&previous), &current);
        assert!(result.is_valid);
        assert_eq!(result.outbound.trend, Trend::Up);
        assert_eq!(result.inbound.trend, Trend::Unknown);
    }

    #[test]
    fn test_diff_is_pure() {
        let previous = FareSnapshot::complete(200, 250);
        let current = FareSnapshot::complete(180, 265);

        assert_eq!(
            diff(Some(&previous), &current),
            diff(Some(&previous), &current)
        );
    }
}
