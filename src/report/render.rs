//! Text rendering of fares and trends

use crate::fares::{DiffResult, Fare, FareSnapshot, LegDiff, Trend};

/// Short trend tag such as `(down $20)`; `None` when there is nothing to compare
pub fn trend_label(leg: &LegDiff) -> Option<String> {
    let delta = leg.delta?;
    match leg.trend {
        Trend::Down => Some(format!("(down ${})", delta.abs())),
        Trend::Up => Some(format!("(up ${})", delta.abs())),
        Trend::Unchanged => Some("(no change)".to_string()),
        Trend::Unknown => None,
    }
}

fn leg_text(fare: Option<Fare>, leg: &LegDiff) -> String {
    let price = match fare {
        Some(f) => format!("${}", f),
        None => "unavailable".to_string(),
    };
    match trend_label(leg) {
        Some(label) => format!("{} {}", price, label),
        None => price,
    }
}

/// Log lines describing the lowest fares of a cycle
pub fn fare_summary(snapshot: &FareSnapshot, diff: &DiffResult) -> Vec<String> {
    vec![
        format!(
            "Lowest fare for outbound flight is currently {},",
            leg_text(snapshot.outbound, &diff.outbound)
        ),
        format!(
            "while the cheapest return flight is {}.",
            leg_text(snapshot.inbound, &diff.inbound)
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fares::diff;

    #[test]
    fn test_trend_labels() {
        let previous = FareSnapshot::complete(200, 250);
        let result = diff(Some(&previous), &FareSnapshot::complete(180, 265));

        assert_eq!(trend_label(&result.outbound).as_deref(), Some("(down $20)"));
        assert_eq!(trend_label(&result.inbound).as_deref(), Some("(up $15)"));

        let result = diff(Some(&previous), &previous);
        assert_eq!(trend_label(&result.outbound).as_deref(), Some("(no change)"));
    }

    #[test]
    fn test_unknown_trend_has_no_label() {
        let result = diff(None, &FareSnapshot::complete(300, 310));
        assert_eq!(trend_label(&result.outbound), None);
    }

    #[test]
    fn test_fare_summary() {
        let current = FareSnapshot::complete(180, 250);
        let result = diff(Some(&FareSnapshot::complete(200, 250)), &current);

        let lines = fare_summary(&current, &result);
        assert_eq!(
            lines,
            vec![
                "Lowest fare for outbound flight is currently $180 (down $20),".to_string(),
                "while the cheapest return flight is $250 (no change).".to_string(),
            ]
        );

        let first = fare_summary(&current, &diff(None, &current));
        assert_eq!(first[0], "Lowest fare for outbound flight is currently $180,");
    }
}
