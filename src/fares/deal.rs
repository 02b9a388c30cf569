//! Deal threshold evaluation

use serde::{Deserialize, Serialize};

use super::extract::Fare;
use super::snapshot::FareSnapshot;

/// Outcome of checking a snapshot against the deal threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertDecision {
    pub fire: bool,
    pub message: String,
}

impl AlertDecision {
    fn quiet(message: String) -> Self {
        Self {
            fire: false,
            message,
        }
    }
}

/// Decide whether a snapshot is a deal.
///
/// With no threshold configured this never fires. Otherwise it fires
/// when either known leg is at or below the threshold.
pub fn evaluate(snapshot: &FareSnapshot, threshold: Option<Fare>) -> AlertDecision {
    let fares = describe(snapshot);

    let Some(threshold) = threshold else {
        return AlertDecision::quiet(format!("Deal alerts disabled: {}", fares));
    };

    let is_deal = [snapshot.outbound, snapshot.inbound]
        .into_iter()
        .flatten()
        .any(|fare| fare <= threshold);

    if is_deal {
        AlertDecision {
            fire: true,
            message: format!("Deal alert! {} (deal price ${})", fares, threshold),
        }
    } else {
        AlertDecision::quiet(format!("No deal: {} (deal price ${})", fares, threshold))
    }
}

fn describe(snapshot: &FareSnapshot) -> String {
    let leg = |fare: Option<Fare>| match fare {
        Some(f) => format!("${}", f),
        None => "unavailable".to_string(),
    };
    format!(
        "outbound fare {}, return fare {}",
        leg(snapshot.outbound),
        leg(snapshot.inbound)
    )
}
