//! Raw observation batches and the per-cycle fare snapshot

use std::fmt;

use serde::{Deserialize, Serialize};

use super::extract::{extract, Fare};

/// Leg of the round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Return,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Outbound => "outbound",
            Direction::Return => "return",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw price fragments collected during one fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawObservationBatch {
    outbound: Vec<String>,
    inbound: Vec<String>,
}

impl RawObservationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment for a direction, keeping arrival order
    pub fn push(&mut self, direction: Direction, fragment: impl Into<String>) {
        self.fragments_mut(direction).push(fragment.into());
    }

    /// Builder-style variant of [`push`](Self::push)
    pub fn with(mut self, direction: Direction, fragment: impl Into<String>) -> Self {
        self.push(direction, fragment);
        self
    }

    pub fn fragments(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Outbound => &self.outbound,
            Direction::Return => &self.inbound,
        }
    }

    fn fragments_mut(&mut self, direction: Direction) -> &mut Vec<String> {
        match direction {
            Direction::Outbound => &mut self.outbound,
            Direction::Return => &mut self.inbound,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outbound.is_empty() && self.inbound.is_empty()
    }

    pub fn len(&self) -> usize {
        self.outbound.len() + self.inbound.len()
    }
}

/// Lowest parsed fare per direction for one cycle
///
/// `None` means no fragment for that direction parsed this cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareSnapshot {
    pub outbound: Option<Fare>,
    #[serde(rename = "return")]
    pub inbound: Option<Fare>,
}

impl FareSnapshot {
    pub fn new(outbound: Option<Fare>, inbound: Option<Fare>) -> Self {
        Self { outbound, inbound }
    }

    /// Snapshot with both legs known
    pub fn complete(outbound: Fare, inbound: Fare) -> Self {
        Self::new(Some(outbound), Some(inbound))
    }

    pub fn get(&self, direction: Direction) -> Option<Fare> {
        match direction {
            Direction::Outbound => self.outbound,
            Direction::Return => self.inbound,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.outbound.is_some() && self.inbound.is_some()
    }
}

/// Reduce a batch to the lowest valid fare per direction.
///
/// Fragments that fail extraction are dropped; a direction with no
/// surviving fares stays `None`.
pub fn aggregate(batch: &RawObservationBatch) -> FareSnapshot {
    FareSnapshot {
        outbound: lowest(batch.fragments(Direction::Outbound)),
        inbound: lowest(batch.fragments(Direction::Return)),
    }
}

fn lowest(fragments: &[String]) -> Option<Fare> {
    fragments
        .iter()
        .filter_map(|raw| match extract(raw) {
            Ok(fare) => Some(fare),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unparseable fare fragment");
                None
            }
        })
        .min()
}
