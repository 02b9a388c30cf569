//! Fare pipeline: extraction, aggregation, diffing and deal evaluation
//!
//! Everything here is synchronous and side-effect free.

pub mod deal;
pub mod diff;
pub mod extract;
pub mod snapshot;

pub use deal::{evaluate, AlertDecision};
pub use diff::{diff, DiffResult, LegDiff, Trend};
pub use extract::{extract, Fare, ParseFailure};
pub use snapshot::{aggregate, Direction, FareSnapshot, RawObservationBatch};
