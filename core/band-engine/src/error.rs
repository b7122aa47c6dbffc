//! FILENAME: core/band-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BandError {
    #[error("level {level} is outside 1..={max}")]
    LevelOutOfRange { level: usize, max: usize },

    #[error("aggregate is already finished; {operation} rejected")]
    AggregateFinished { operation: &'static str },

    #[error("aggregate at level {level} is still borrowed by a consumer")]
    AggregateInUse { level: usize },

    /// `row` is the zero-based position in the input.
    #[error("row {row} sorts before the row preceding it")]
    OutOfOrder { row: usize },

    #[error("grouping policy failed: {0}")]
    Policy(String),

    #[error("aggregate failed: {0}")]
    Aggregate(String),
}
