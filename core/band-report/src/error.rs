//! FILENAME: core/band-report/src/error.rs

use band_engine::{BandError, BindingKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error(transparent)]
    Band(#[from] BandError),

    #[error("no band for {kind:?} at level {level} ({level_count} group levels)")]
    UnmappedBinding {
        level: usize,
        kind: BindingKind,
        level_count: usize,
    },

    #[error("sink failed: {0}")]
    Sink(String),
}
