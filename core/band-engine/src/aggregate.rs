//! FILENAME: core/band-engine/src/aggregate.rs
//! Aggregates - The per-level accumulators of a grouped stream.
//!
//! One live aggregate exists per level while a stream is built. It receives
//! every detail row of its open group (levels 1..=N) and, when a descendant
//! group closes, the closed descendant aggregate itself (rollup).
//!
//! `LevelRollup` is the reusable bookkeeping part: domain aggregates embed it
//! and delegate `finish`/`is_finished`/`clear` and the descendant counting to it.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::BandError;

/// Shared handle to a live aggregate.
/// The HEADER and FOOTER bindings of one group instance hold clones of the
/// same handle, so a header payload keeps changing until the group closes.
pub type AggregateRef<A> = Rc<RefCell<A>>;

// ============================================================================
// AGGREGATE CONTRACT
// ============================================================================

/// A mutable accumulator summarizing one group instance at one level.
pub trait Aggregate<R> {
    /// Folds one detail row into this aggregate.
    fn accumulate(&mut self, row: &R) -> Result<(), BandError>;

    /// Folds a just-closed descendant aggregate (at `level`) into this one.
    fn accumulate_level(&mut self, child: &Self, level: usize) -> Result<(), BandError> {
        let _ = (child, level);
        Ok(())
    }

    /// Closes the aggregate. No accumulation is accepted afterwards.
    fn finish(&mut self);

    fn is_finished(&self) -> bool;

    /// Resets to the empty state.
    fn clear(&mut self);
}

// ============================================================================
// LEVEL ROLLUP BASE
// ============================================================================

/// Counts, per descendant level, how many closed child aggregates rolled up
/// into the owning aggregate, and tracks the finished flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRollup {
    child_counts: FxHashMap<usize, u32>,
    finished: bool,
}

impl LevelRollup {
    pub fn new() -> Self {
        LevelRollup::default()
    }

    /// Fails with `AggregateFinished` once `finish` has been called.
    pub fn ensure_open(&self, operation: &'static str) -> Result<(), BandError> {
        if self.finished {
            return Err(BandError::AggregateFinished { operation });
        }
        Ok(())
    }

    /// Records one closed descendant aggregate at `level`.
    pub fn accumulate_level(&mut self, level: usize) -> Result<(), BandError> {
        self.ensure_open("accumulate_level")?;
        *self.child_counts.entry(level).or_insert(0) += 1;
        Ok(())
    }

    /// Number of closed descendant aggregates at `level` rolled into this one.
    pub fn child_count(&self, level: usize) -> u32 {
        self.child_counts.get(&level).copied().unwrap_or(0)
    }

    /// Total across all descendant levels.
    pub fn total_children(&self) -> u32 {
        self.child_counts.values().sum()
    }

    /// Descendant levels that have received at least one rollup, ascending.
    pub fn levels(&self) -> Vec<usize> {
        let mut levels: Vec<usize> = self.child_counts.keys().copied().collect();
        levels.sort_unstable();
        levels
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn clear(&mut self) {
        self.child_counts.clear();
        self.finished = false;
    }
}
