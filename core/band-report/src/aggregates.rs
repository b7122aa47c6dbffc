//! FILENAME: core/band-report/src/aggregates.rs
//! Ready-made aggregates for keyed reports.
//!
//! Detail rows reach every group level 1..=N directly, so a group level must
//! not also merge the totals of its closed children: that would count each
//! row twice. The grand-total level receives no rows at all; it merges the
//! totals of closed level-N groups and nothing else.

use std::fmt;
use std::rc::Rc;

use band_engine::{Aggregate, BandError, LevelRollup};
use serde::{Deserialize, Serialize};

// ============================================================================
// AGGREGATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationType {
    Sum,
    Count,
    CountNumbers,
    Average,
    Min,
    Max,
}

/// Running state for every `AggregationType`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accumulator {
    pub sum: f64,
    pub count: u64,
    pub count_numbers: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Accumulator {
    pub fn new() -> Self {
        Accumulator::default()
    }

    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.count_numbers += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// A row without a numeric measure: counted, not summed.
    pub fn add_non_number(&mut self) {
        self.count += 1;
    }

    pub fn merge(&mut self, other: &Accumulator) {
        self.sum += other.sum;
        self.count += other.count;
        self.count_numbers += other.count_numbers;
        if let Some(other_min) = other.min {
            self.min = Some(self.min.map_or(other_min, |m| m.min(other_min)));
        }
        if let Some(other_max) = other.max {
            self.max = Some(self.max.map_or(other_max, |m| m.max(other_max)));
        }
    }

    pub fn compute(&self, aggregation: AggregationType) -> f64 {
        match aggregation {
            AggregationType::Sum => self.sum,
            AggregationType::Count => self.count as f64,
            AggregationType::CountNumbers => self.count_numbers as f64,
            AggregationType::Average => {
                if self.count_numbers > 0 {
                    self.sum / (self.count_numbers as f64)
                } else {
                    0.0
                }
            }
            AggregationType::Min => self.min.unwrap_or(0.0),
            AggregationType::Max => self.max.unwrap_or(0.0),
        }
    }
}

/// True when an aggregate at `level` should merge a closed child at
/// `child_level`.
fn merges_child(level: usize, level_count: usize, child_level: usize) -> bool {
    level == level_count + 1 && child_level == level_count
}

// ============================================================================
// ROW COUNT
// ============================================================================

/// Counts detail rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCount {
    rollup: LevelRollup,
    level: usize,
    level_count: usize,
    rows: u64,
}

impl RowCount {
    pub fn for_level(level: usize, level_count: usize) -> Self {
        RowCount {
            level,
            level_count,
            ..RowCount::default()
        }
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_grand_total(&self) -> bool {
        self.level == self.level_count + 1
    }

    pub fn child_count(&self, level: usize) -> u32 {
        self.rollup.child_count(level)
    }
}

impl<R> Aggregate<R> for RowCount {
    fn accumulate(&mut self, _row: &R) -> Result<(), BandError> {
        self.rollup.ensure_open("accumulate")?;
        self.rows += 1;
        Ok(())
    }

    fn accumulate_level(&mut self, child: &Self, level: usize) -> Result<(), BandError> {
        self.rollup.accumulate_level(level)?;
        if merges_child(self.level, self.level_count, level) {
            self.rows += child.rows;
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.rollup.finish();
    }

    fn is_finished(&self) -> bool {
        self.rollup.is_finished()
    }

    fn clear(&mut self) {
        self.rollup.clear();
        self.rows = 0;
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

/// Extracts the numeric measure of a row; None counts the row without a value.
pub type Measure<R> = Rc<dyn Fn(&R) -> Option<f64>>;

pub fn measure<R>(f: impl Fn(&R) -> Option<f64> + 'static) -> Measure<R> {
    Rc::new(f)
}

/// Sum, count, min, max and average of one measure.
pub struct Summary<R> {
    rollup: LevelRollup,
    level: usize,
    level_count: usize,
    measure: Measure<R>,
    acc: Accumulator,
}

impl<R> Summary<R> {
    pub fn new(level: usize, level_count: usize, measure: Measure<R>) -> Self {
        Summary {
            rollup: LevelRollup::new(),
            level,
            level_count,
            measure,
            acc: Accumulator::new(),
        }
    }

    /// A factory for `KeyedPolicy::new` that shares one measure.
    pub fn factory(measure: Measure<R>) -> impl Fn(usize, usize) -> Summary<R> {
        move |level, level_count| Summary::new(level, level_count, Rc::clone(&measure))
    }

    pub fn value(&self, aggregation: AggregationType) -> f64 {
        self.acc.compute(aggregation)
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.acc
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_grand_total(&self) -> bool {
        self.level == self.level_count + 1
    }

    pub fn child_count(&self, level: usize) -> u32 {
        self.rollup.child_count(level)
    }
}

impl<R> fmt::Debug for Summary<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Summary")
            .field("level", &self.level)
            .field("acc", &self.acc)
            .field("finished", &self.rollup.is_finished())
            .finish()
    }
}

impl<R> Aggregate<R> for Summary<R> {
    fn accumulate(&mut self, row: &R) -> Result<(), BandError> {
        self.rollup.ensure_open("accumulate")?;
        match (self.measure)(row) {
            Some(value) => self.acc.add_number(value),
            None => self.acc.add_non_number(),
        }
        Ok(())
    }

    fn accumulate_level(&mut self, child: &Self, level: usize) -> Result<(), BandError> {
        self.rollup.accumulate_level(level)?;
        if merges_child(self.level, self.level_count, level) {
            self.acc.merge(&child.acc);
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.rollup.finish();
    }

    fn is_finished(&self) -> bool {
        self.rollup.is_finished()
    }

    fn clear(&mut self) {
        self.rollup.clear();
        self.acc = Accumulator::new();
    }
}
