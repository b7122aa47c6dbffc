//! FILENAME: core/band-engine/src/policy.rs
//! Grouping Policy - The caller-supplied hooks that define a report's groups.
//!
//! The builder never inspects rows itself. Everything it knows about them
//! comes from the three hooks: how many group levels exist, how two rows
//! compare at one level, and which aggregate to open for a level.

use std::cmp::Ordering;

use crate::aggregate::Aggregate;
use crate::error::BandError;

pub trait GroupingPolicy {
    type Row;
    type Aggregate: Aggregate<Self::Row>;

    /// Number of group levels (N). Level N+1 is the whole report.
    fn level_count(&self) -> usize;

    /// Compares two rows on the key of group `level` (1..=N).
    fn compare_level(
        &self,
        a: &Self::Row,
        b: &Self::Row,
        level: usize,
    ) -> Result<Ordering, BandError>;

    /// Creates the aggregate for a new group instance at `level` (1..=N+1).
    fn new_aggregate(&self, level: usize) -> Result<Self::Aggregate, BandError>;
}

impl<P: GroupingPolicy + ?Sized> GroupingPolicy for &P {
    type Row = P::Row;
    type Aggregate = P::Aggregate;

    fn level_count(&self) -> usize {
        (**self).level_count()
    }

    fn compare_level(
        &self,
        a: &Self::Row,
        b: &Self::Row,
        level: usize,
    ) -> Result<Ordering, BandError> {
        (**self).compare_level(a, b, level)
    }

    fn new_aggregate(&self, level: usize) -> Result<Self::Aggregate, BandError> {
        (**self).new_aggregate(level)
    }
}

// ============================================================================
// COMPOSITE ORDER
// ============================================================================

/// Compares two rows on the composite key: level N first, level 1 last.
pub fn compare_rows<P: GroupingPolicy + ?Sized>(
    policy: &P,
    a: &P::Row,
    b: &P::Row,
) -> Result<Ordering, BandError> {
    for level in (1..=policy.level_count()).rev() {
        let ord = policy.compare_level(a, b, level)?;
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
    Ok(Ordering::Equal)
}

/// Stable sort by the composite grouping key.
/// The first comparator failure aborts the sort and is returned.
pub fn sort<P, I>(policy: &P, rows: I) -> Result<Vec<P::Row>, BandError>
where
    P: GroupingPolicy + ?Sized,
    I: IntoIterator<Item = P::Row>,
{
    let rows: Vec<P::Row> = rows.into_iter().collect();
    merge_sort_by(rows, &mut |a: &P::Row, b: &P::Row| compare_rows(policy, a, b))
}

/// Top-down merge sort with a fallible comparator.
/// Equal elements keep their input order.
fn merge_sort_by<T, F>(mut items: Vec<T>, cmp: &mut F) -> Result<Vec<T>, BandError>
where
    F: FnMut(&T, &T) -> Result<Ordering, BandError>,
{
    if items.len() <= 1 {
        return Ok(items);
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, cmp)?;
    let right = merge_sort_by(right, cmp)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            // Only a strictly smaller right element may overtake the left one.
            (Some(l), Some(r)) => cmp(r, l)? == Ordering::Less,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        let next = if take_right { right.next() } else { left.next() };
        merged.extend(next);
    }
    Ok(merged)
}
