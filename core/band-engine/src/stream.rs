//! FILENAME: core/band-engine/src/stream.rs
//! Grouped Stream - Turns ordered rows into header/detail/footer bindings.
//!
//! The builder holds the policy and options; `build` returns a
//! `GroupedStream`, a pull-based iterator that owns all per-build state:
//! - one live aggregate per level 1..=N+1
//! - the previous row (None until the first row has been accumulated)
//! - a queue of pending steps for the element being processed
//!
//! Every `next()` runs queued steps until one produces a binding. Closing a
//! group (finish, rollup, replace) happens when its FOOTER is produced, and a
//! detail row is folded into the aggregates only after its DETAIL binding has
//! been handed out. A consumer therefore sees each HEADER before any row of
//! that group has been accumulated.
//!
//! Rows must already be in the composite grouping order (see `policy::sort`).

use std::cell::{RefCell, RefMut};
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::iter::{Fuse, FusedIterator};
use std::rc::Rc;

use smallvec::SmallVec;

use crate::aggregate::{Aggregate, AggregateRef};
use crate::binding::Binding;
use crate::error::BandError;
use crate::options::{GrandRollup, StreamOptions};
use crate::policy::{compare_rows, sort, GroupingPolicy};

type BindingOf<P> = Binding<<P as GroupingPolicy>::Row, <P as GroupingPolicy>::Aggregate>;

// ============================================================================
// BUILDER
// ============================================================================

/// Builds grouped streams for one grouping policy.
/// Holds no per-build state; every `build` call is independent.
#[derive(Debug, Clone)]
pub struct GroupedStreamBuilder<P> {
    policy: P,
    options: StreamOptions,
}

impl<P: GroupingPolicy> GroupedStreamBuilder<P> {
    pub fn new(policy: P) -> Self {
        GroupedStreamBuilder {
            policy,
            options: StreamOptions::default(),
        }
    }

    pub fn with_options(policy: P, options: StreamOptions) -> Self {
        GroupedStreamBuilder { policy, options }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn options(&self) -> &StreamOptions {
        &self.options
    }

    /// Stable sort by the composite grouping key (most general level first).
    pub fn sort<I>(&self, rows: I) -> Result<Vec<P::Row>, BandError>
    where
        I: IntoIterator<Item = P::Row>,
    {
        sort(&self.policy, rows)
    }

    /// Starts a grouped stream over rows that are already sorted.
    /// Creates the N+1 initial aggregates, so policy failures surface here.
    pub fn build<I>(&self, rows: I) -> Result<GroupedStream<'_, P, I::IntoIter>, BandError>
    where
        I: IntoIterator<Item = P::Row>,
    {
        GroupedStream::new(&self.policy, self.options, rows.into_iter())
    }

    /// Sorts, then builds.
    pub fn sort_and_build<I>(
        &self,
        rows: I,
    ) -> Result<GroupedStream<'_, P, std::vec::IntoIter<P::Row>>, BandError>
    where
        I: IntoIterator<Item = P::Row>,
    {
        let sorted = self.sort(rows)?;
        self.build(sorted)
    }
}

// ============================================================================
// STREAM STATE MACHINE
// ============================================================================

/// One unit of pending work for the element being processed.
enum Step<R> {
    /// Emit the HEADER of the group at `level`, using its current aggregate.
    Open { level: usize, anchor: Rc<R> },
    /// Finish the aggregate at `level`, roll it up into levels
    /// `level+1..=rollup_to`, emit its FOOTER and, if `reopen`, replace it
    /// with a fresh aggregate.
    Close {
        level: usize,
        rollup_to: usize,
        reopen: bool,
        anchor: Rc<R>,
    },
    Detail(Rc<R>),
    /// Fold the row into levels 1..=N and remember it as the previous row.
    Accumulate(Rc<R>),
    /// The extra grand-total FOOTER of `repeat_grand_footer`.
    RepeatGrandFooter(Rc<R>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Streaming,
    /// End-of-stream steps are queued; nothing more to pull from the input.
    Ending,
    Done,
}

/// A lazy, single-pass sequence of bindings.
///
/// Yields `Err` at most once: after a failure the stream is exhausted.
pub struct GroupedStream<'p, P: GroupingPolicy, I> {
    policy: &'p P,
    options: StreamOptions,
    rows: Fuse<I>,
    level_count: usize,
    /// Live aggregates; `slots[level - 1]` for level 1..=N+1.
    slots: SmallVec<[AggregateRef<P::Aggregate>; 8]>,
    previous: Option<Rc<P::Row>>,
    pending: VecDeque<Step<P::Row>>,
    phase: Phase,
    rows_seen: usize,
    emitted: usize,
}

impl<'p, P, I> GroupedStream<'p, P, I>
where
    P: GroupingPolicy,
    I: Iterator<Item = P::Row>,
{
    fn new(policy: &'p P, options: StreamOptions, rows: I) -> Result<Self, BandError> {
        let level_count = policy.level_count();
        band_debug!("STREAM", "build level_count={} options={:?}", level_count, options);

        let mut slots = SmallVec::with_capacity(level_count + 1);
        for level in 1..=level_count + 1 {
            slots.push(create_aggregate(policy, level)?);
        }

        Ok(GroupedStream {
            policy,
            options,
            rows: rows.fuse(),
            level_count,
            slots,
            previous: None,
            pending: VecDeque::new(),
            phase: Phase::Streaming,
            rows_seen: 0,
            emitted: 0,
        })
    }

    /// Number of group levels (N).
    pub fn level_count(&self) -> usize {
        self.level_count
    }

    /// The whole-report level (N+1).
    pub fn grand_level(&self) -> usize {
        self.level_count + 1
    }

    /// Real rows pulled from the input so far.
    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }

    /// Bindings handed out so far.
    pub fn bindings_emitted(&self) -> usize {
        self.emitted
    }

    /// The live aggregate currently open at `level` (1..=N+1).
    pub fn aggregate(&self, level: usize) -> Option<&AggregateRef<P::Aggregate>> {
        level.checked_sub(1).and_then(|index| self.slots.get(index))
    }

    // ------------------------------------------------------------------------
    // Planning: turn one input element into queued steps
    // ------------------------------------------------------------------------

    /// Pulls the next input element and queues its steps.
    fn advance(&mut self) -> Result<(), BandError> {
        match self.rows.next() {
            Some(row) => self.plan_row(Rc::new(row)),
            None => {
                self.plan_end();
                Ok(())
            }
        }
    }

    fn plan_row(&mut self, current: Rc<P::Row>) -> Result<(), BandError> {
        let row_index = self.rows_seen;
        self.rows_seen += 1;

        let break_level = match self.previous.clone() {
            None => {
                let grand_level = self.grand_level();
                self.pending.push_back(Step::Open {
                    level: grand_level,
                    anchor: Rc::clone(&current),
                });
                self.level_count
            }
            Some(previous) => {
                if self.options.check_order
                    && compare_rows(self.policy, &*previous, &*current)? == Ordering::Greater
                {
                    return Err(BandError::OutOfOrder { row: row_index });
                }

                let break_level = self.break_level(&previous, &current)?;
                let rollup_to = match self.options.grand_rollup {
                    GrandRollup::AtEndOnly => self.level_count,
                    GrandRollup::OnEveryClose => self.grand_level(),
                };
                for level in 1..=break_level {
                    self.pending.push_back(Step::Close {
                        level,
                        rollup_to,
                        reopen: true,
                        anchor: Rc::clone(&previous),
                    });
                }
                break_level
            }
        };

        for level in (1..=break_level).rev() {
            self.pending.push_back(Step::Open {
                level,
                anchor: Rc::clone(&current),
            });
        }
        self.pending.push_back(Step::Detail(Rc::clone(&current)));
        self.pending.push_back(Step::Accumulate(current));
        Ok(())
    }

    /// The most general level whose key differs between the two rows, or 0.
    fn break_level(&self, previous: &P::Row, current: &P::Row) -> Result<usize, BandError> {
        for level in (1..=self.level_count).rev() {
            if self.policy.compare_level(previous, current, level)? != Ordering::Equal {
                return Ok(level);
            }
        }
        Ok(0)
    }

    fn plan_end(&mut self) {
        self.phase = Phase::Ending;

        // No rows, no bindings: not even the report header/footer.
        let Some(last) = self.previous.clone() else {
            return;
        };

        let grand_level = self.grand_level();
        for level in 1..=grand_level {
            self.pending.push_back(Step::Close {
                level,
                rollup_to: grand_level,
                reopen: false,
                anchor: Rc::clone(&last),
            });
        }
        if self.options.repeat_grand_footer {
            self.pending.push_back(Step::RepeatGrandFooter(last));
        }
    }

    // ------------------------------------------------------------------------
    // Execution: run one queued step
    // ------------------------------------------------------------------------

    fn run(&mut self, step: Step<P::Row>) -> Result<Option<BindingOf<P>>, BandError> {
        match step {
            Step::Open { level, anchor } => {
                let agg = Rc::clone(self.slot(level)?);
                Ok(Some(Binding::header(level, agg, anchor)))
            }
            Step::Close {
                level,
                rollup_to,
                reopen,
                anchor,
            } => self.close(level, rollup_to, reopen, anchor).map(Some),
            Step::Detail(row) => Ok(Some(Binding::detail(row))),
            Step::Accumulate(row) => {
                for level in 1..=self.level_count {
                    self.borrow_mut(level)?.accumulate(&row)?;
                }
                self.previous = Some(row);
                Ok(None)
            }
            Step::RepeatGrandFooter(anchor) => {
                let level = self.grand_level();
                let agg = Rc::clone(self.slot(level)?);
                Ok(Some(Binding::footer(level, agg, anchor)))
            }
        }
    }

    fn close(
        &mut self,
        level: usize,
        rollup_to: usize,
        reopen: bool,
        anchor: Rc<P::Row>,
    ) -> Result<BindingOf<P>, BandError> {
        band_trace!("STREAM", "close level={} rollup_to={} reopen={}", level, rollup_to, reopen);

        let closing = Rc::clone(self.slot(level)?);
        {
            let mut agg = closing
                .try_borrow_mut()
                .map_err(|_| BandError::AggregateInUse { level })?;
            agg.finish();
        }
        {
            let child = closing
                .try_borrow()
                .map_err(|_| BandError::AggregateInUse { level })?;
            for parent in level + 1..=rollup_to {
                self.borrow_mut(parent)?.accumulate_level(&child, level)?;
            }
        }
        if reopen {
            self.slots[level - 1] = create_aggregate(self.policy, level)?;
        }
        Ok(Binding::footer(level, closing, anchor))
    }

    fn slot(&self, level: usize) -> Result<&AggregateRef<P::Aggregate>, BandError> {
        self.aggregate(level).ok_or(BandError::LevelOutOfRange {
            level,
            max: self.level_count + 1,
        })
    }

    fn borrow_mut(&self, level: usize) -> Result<RefMut<'_, P::Aggregate>, BandError> {
        self.slot(level)?
            .try_borrow_mut()
            .map_err(|_| BandError::AggregateInUse { level })
    }

    fn fail(&mut self, err: &BandError) {
        band_warn!("STREAM", "aborting after {} rows: {}", self.rows_seen, err);
        self.pending.clear();
        self.phase = Phase::Done;
    }
}

/// Calls the policy factory and clears the result.
fn create_aggregate<P: GroupingPolicy>(
    policy: &P,
    level: usize,
) -> Result<AggregateRef<P::Aggregate>, BandError> {
    let mut agg = policy.new_aggregate(level)?;
    agg.clear();
    Ok(Rc::new(RefCell::new(agg)))
}

impl<'p, P, I> Iterator for GroupedStream<'p, P, I>
where
    P: GroupingPolicy,
    I: Iterator<Item = P::Row>,
{
    type Item = Result<BindingOf<P>, BandError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(step) = self.pending.pop_front() {
                match self.run(step) {
                    Ok(Some(binding)) => {
                        self.emitted += 1;
                        return Some(Ok(binding));
                    }
                    Ok(None) => continue,
                    Err(err) => {
                        self.fail(&err);
                        return Some(Err(err));
                    }
                }
            }

            match self.phase {
                Phase::Streaming => {
                    if let Err(err) = self.advance() {
                        self.fail(&err);
                        return Some(Err(err));
                    }
                }
                Phase::Ending => {
                    band_debug!(
                        "STREAM",
                        "end of stream rows={} bindings={}",
                        self.rows_seen,
                        self.emitted
                    );
                    self.phase = Phase::Done;
                    return None;
                }
                Phase::Done => return None,
            }
        }
    }
}

impl<'p, P, I> FusedIterator for GroupedStream<'p, P, I>
where
    P: GroupingPolicy,
    I: Iterator<Item = P::Row>,
{
}
