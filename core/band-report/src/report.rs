//! FILENAME: core/band-report/src/report.rs
//! Banded Report - Sort, build and render a keyed report in one call.

use band_engine::{band_debug, Aggregate, GroupedStreamBuilder, GroupingPolicy, StreamOptions};

use crate::definition::KeyedPolicy;
use crate::error::ReportError;
use crate::render::{render, BindingSink};

pub struct BandedReport<R, A> {
    builder: GroupedStreamBuilder<KeyedPolicy<R, A>>,
}

impl<R, A: Aggregate<R>> BandedReport<R, A> {
    pub fn new(policy: KeyedPolicy<R, A>) -> Self {
        BandedReport {
            builder: GroupedStreamBuilder::new(policy),
        }
    }

    pub fn with_options(policy: KeyedPolicy<R, A>, options: StreamOptions) -> Self {
        BandedReport {
            builder: GroupedStreamBuilder::with_options(policy, options),
        }
    }

    pub fn policy(&self) -> &KeyedPolicy<R, A> {
        self.builder.policy()
    }

    pub fn options(&self) -> &StreamOptions {
        self.builder.options()
    }

    /// Sorts `rows` by the group keys, then renders them into `sink`.
    /// Returns the number of bindings delivered.
    pub fn run<I, S>(&self, rows: I, sink: &mut S) -> Result<usize, ReportError>
    where
        I: IntoIterator<Item = R>,
        S: BindingSink<R, A> + ?Sized,
    {
        let sorted = self.builder.sort(rows)?;
        self.run_sorted(sorted, sink)
    }

    /// Renders rows that are already in group order.
    pub fn run_sorted<I, S>(&self, rows: I, sink: &mut S) -> Result<usize, ReportError>
    where
        I: IntoIterator<Item = R>,
        S: BindingSink<R, A> + ?Sized,
    {
        let level_count = self.policy().level_count();
        let stream = self.builder.build(rows)?;
        let delivered = render(stream, level_count, sink)?;
        band_debug!(
            "REPORT",
            "rendered {} bindings over {} group levels",
            delivered,
            level_count
        );
        Ok(delivered)
    }
}
