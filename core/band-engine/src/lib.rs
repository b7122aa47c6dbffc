//! FILENAME: core/band-engine/src/lib.rs
//! Grouped-stream builder for banded reports.
//!
//! This crate turns an ordered sequence of rows plus a grouping policy into
//! an ordered, lazily produced sequence of bindings (header / detail / footer,
//! tagged with a nesting level) and keeps one running aggregate per level.
//! It knows nothing about layout or output formats.
//!
//! Layers:
//! - `aggregate`: The accumulator contract and the level-rollup base
//! - `policy`: The caller-supplied grouping hooks and the composite sort
//! - `binding`: What the stream emits
//! - `options`: Serializable stream settings
//! - `stream`: The builder and its state-machine iterator
//!
//! Level numbering: 0 = detail, 1..=N = groups (1 most detailed, N most
//! general), N+1 = whole report.

#[doc(hidden)]
pub use log as __log;

#[macro_use]
mod logging;

pub mod aggregate;
pub mod binding;
pub mod error;
pub mod options;
pub mod policy;
pub mod stream;

pub use aggregate::{Aggregate, AggregateRef, LevelRollup};
pub use binding::{Binding, BindingKind, Payload};
pub use error::BandError;
pub use options::{GrandRollup, StreamOptions};
pub use policy::{compare_rows, sort, GroupingPolicy};
pub use stream::{GroupedStream, GroupedStreamBuilder};
