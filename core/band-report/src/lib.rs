//! FILENAME: core/band-report/src/lib.rs
//! Banded report layer on top of band-engine.
//!
//! band-engine only knows rows, levels and aggregates. This crate supplies
//! what a concrete report needs around it:
//! - `key`: Comparable group key values
//! - `definition`: Named group definitions and the key-based grouping policy
//! - `aggregates`: Ready-made row count and numeric summary aggregates
//! - `band`: Which template band a binding belongs to
//! - `render`: The sink boundary and the synchronous driver
//! - `report`: Sort, build and render in one call

pub mod aggregates;
pub mod band;
pub mod definition;
pub mod error;
pub mod key;
pub mod render;
pub mod report;

pub use aggregates::{measure, Accumulator, AggregationType, Measure, RowCount, Summary};
pub use band::Band;
pub use definition::{GroupDef, KeyedPolicy, SortOrder};
pub use error::ReportError;
pub use key::GroupKey;
pub use render::{render, BandLine, BindingSink, Outline};
pub use report::BandedReport;
