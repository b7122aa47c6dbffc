//! FILENAME: core/band-engine/src/options.rs
//! Stream Options - Serializable settings for one grouped stream.

use serde::{Deserialize, Serialize};

/// When ordinary group closes roll up into the grand-total level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrandRollup {
    /// The grand total only receives rollups at end of stream, i.e. only the
    /// last open group of every level.
    AtEndOnly,
    /// Every closed group also rolls up into the grand total, so it sees
    /// every group of the report.
    OnEveryClose,
}

impl Default for GrandRollup {
    fn default() -> Self {
        GrandRollup::OnEveryClose
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOptions {
    /// Emit a second level-(N+1) FOOTER after the end-of-stream footers.
    #[serde(default)]
    pub repeat_grand_footer: bool,

    #[serde(default)]
    pub grand_rollup: GrandRollup,

    /// Verify that consecutive rows follow the composite grouping order
    /// and fail with `OutOfOrder` instead of producing broken groups.
    #[serde(default)]
    pub check_order: bool,
}

impl Default for StreamOptions {
    fn default() -> Self {
        StreamOptions {
            repeat_grand_footer: false,
            grand_rollup: GrandRollup::OnEveryClose,
            check_order: false,
        }
    }
}

impl StreamOptions {
    /// The historical behavior: duplicate grand footer, grand total only
    /// rolled up at end of stream.
    pub fn legacy() -> Self {
        StreamOptions {
            repeat_grand_footer: true,
            grand_rollup: GrandRollup::AtEndOnly,
            check_order: false,
        }
    }

    pub fn with_order_check(mut self) -> Self {
        self.check_order = true;
        self
    }
}
