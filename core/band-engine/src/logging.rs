//! FILENAME: core/band-engine/src/logging.rs
// PURPOSE: Category logging macros on top of the `log` facade.
// CONTEXT: Same call shape as the app-side `log_debug!("PIVOT", ...)` macros;
//          the category becomes the `log` target.

#[macro_export]
macro_rules! band_trace {
    ($cat:expr, $($arg:tt)*) => {
        $crate::__log::trace!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! band_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::__log::debug!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! band_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::__log::warn!(target: $cat, $($arg)*)
    };
}
