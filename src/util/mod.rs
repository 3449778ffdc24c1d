//! Utility modules: timeout, diagnostics.

pub mod timeout;

/// Log a run diagnostic: `info` when the run asked for debug output,
/// `debug` otherwise.
macro_rules! debug_print {
    ($enabled:expr, $($arg:tt)+) => {
        if $enabled {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

pub(crate) use debug_print;
