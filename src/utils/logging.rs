//! Conditional logging macros gated on a module-level `ENABLE_LOGS` const.
//! The poll loop is chatty at 2 Hz; a module flips its flag to `false` to
//! silence itself without touching the global filter.
//!
//! Each module using these must define:
//! ```rust
//! const ENABLE_LOGS: bool = true;
//! ```
//! and import the macros from the crate root (`use crate::{log_info, ...}`).

/// Conditional `log::info!`; compiled out of silenced modules.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Conditional `log::warn!`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Conditional `log::error!`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
