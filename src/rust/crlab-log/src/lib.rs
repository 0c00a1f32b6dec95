// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicBool, Ordering};

#[doc(hidden)]
pub use log as _log;

#[macro_export]
macro_rules! info {
    ($msg:literal, $($arg:tt)+) => {
        $crate::_log::info!(target: concat!("crlab.rust::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        $crate::_log::info!(target: concat!("crlab.rust::", module_path!()), $msg);
    };
}

#[macro_export]
macro_rules! warn {
    ($msg:literal, $($arg:tt)+) => {
        $crate::_log::warn!(target: concat!("crlab.rust::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        $crate::_log::warn!(target: concat!("crlab.rust::", module_path!()), $msg);
    };
}

/// Log a diagnostic message at info level if diagnostics logging is enabled.
///
/// Used for per-sweep-point traces that are too chatty for normal runs.
#[macro_export]
macro_rules! diagnostic {
    ($msg:literal, $($arg:tt)+) => {
        if $crate::is_diagnostics_enabled() {
            $crate::_log::info!(target: concat!("crlab.rust::", module_path!()), $msg, $($arg)+);
        }
    };
    ($msg:literal) => {
        if $crate::is_diagnostics_enabled() {
            $crate::_log::info!(target: concat!("crlab.rust::", module_path!()), $msg);
        }
    };
}

static DIAGNOSTICS_ENABLED: AtomicBool = AtomicBool::new(false);

#[inline]
pub fn is_diagnostics_enabled() -> bool {
    DIAGNOSTICS_ENABLED.load(Ordering::Acquire)
}

/// Initialize the logging.
///
/// Only the diagnostics switch lives here. The concrete logger is installed by
/// the binary, library users bring their own `log` implementation.
pub fn init_logging(with_diagnostics: bool) {
    DIAGNOSTICS_ENABLED.store(with_diagnostics, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_switch() {
        init_logging(true);
        assert!(is_diagnostics_enabled());
        diagnostic!("point {} of {}", 1, 2);
        init_logging(false);
        assert!(!is_diagnostics_enabled());
        diagnostic!("suppressed");
    }
}
