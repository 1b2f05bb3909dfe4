// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Miscellaneous utility functions.

use kurbo::Size;

/// Panic in debug and `tracing::error` in release mode.
///
/// Used for broken internal invariants that the runtime can recover from in release builds.
#[macro_export]
macro_rules! debug_panic {
    ($msg:expr$(,)?) => {
        if cfg!(debug_assertions) {
            panic!($msg);
        } else {
            tracing::error!($msg);
        }
    };
    ($fmt:expr, $($arg:tt)+) => {
        if cfg!(debug_assertions) {
            panic!($fmt, $($arg)*);
        } else {
            tracing::error!($fmt, $($arg)*);
        }
    };
}

pub use crate::debug_panic;

/// Sanitization of layout values.
pub trait Sanitize {
    /// Returns the sanitized value.
    ///
    /// `name` is how the value will be named in the log message.
    #[track_caller]
    fn sanitize(self, name: &str) -> Self;
}

impl Sanitize for f64 {
    /// Non-finite or negative values fall back to zero.
    ///
    /// `name` is how the value will be named in the log message.
    ///
    /// # Panics
    ///
    /// Panics on NaN if debug assertions are enabled.
    #[track_caller]
    fn sanitize(self, name: &str) -> Self {
        if self.is_nan() {
            debug_panic!("{name} must not be NaN");
            0.
        } else if self.is_infinite() || self < 0. {
            // Infinite budgets are legal inputs but never legal results.
            0.
        } else {
            self
        }
    }
}

impl Sanitize for Size {
    #[track_caller]
    fn sanitize(self, name: &str) -> Self {
        Self::new(self.width.sanitize(name), self.height.sanitize(name))
    }
}

/// Returns `t` clamped to `[0, 1]`, treating NaN as zero.
pub(crate) fn unit_clamp(t: f64) -> f64 {
    if t.is_nan() { 0. } else { t.clamp(0., 1.) }
}
