// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Default [`tracing`] setup for applications and tests built on Trellis.
//!
//! Logs go to stderr with a compact format: UTC time of day with millisecond precision,
//! level, span context and message, without the module target. The default filter
//! includes [`DEBUG`](tracing::Level::DEBUG) messages in debug builds and
//! [`INFO`](tracing::Level::INFO) messages in release builds, and can be overridden with
//! `RUST_LOG`.
//!
//! If a `tracing` subscriber is already installed, nothing is replaced.

use std::error::Error;
use std::fmt;

use time::macros::format_description;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

/// Build the subscriber with `default_level` as the filter when `RUST_LOG` is unset.
///
/// `for_tests` routes output through the test harness's capture.
/// Returns the subscriber, and the error in case `RUST_LOG` could not be parsed.
fn default_subscriber(
    default_level: LevelFilter,
    for_tests: bool,
) -> (impl Subscriber, Option<Box<dyn Error>>) {
    let filter_builder = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("RUST_LOG");
    let err = filter_builder
        .from_env()
        .err()
        .map(|err| format!("failed to parse RUST_LOG environment variable: {err:#}").into());
    let env_filter = filter_builder.from_env_lossy();

    // The trailing `Z` marks the time as UTC.
    let timer = UtcTime::new(format_description!(
        "[hour repr:24]:[minute]:[second].[subsecond digits:3]Z"
    ));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_timer(timer)
        .with_target(false);
    let console_layer = if for_tests {
        console_layer
            .with_test_writer()
            .with_ansi(false)
            .with_filter(env_filter)
            .boxed()
    } else {
        console_layer
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed()
    };

    (tracing_subscriber::registry().with(console_layer), err)
}

/// An error indicating that a tracing subscriber has been set before.
#[derive(Debug)]
pub struct TracingSubscriberHasBeenSetError;

impl fmt::Display for TracingSubscriberHasBeenSetError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.pad("A tracing subscriber has been set before.")
    }
}

impl Error for TracingSubscriberHasBeenSetError {}

fn install(default_level: LevelFilter, for_tests: bool) -> Result<(), TracingSubscriberHasBeenSetError> {
    // `has_been_set` is doc(hidden) but guaranteed for the whole tracing_core 0.1 series.
    if tracing_core::dispatcher::has_been_set() {
        return Err(TracingSubscriberHasBeenSetError);
    }
    let (subscriber, err) = default_subscriber(default_level, for_tests);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return Err(TracingSubscriberHasBeenSetError);
    }
    if let Some(err) = err {
        tracing::error!("Initialising logging encountered recoverable error: {err}");
    }
    Ok(())
}

/// Initialise tracing for a unit test: only warnings and errors, captured per test.
pub fn try_init_test_tracing() -> Result<(), TracingSubscriberHasBeenSetError> {
    install(LevelFilter::WARN, true)
}

/// Initialise tracing for an application.
pub fn try_init_tracing() -> Result<(), TracingSubscriberHasBeenSetError> {
    // DEBUG logs a few lines per low-frequency event (rebuilds, focus changes).
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    install(default_level, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails() {
        let _first_result = try_init_test_tracing();
        let second_result = try_init_test_tracing();
        assert!(second_result.is_err());
    }
}
