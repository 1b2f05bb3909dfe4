// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Internal passes run by Trellis every tick.
//!
//! This file includes utility functions used by multiple passes.

use tracing::span::EnteredSpan;

use crate::core::NodePod;

pub(crate) mod anim;
pub(crate) mod event;
pub(crate) mod focus;
pub(crate) mod layout;
pub(crate) mod paint;
pub(crate) mod rebuild;

#[must_use = "Span will be immediately closed if dropped"]
pub(crate) fn enter_span_if(enabled: bool, pod: &NodePod) -> Option<EnteredSpan> {
    enabled.then(|| enter_span(pod))
}

#[must_use = "Span will be immediately closed if dropped"]
pub(crate) fn enter_span(pod: &NodePod) -> EnteredSpan {
    pod.node.make_trace_span(pod.state.id).entered()
}

/// Which passes open a span for every node they visit.
///
/// Per-node spans make traces much easier to read, but are expensive when a pass visits
/// the whole tree every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PassTracing {
    pub(crate) rebuild: bool,
    pub(crate) layout: bool,
    pub(crate) anim: bool,
    pub(crate) event: bool,
    pub(crate) paint: bool,
}

impl PassTracing {
    /// Reads the `TRELLIS_TRACE_PASSES` environment variable.
    ///
    /// Accepts `all`, `none` or a comma-separated list of pass names. When unset, every
    /// pass is traced in debug builds and none in release builds.
    pub(crate) fn from_env() -> Self {
        let env_var = match std::env::var("TRELLIS_TRACE_PASSES") {
            Ok(env_var) => env_var,
            Err(std::env::VarError::NotPresent) => return Self::unit(cfg!(debug_assertions)),
            Err(std::env::VarError::NotUnicode(value)) => {
                tracing::error!(
                    ?value,
                    "Couldn't parse `TRELLIS_TRACE_PASSES` environment variable: Not valid UTF-8",
                );
                return Self::unit(false);
            }
        };
        Self::parse(&env_var)
    }

    fn parse(env_var: &str) -> Self {
        let env_var = env_var.trim();
        if env_var.eq_ignore_ascii_case("all") {
            return Self::unit(true);
        }
        if env_var.eq_ignore_ascii_case("none") || env_var.is_empty() {
            return Self::unit(false);
        }
        let mut result = Self::unit(false);
        let mut show_help = false;
        let mut supported_passes = [
            ("rebuild", &mut result.rebuild),
            ("layout", &mut result.layout),
            ("anim", &mut result.anim),
            ("event", &mut result.event),
            ("paint", &mut result.paint),
        ];
        for input_name in env_var.split(',').map(str::trim) {
            if let Some((_, value)) = supported_passes
                .iter_mut()
                .find(|(pass_name, _)| pass_name.eq_ignore_ascii_case(input_name))
            {
                if **value {
                    tracing::warn!(
                        pass = input_name,
                        "TRELLIS_TRACE_PASSES: Enabled tracing for same pass twice"
                    );
                }
                **value = true;
            } else {
                tracing::warn!(pass = input_name, "TRELLIS_TRACE_PASSES: Unknown pass");
                show_help = true;
            }
        }
        if show_help {
            let supported_str = supported_passes
                .iter()
                .map(|(name, _)| *name)
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                "Supported passes for the `TRELLIS_TRACE_PASSES` environment variable are {supported_str}"
            );
        }
        result
    }

    /// A `PassTracing` where all the fields have the same `value`.
    const fn unit(value: bool) -> Self {
        Self {
            rebuild: value,
            layout: value,
            anim: value,
            event: value,
            paint: value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pass_lists() {
        assert_eq!(PassTracing::parse("all"), PassTracing::unit(true));
        assert_eq!(PassTracing::parse(" none "), PassTracing::unit(false));
        let passes = PassTracing::parse("layout, Paint,bogus");
        assert!(passes.layout);
        assert!(passes.paint);
        assert!(!passes.rebuild);
        assert!(!passes.anim);
    }
}
