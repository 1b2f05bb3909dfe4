// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Frame-to-frame geometry animation.
//!
//! Layout always computes the authoritative frame of a node. When a reused node's frame
//! changes and the node carries an [`AnimationSpec`], the layout pass hands the
//! `(old, new)` pair to the [`AnimationScheduler`] instead of committing the new frame.
//! Every tick the scheduler samples its executors and the anim pass writes the sampled
//! rectangles back into the tree, until each executor completes and the target frame
//! takes over for good.

mod scheduler;
mod spring;

use std::time::Duration;

pub use scheduler::{AnimationScheduler, FrameAnimation};
pub use spring::Spring;

use crate::util::unit_clamp;

/// Default duration of [`AnimationSpec::default`].
pub const DEFAULT_DURATION: Duration = Duration::from_millis(150);

/// An easing curve, mapping a fraction in `[0, 1]` to an eased fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// `t`.
    Linear,
    /// `t²`.
    Quadratic,
    /// `t²(3 − 2t)`.
    Smoothstep,
    /// `t² / (2(t² − t) + 1)`.
    Parametric,
    /// A damped harmonic oscillator, evaluated over its settle time.
    Spring(Spring),
}

impl Curve {
    /// Apply the curve to `t`.
    ///
    /// `t` is clamped to `[0, 1]` first.
    pub fn apply(&self, t: f64) -> f64 {
        let t = unit_clamp(t);
        match self {
            Self::Linear => t,
            Self::Quadratic => t * t,
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
            Self::Parametric => {
                let t2 = t * t;
                t2 / (2.0 * (t2 - t) + 1.0)
            }
            Self::Spring(spring) => spring.progress(t),
        }
    }
}

/// How a node animates changes of its frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// The easing curve.
    pub curve: Curve,
    /// Time from the end of the delay to the target frame.
    pub duration: Duration,
    /// Time during which the old frame is held.
    pub delay: Duration,
}

impl AnimationSpec {
    /// An animation with the given curve and duration, and no delay.
    pub fn new(curve: Curve, duration: Duration) -> Self {
        Self {
            curve,
            duration,
            delay: Duration::ZERO,
        }
    }

    /// Builder-style method to set the delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Total time until the target frame is reached.
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }

    /// The eased fraction after `elapsed`.
    ///
    /// Exactly `0` until the delay has passed and exactly `1` once the animation is over,
    /// whatever the curve.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if elapsed <= self.delay {
            return 0.;
        }
        if elapsed >= self.total() || self.duration.is_zero() {
            return 1.;
        }
        let t = (elapsed - self.delay).as_secs_f64() / self.duration.as_secs_f64();
        match t {
            t if t <= 0. => 0.,
            t if t >= 1. => 1.,
            t => self.curve.apply(t),
        }
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::new(Curve::Parametric, DEFAULT_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn curves_hit_their_endpoints() {
        for curve in [
            Curve::Linear,
            Curve::Quadratic,
            Curve::Smoothstep,
            Curve::Parametric,
        ] {
            assert_approx_eq!(f64, curve.apply(0.), 0.);
            assert_approx_eq!(f64, curve.apply(1.), 1.);
        }
    }

    #[test]
    fn curve_shapes() {
        assert_approx_eq!(f64, Curve::Linear.apply(0.25), 0.25);
        assert_approx_eq!(f64, Curve::Quadratic.apply(0.5), 0.25);
        assert_approx_eq!(f64, Curve::Smoothstep.apply(0.5), 0.5);
        assert_approx_eq!(f64, Curve::Parametric.apply(0.5), 0.5);
        assert!(Curve::Parametric.apply(0.25) < 0.25);
        assert_approx_eq!(f64, Curve::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn progress_respects_delay() {
        let spec = AnimationSpec::new(Curve::Linear, Duration::from_millis(200))
            .with_delay(Duration::from_millis(100));
        assert_eq!(spec.progress(Duration::ZERO), 0.);
        assert_eq!(spec.progress(Duration::from_millis(100)), 0.);
        assert_approx_eq!(f64, spec.progress(Duration::from_millis(200)), 0.5);
        assert_eq!(spec.progress(Duration::from_millis(300)), 1.);
        assert_eq!(spec.progress(Duration::from_secs(5)), 1.);
    }

    #[test]
    fn default_is_parametric() {
        let spec = AnimationSpec::default();
        assert_eq!(spec.curve, Curve::Parametric);
        assert_eq!(spec.duration, Duration::from_millis(150));
        assert_eq!(spec.delay, Duration::ZERO);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let spec = AnimationSpec::new(Curve::Linear, Duration::ZERO);
        assert_eq!(spec.progress(Duration::from_nanos(1)), 1.);
    }
}
