// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

/// Parameters of a damped harmonic oscillator used as an easing curve.
///
/// The spring starts displaced by one unit from its rest position with the given initial
/// velocity (positive towards rest) and is solved in closed form. The curve maps `t = 1`
/// to the moment the displacement has decayed to a thousandth of its initial value.
///
/// Mass and stiffness under [`Spring::MIN_PARAMETER`], or not finite, are treated as
/// [`Spring::MIN_PARAMETER`]. Negative or NaN damping is treated as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// Mass.
    pub mass: f64,
    /// Stiffness.
    pub stiffness: f64,
    /// Damping coefficient.
    pub damping: f64,
    /// Initial velocity towards the target.
    pub initial_velocity: f64,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 100.0,
            damping: 10.0,
            initial_velocity: 0.0,
        }
    }
}

/// Residual displacement at which the spring counts as settled.
const SETTLE_THRESHOLD: f64 = 1e-3;

/// Clamp a mass or stiffness into the range the closed-form solution is defined on.
fn positive(value: f64) -> f64 {
    if value.is_finite() && value >= Spring::MIN_PARAMETER {
        value
    } else {
        Spring::MIN_PARAMETER
    }
}

impl Spring {
    /// Smallest mass and stiffness used by the solver.
    pub const MIN_PARAMETER: f64 = 1e-3;

    /// A spring with the given mass, stiffness and damping, starting at rest.
    ///
    /// Out-of-range parameters are clamped, see [`Spring`].
    pub fn new(mass: f64, stiffness: f64, damping: f64) -> Self {
        Self {
            mass: positive(mass),
            stiffness: positive(stiffness),
            damping: damping.max(0.),
            initial_velocity: 0.0,
        }
    }

    /// Builder-style method to set the initial velocity.
    pub fn with_initial_velocity(mut self, velocity: f64) -> Self {
        self.initial_velocity = velocity;
        self
    }

    fn natural_frequency(&self) -> f64 {
        (positive(self.stiffness) / positive(self.mass)).sqrt()
    }

    fn damping_ratio(&self) -> f64 {
        let critical = 2.0 * (positive(self.stiffness) * positive(self.mass)).sqrt();
        let damping = if self.damping.is_finite() {
            self.damping.max(0.)
        } else {
            0.
        };
        damping / critical
    }

    /// Exponential rate at which the slowest mode decays.
    fn decay_rate(&self) -> f64 {
        let omega = self.natural_frequency();
        let zeta = self.damping_ratio();
        if zeta > 1.0 {
            omega * (zeta - (zeta * zeta - 1.0).sqrt())
        } else {
            zeta * omega
        }
    }

    /// Time until the displacement falls under the settle threshold.
    pub fn settle_time(&self) -> f64 {
        let rate = self.decay_rate();
        if rate > 1e-9 {
            (1.0 / SETTLE_THRESHOLD).ln() / rate
        } else {
            1.0
        }
    }

    /// Displacement from rest after `time` seconds.
    pub fn displacement(&self, time: f64) -> f64 {
        let omega = self.natural_frequency();
        let zeta = self.damping_ratio();
        let v0 = self.initial_velocity;
        if zeta < 1.0 {
            let damped = omega * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega * time).exp();
            envelope
                * ((damped * time).cos() + (zeta * omega - v0) / damped * (damped * time).sin())
        } else if zeta == 1.0 {
            (-omega * time).exp() * (1.0 + (omega - v0) * time)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let c2 = (-v0 - r1) / (r2 - r1);
            let c1 = 1.0 - c2;
            c1 * (r1 * time).exp() + c2 * (r2 * time).exp()
        }
    }

    /// Eased progress at normalized time `t`.
    pub fn progress(&self, t: f64) -> f64 {
        1.0 - self.displacement(t * self.settle_time())
    }
}
