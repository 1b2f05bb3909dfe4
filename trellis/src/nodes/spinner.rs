// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::f64::consts::TAU;
use std::time::Duration;

use kurbo::{Rect, Size, Vec2};
use peniko::Color;

use crate::backend::Primitive;
use crate::core::{LayoutCtx, Lifecycle, LifecycleCtx, Node, PaintCtx, UpdateCtx};

/// Advance of the phase per frame, in spokes.
const STEP: f64 = 0.25;

/// An activity indicator: spokes around a circle, with a highlight that turns every frame.
///
/// A mounted spinner requests an animation frame on every tick for as long as it stays
/// in the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Spinner {
    diameter: f64,
    lines: usize,
    phase: f64,
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            diameter: 24.,
            lines: 12,
            phase: 0.,
        }
    }
}

// --- MARK: BUILDERS
impl Spinner {
    /// A spinner of the default size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diameter, in logical units.
    pub fn diameter(mut self, diameter: f64) -> Self {
        self.diameter = diameter;
        self
    }

    /// The index of the highlighted spoke, possibly fractional.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Grey level of spoke `index`: the spoke at the phase is darkest.
    fn shade(&self, index: usize) -> u8 {
        let lines = self.lines as f64;
        let distance = (index as f64 - self.phase).rem_euclid(lines);
        (80. + distance * 6.).min(255.) as u8
    }
}

// --- MARK: IMPL NODE
impl Node for Spinner {
    fn lifecycle(&mut self, ctx: &mut LifecycleCtx<'_>, event: Lifecycle) {
        if event == Lifecycle::Mounted {
            ctx.request_anim_frame();
        }
    }

    fn adopt(&mut self, previous: Box<dyn Node>) {
        if let Some(previous) = previous.downcast_ref::<Self>() {
            self.phase = previous.phase;
        }
    }

    fn on_anim_frame(&mut self, ctx: &mut UpdateCtx<'_>, _interval: Duration) {
        self.phase = (self.phase + STEP) % self.lines as f64;
        ctx.request_anim_frame();
        ctx.request_render();
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        let scale = ctx.scale();
        Size::new(10. * scale, 10. * scale)
    }

    fn content_size(&mut self, ctx: &mut LayoutCtx<'_>, _available: Size) -> Size {
        let side = self.diameter * ctx.scale();
        Size::new(side, side)
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, inner: Rect) {
        ctx.fill_background();
        let center = inner.center();
        let radius = inner.width().min(inner.height()) / 2.;
        let width = 2. * ctx.scale();
        for index in 0..self.lines {
            let angle = TAU * index as f64 / self.lines as f64;
            let direction = Vec2::from_angle(angle);
            let shade = self.shade(index);
            let line = Primitive::Line {
                from: center + direction * (radius / 2.),
                to: center + direction * radius,
                width,
                color: Color::from_rgba8(shade, shade, shade, 200),
            };
            ctx.draw(&line, Rect::from_center_size(center, (2. * radius, 2. * radius)));
        }
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::RenderRootSignal;
    use crate::testing::{DrawCommand, TestHarness};

    fn phase(harness: &TestHarness) -> f64 {
        harness.root().downcast::<Spinner>().unwrap().phase()
    }

    #[test]
    fn advances_every_frame() {
        let mut harness = TestHarness::create(Spinner::new());
        let start = phase(&harness);
        harness.animate_ms(16);
        assert_eq!(phase(&harness), start + STEP);
        harness.animate_ms(16);
        assert_eq!(phase(&harness), start + 2. * STEP);
        assert!(
            harness
                .take_signals()
                .iter()
                .any(|signal| matches!(signal, RenderRootSignal::RequestAnimFrame))
        );
    }

    #[test]
    fn phase_survives_reuse() {
        let mut harness = TestHarness::create(Spinner::new());
        harness.animate_ms(16);
        let before = phase(&harness);
        harness.rebuild(Spinner::new()).unwrap();
        // The rebuild tick draws one more frame.
        assert_eq!(phase(&harness), before + STEP);
    }

    #[test]
    fn highlight_follows_the_phase() {
        let mut spinner = Spinner::new();
        assert_eq!(spinner.shade(0), 80);
        assert_eq!(spinner.shade(11), 146);
        spinner.phase = 11.;
        assert_eq!(spinner.shade(11), 80);
        assert_eq!(spinner.shade(0), 86);
    }

    #[test]
    fn draws_one_line_per_spoke() {
        let harness = TestHarness::create(Spinner::new());
        let lines = harness
            .draw_log()
            .commands()
            .into_iter()
            .filter(|command| matches!(command, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 12);
        let frame = harness.root().layout_rect();
        assert_eq!(frame, Rect::new(188., 188., 212., 212.));
    }
}
