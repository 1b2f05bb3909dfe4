// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Point, Rect, Size};
use tracing::trace;

use crate::core::{EventCtx, Handled, LayoutCtx, Node, PaintCtx, PointerEvent};
use crate::state::StateCell;

const TRACK_HEIGHT: f64 = 6.;
const KNOB_SIZE: f64 = 20.;

/// A horizontal slider bound to a number.
///
/// Pressing the pointer on the slider and dragging sets the bound value. Positions outside
/// the track clamp to the ends of the range.
#[derive(Clone, Debug)]
pub struct Slider {
    value: StateCell<f64>,
    min: f64,
    max: f64,
}

// --- MARK: BUILDERS
impl Slider {
    /// A slider over `0..=100` bound to `value`.
    pub fn new(value: StateCell<f64>) -> Self {
        Self {
            value,
            min: 0.,
            max: 100.,
        }
    }

    /// Set the range of values.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// The bound value.
    pub fn value(&self) -> f64 {
        self.value.get()
    }

    /// Position of the value along the track, between 0 and 1.
    fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0. {
            return 0.;
        }
        ((self.value.get() - self.min) / span).clamp(0., 1.)
    }

    fn set_from_position(&self, ctx: &mut EventCtx<'_>, pos: Point) {
        let inner = ctx.inner_rect();
        let fraction = if inner.width() > 0. {
            ((pos.x - inner.x0) / inner.width()).clamp(0., 1.)
        } else {
            0.
        };
        let value = self.min + fraction * (self.max - self.min);
        if value != self.value.get() {
            trace!("slider {} set to {value}", ctx.node_id());
            self.value.set(value);
            ctx.request_render();
        }
    }
}

// --- MARK: IMPL NODE
impl Node for Slider {
    fn is_interactive(&self) -> bool {
        true
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        let scale = ctx.scale();
        Size::new(2. * KNOB_SIZE * scale, KNOB_SIZE * scale)
    }

    fn content_size(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        Size::new(available.width, KNOB_SIZE * ctx.scale())
    }

    fn on_pointer_event(&mut self, ctx: &mut EventCtx<'_>, event: &PointerEvent) -> Handled {
        match event {
            PointerEvent::Down { pos, .. }
            | PointerEvent::Move { pos }
            | PointerEvent::Click { pos } => {
                self.set_from_position(ctx, *pos);
                Handled::Yes
            }
            PointerEvent::Up { .. } => Handled::Yes,
            PointerEvent::Wheel { .. } => Handled::No,
        }
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, inner: Rect) {
        ctx.fill_background();
        let scale = ctx.scale();
        let knob = KNOB_SIZE * scale;
        let track = Rect::from_origin_size(
            (inner.x0, inner.y0 + (knob - TRACK_HEIGHT * scale) / 2.),
            (inner.width(), TRACK_HEIGHT * scale),
        );
        ctx.draw_asset("slider.track", track);
        let x = inner.x0 + self.fraction() * (inner.width() - knob).max(0.);
        ctx.draw_asset(
            "slider.knob",
            Rect::from_origin_size((x, inner.y0), (knob, knob)),
        );
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::RenderRootOptions;
    use crate::backend::Theme;
    use crate::testing::{DrawCommand, HARNESS_DEFAULT_SIZE, TestHarness, TextureDrawable};

    #[test]
    fn fills_the_width() {
        let harness = TestHarness::create(Slider::new(StateCell::detached(0.)));
        assert_eq!(harness.root().layout_rect(), Rect::new(0., 190., 400., 210.));
    }

    #[test]
    fn pointer_sets_the_value() {
        let value = StateCell::detached(0.);
        let mut harness = TestHarness::create(Slider::new(value.clone()));

        harness.mouse_click_at((100., 200.));
        assert_eq!(value.get(), 25.);

        harness.mouse_move((300., 200.));
        assert_eq!(value.get(), 25., "moves without a press are ignored");

        harness.mouse_down();
        harness.mouse_move((500., 200.));
        assert_eq!(value.get(), 100.);
        harness.mouse_move((200., 200.));
        harness.mouse_up();
        assert_eq!(value.get(), 50.);
    }

    #[test]
    fn custom_range() {
        let value = StateCell::detached(0.);
        let mut harness = TestHarness::create(Slider::new(value.clone()).range(-1., 1.));
        harness.mouse_click_at((300., 200.));
        assert_eq!(value.get(), 0.5);
    }

    #[test]
    fn knob_follows_the_value() {
        let theme = Theme::new()
            .with_asset("slider.track", TextureDrawable::new("track", (1., 1.)))
            .with_asset("slider.knob", TextureDrawable::new("knob", (1., 1.)));
        let options = RenderRootOptions {
            size: HARNESS_DEFAULT_SIZE,
            theme: Box::new(theme),
            ..Default::default()
        };
        let slider = Slider::new(StateCell::detached(50.));
        let harness = TestHarness::create_with(slider, options);

        let knob = harness
            .draw_log()
            .commands()
            .into_iter()
            .find_map(|command| match command {
                DrawCommand::Texture { key, frame, .. } if key == "knob" => Some(frame),
                _ => None,
            })
            .unwrap();
        assert_eq!(knob, Rect::new(190., 190., 210., 210.));
    }
}
