// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Rect, Size};

use crate::core::{LayoutCtx, Node, PaintCtx};

const BAR_HEIGHT: f64 = 6.;

/// A horizontal bar showing a value within a range.
///
/// Draws the `progress.track` asset across the full width and the `progress.bar` asset
/// over the filled part.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressBar {
    value: f64,
    min: f64,
    max: f64,
}

// --- MARK: BUILDERS
impl ProgressBar {
    /// A bar over `0..=100` showing `value`.
    pub fn new(value: f64) -> Self {
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

    /// The filled fraction, between 0 and 1.
    pub fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0. || !self.value.is_finite() {
            return 0.;
        }
        ((self.value - self.min) / span).clamp(0., 1.)
    }
}

// --- MARK: IMPL NODE
impl Node for ProgressBar {
    fn debug_text(&self) -> Option<String> {
        Some(format!("{}/{}", self.value, self.max))
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        let scale = ctx.scale();
        Size::new(40. * scale, 20. * scale)
    }

    fn content_size(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        Size::new(available.width, 20. * ctx.scale())
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, inner: Rect) {
        ctx.fill_background();
        let height = BAR_HEIGHT * ctx.scale();
        let y0 = inner.y0 + (inner.height() - height) / 2.;
        let track = Rect::new(inner.x0, y0, inner.x1, y0 + height);
        ctx.draw_asset("progress.track", track);

        let width = inner.width() * self.fraction();
        if width > 0. {
            ctx.draw_asset("progress.bar", track.with_size((width, height)));
        }
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::RenderRootOptions;
    use crate::backend::Theme;
    use crate::testing::{DrawCommand, TestHarness, TextureDrawable};

    fn textures(harness: &TestHarness) -> Vec<(String, Rect)> {
        harness
            .draw_log()
            .commands()
            .into_iter()
            .filter_map(|command| match command {
                DrawCommand::Texture { key, frame, .. } => Some((key, frame)),
                _ => None,
            })
            .collect()
    }

    fn harness(bar: ProgressBar) -> TestHarness {
        let theme = Theme::new()
            .with_asset("progress.track", TextureDrawable::new("track", (1., 1.)))
            .with_asset("progress.bar", TextureDrawable::new("bar", (1., 1.)));
        let options = RenderRootOptions {
            size: Size::new(200., 20.),
            theme: Box::new(theme),
            ..Default::default()
        };
        TestHarness::create_with(bar, options)
    }

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(ProgressBar::new(50.).fraction(), 0.5);
        assert_eq!(ProgressBar::new(150.).fraction(), 1.);
        assert_eq!(ProgressBar::new(2.).range(1., 5.).fraction(), 0.25);
        assert_eq!(ProgressBar::new(2.).range(5., 5.).fraction(), 0.);
    }

    #[test]
    fn draws_the_filled_part() {
        let harness = harness(ProgressBar::new(25.));
        assert_eq!(
            textures(&harness),
            [
                ("track".to_string(), Rect::new(0., 7., 200., 13.)),
                ("bar".to_string(), Rect::new(0., 7., 50., 13.)),
            ]
        );
    }

    #[test]
    fn empty_bar_draws_only_the_track() {
        let harness = harness(ProgressBar::new(0.));
        assert_eq!(textures(&harness).len(), 1);
    }
}
