// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Point, Rect, Size};
use tracing::trace;

use crate::core::{EventCtx, Handled, LayoutCtx, Node, PaintCtx, PlaceCtx, PointerEvent};
use crate::geometry::contains_inclusive;
use crate::layout::ScrollLayout;
use crate::layout::scroll::GUTTER;
use crate::layout::overlay;

/// A vertically scrolling viewport.
///
/// The viewport takes all the space it is offered. Children get the viewport width minus
/// the scrollbar gutter and may be taller than the viewport. The wheel scrolls by a fixed
/// step per notch, and the scrollbar knob can be dragged.
///
/// The scroll position survives rebuilds that reuse the node.
#[derive(Clone, Debug, Default)]
pub struct ScrollView {
    scroll: ScrollLayout,
    /// Distance from the knob's top edge to the pointer while dragging.
    grab: Option<f64>,
}

// --- MARK: BUILDERS
impl ScrollView {
    /// Create a viewport scrolled to the top.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current scroll offset, in backend pixels.
    pub fn offset(&self) -> f64 {
        self.scroll.offset()
    }

    /// The scroll state, including the results of the last resize.
    pub fn scroll(&self) -> &ScrollLayout {
        &self.scroll
    }

    fn knob(&self, ctx: &EventCtx<'_>) -> Option<Rect> {
        self.scroll.knob_rect(ctx.inner_rect(), ctx.scale())
    }
}

// --- MARK: IMPL NODE
impl Node for ScrollView {
    fn is_interactive(&self) -> bool {
        true
    }

    fn is_scrollable(&self) -> bool {
        true
    }

    fn draws_focus(&self) -> bool {
        false
    }

    fn clips_children(&self) -> bool {
        true
    }

    fn adopt(&mut self, previous: Box<dyn Node>) {
        if let Some(previous) = previous.downcast_ref::<Self>() {
            self.scroll = previous.scroll.clone();
            self.grab = previous.grab;
        }
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        let children = overlay::minimum_size(ctx);
        Size::new(children.width + GUTTER * ctx.scale(), 0.)
    }

    fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        self.scroll.resize(ctx, available)
    }

    fn reposition(&mut self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        self.scroll.reposition(ctx, inside)
    }

    fn on_pointer_event(&mut self, ctx: &mut EventCtx<'_>, event: &PointerEvent) -> Handled {
        match event {
            PointerEvent::Wheel { delta, .. } => {
                if self.scroll.scroll_by(delta.y, ctx.scale()) {
                    trace!("scrolled to {}", self.scroll.offset());
                    ctx.request_layout();
                }
                Handled::Yes
            }
            PointerEvent::Down { pos, .. } => match self.knob(ctx) {
                Some(knob) if contains_inclusive(knob, *pos) => {
                    self.grab = Some(pos.y - knob.y0);
                    Handled::Yes
                }
                _ => Handled::No,
            },
            PointerEvent::Move { pos } => {
                let Some(grab) = self.grab else {
                    return Handled::No;
                };
                if self.scroll.drag_knob_to(pos.y - grab, ctx.inner_rect()) {
                    ctx.request_layout();
                }
                Handled::Yes
            }
            PointerEvent::Up { .. } => Handled::from(self.grab.take().is_some()),
            PointerEvent::Click { .. } => Handled::No,
        }
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, _inner: Rect) {
        ctx.fill_background();
    }

    fn post_paint(&mut self, ctx: &mut PaintCtx<'_>, inner: Rect) {
        let scale = ctx.scale();
        if let Some(knob) = self.scroll.knob_rect(inner, scale) {
            ctx.draw_asset("scroll.vertical.track", self.scroll.track_rect(inner, scale));
            ctx.draw_asset("scroll.knob", knob);
        }
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ForEach, NewNode, NodeExt};
    use crate::nodes::{Rectangle, Stack};
    use crate::style::StyleExt;
    use crate::app::RenderRootOptions;
    use crate::backend::Theme;
    use crate::testing::{DrawCommand, TestHarness, TextureDrawable};

    fn long_list() -> NewNode {
        ScrollView::new().with_child(
            Stack::vertical()
                .with_each(ForEach::new(0..10, |_| Rectangle::fixed(50., 40.)))
                .spacing(0.),
        )
    }

    fn offset(harness: &TestHarness) -> f64 {
        harness
            .root()
            .downcast::<ScrollView>()
            .map(ScrollView::offset)
            .unwrap()
    }

    #[test]
    fn content_is_taller_than_the_viewport() {
        let harness = TestHarness::create_with_size(long_list(), Size::new(100., 100.));
        let scroll = harness.root().downcast::<ScrollView>().unwrap().scroll();
        assert_eq!(scroll.content_size().height, 400.);
        assert_eq!(scroll.viewport_size(), Size::new(100., 100.));
        // Offered 85 px (the viewport minus the gutter), the column keeps its own width.
        assert_eq!(harness.get(&["ScrollView-0", "Stack-0"]).size(), Size::new(50., 400.));
    }

    #[test]
    fn wheel_scrolls_and_clamps() {
        let mut harness = TestHarness::create_with_size(long_list(), Size::new(100., 100.));
        harness.mouse_move((50., 50.));
        harness.mouse_wheel((0., 2.));
        assert_eq!(offset(&harness), 40.);
        let column = harness.get(&["ScrollView-0", "Stack-0"]);
        assert_eq!(column.layout_rect().y0, -40.);

        harness.mouse_wheel((0., 100.));
        assert_eq!(offset(&harness), 300.);
        harness.mouse_wheel((0., -100.));
        assert_eq!(offset(&harness), 0.);
    }

    #[test]
    fn offset_survives_rebuild() {
        let mut harness = TestHarness::create_with_size(long_list(), Size::new(100., 100.));
        harness.mouse_move((50., 50.));
        harness.mouse_wheel((0., 3.));
        harness.rebuild(long_list()).unwrap();
        assert_eq!(offset(&harness), 60.);
    }

    #[test]
    fn knob_can_be_dragged() {
        let mut harness = TestHarness::create_with_size(long_list(), Size::new(100., 100.));
        // The knob is 25 px tall at the top of the track.
        harness.mouse_move((93., 10.));
        harness.mouse_down();
        harness.mouse_move((93., 47.5));
        harness.mouse_up();
        assert_eq!(offset(&harness), 150.);
    }

    #[test]
    fn children_are_clipped() {
        let harness = TestHarness::create_with_size(long_list(), Size::new(100., 100.));
        let commands = harness.draw_log().commands();
        assert!(commands.contains(&DrawCommand::PushClip(Rect::new(0., 0., 100., 100.))));
        assert!(commands.contains(&DrawCommand::PopClip));
    }

    #[test]
    fn scroll_bar_is_drawn_over_the_content() {
        let theme = Theme::new()
            .with_asset("scroll.vertical.track", TextureDrawable::new("track", (1., 1.)))
            .with_asset("scroll.knob", TextureDrawable::new("knob", (1., 1.)));
        let options = RenderRootOptions {
            size: Size::new(100., 100.),
            theme: Box::new(theme),
            ..Default::default()
        };
        let harness = TestHarness::create_with(long_list(), options);

        let commands = harness.draw_log().commands();
        let position = |wanted: &dyn Fn(&DrawCommand) -> bool| {
            commands.iter().rposition(|command| wanted(command)).unwrap()
        };
        let last_fill = position(&|command| matches!(command, DrawCommand::Fill { .. }));
        let knob = position(&|command| {
            matches!(command, DrawCommand::Texture { key, .. } if key == "knob")
        });
        let track = position(&|command| {
            matches!(command, DrawCommand::Texture { key, .. } if key == "track")
        });
        assert!(last_fill < track);
        assert!(track < knob);
    }

    #[test]
    fn content_that_fits_does_not_scroll() {
        let tree = ScrollView::new().with_child(Rectangle::fixed(10., 10.));
        let mut harness = TestHarness::create_with_size(tree, Size::new(100., 100.));
        harness.mouse_move((50., 50.));
        harness.mouse_wheel((0., 1.));
        assert_eq!(offset(&harness), 0.);
    }
}
