// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Vertical scrolling viewport.
//!
//! The viewport takes all of the space it is offered. Its children are offered the
//! viewport width minus the scrollbar gutter and at least their minimum height, so the
//! content may be taller than the viewport. The scroll offset is clamped to
//! `[0, content height - viewport height]`.

use kurbo::{Point, Rect, Size};

use crate::core::{LayoutCtx, PlaceCtx};
use crate::geometry::deflate_size;
use crate::layout::overlay::centered_origin;

/// Width reserved for the scrollbar, in logical units.
pub const GUTTER: f64 = 15.;

/// Distance scrolled per wheel notch, in logical units.
pub const SCROLL_STEP: f64 = 20.;

/// Width of the scrollbar knob, in logical units.
const KNOB_WIDTH: f64 = 11.;

/// Distance from the right edge of the viewport to the knob's left edge, in logical units.
const KNOB_INSET: f64 = 13.;

/// Scroll state and per-layout cache of a scroll viewport.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollLayout {
    offset: f64,
    content: Size,
    viewport: Size,
}

impl ScrollLayout {
    /// The current scroll offset, in backend pixels from the top.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Size of the content: the largest child.
    pub fn content_size(&self) -> Size {
        self.content
    }

    /// Size of the viewport, padding and border excluded.
    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// The largest valid offset.
    pub fn max_offset(&self) -> f64 {
        (self.content.height - self.viewport.height).max(0.)
    }

    /// Set the offset, clamped to the content range. Returns whether it changed.
    pub fn set_offset(&mut self, offset: f64) -> bool {
        let offset = offset.clamp(0., self.max_offset());
        let changed = offset != self.offset;
        self.offset = offset;
        changed
    }

    /// Scroll by `notches` wheel notches, positive downwards.
    pub fn scroll_by(&mut self, notches: f64, scale: f64) -> bool {
        self.set_offset(self.offset + notches * SCROLL_STEP * scale)
    }

    /// Resize pass of a viewport.
    pub fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        let insets = ctx.style().insets();
        let inner = deflate_size(available, insets);
        let width = (inner.width - GUTTER * ctx.scale()).max(0.);
        let mut content = Size::ZERO;
        for index in 0..ctx.child_count() {
            let minimum = ctx.child_minimum(index);
            let child = ctx.resize_child(index, Size::new(width, inner.height.max(minimum.height)));
            content = Size::new(content.width.max(child.width), content.height.max(child.height));
        }
        self.content = content;
        self.viewport = inner;
        self.set_offset(self.offset);
        available
    }

    /// Reposition pass of a viewport: children are laid out from the scrolled top edge.
    pub fn reposition(&self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        let size = ctx.size();
        let origin = centered_origin(inside, size);
        let inner = Rect::from_origin_size(origin, size) - ctx.style().insets();
        let width = (inner.width() - GUTTER * ctx.scale()).max(0.);
        let top = Point::new(inner.x0, inner.y0 - self.offset);
        for index in 0..ctx.child_count() {
            let child = ctx.child_size(index);
            ctx.place_child(
                index,
                Rect::from_origin_size(top, Size::new(width, child.height)),
            );
        }
        origin
    }

    /// Height of the scrollbar knob for a viewport of height `viewport`, or zero when
    /// everything fits.
    pub fn knob_height(&self, viewport: f64) -> f64 {
        if self.content.height > viewport && self.content.height > 0. {
            (viewport * viewport / self.content.height).min(viewport)
        } else {
            0.
        }
    }

    /// The knob rectangle inside the viewport rectangle `inner`.
    ///
    /// `None` when the content fits.
    pub fn knob_rect(&self, inner: Rect, scale: f64) -> Option<Rect> {
        let height = self.knob_height(inner.height());
        if height <= 0. {
            return None;
        }
        let max_offset = self.max_offset();
        let fraction = if max_offset > 0. {
            self.offset / max_offset
        } else {
            0.
        };
        let top = inner.y0 + ((inner.height() - height) * fraction).max(0.);
        Some(Rect::from_origin_size(
            (inner.x1 - KNOB_INSET * scale, top),
            (KNOB_WIDTH * scale, height),
        ))
    }

    /// The scrollbar track rectangle inside the viewport rectangle `inner`.
    pub fn track_rect(&self, inner: Rect, scale: f64) -> Rect {
        Rect::new(inner.x1 - GUTTER * scale, inner.y0, inner.x1, inner.y1)
    }

    /// Move the knob so that its top edge is at `knob_top`, in window coordinates.
    pub fn drag_knob_to(&mut self, knob_top: f64, inner: Rect) -> bool {
        let track = inner.height() - self.knob_height(inner.height());
        if track <= 0. {
            return false;
        }
        let fraction = ((knob_top - inner.y0) / track).clamp(0., 1.);
        self.set_offset(self.max_offset() * fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(content: f64, viewport: f64) -> ScrollLayout {
        ScrollLayout {
            offset: 0.,
            content: Size::new(100., content),
            viewport: Size::new(100., viewport),
        }
    }

    #[test]
    fn offset_is_clamped_to_content() {
        let mut scroll = layout(300., 100.);
        assert!(scroll.scroll_by(3., 1.0));
        assert_eq!(scroll.offset(), 60.);
        scroll.scroll_by(100., 1.0);
        assert_eq!(scroll.offset(), 200.);
        scroll.scroll_by(-100., 1.0);
        assert_eq!(scroll.offset(), 0.);
        assert!(!scroll.scroll_by(-1., 1.0), "already at the top");
    }

    #[test]
    fn nothing_to_scroll_when_content_fits() {
        let mut scroll = layout(50., 100.);
        assert!(!scroll.scroll_by(5., 1.0));
        assert_eq!(scroll.knob_height(100.), 0.);
        assert!(scroll.knob_rect(Rect::new(0., 0., 100., 100.), 1.0).is_none());
    }

    #[test]
    fn knob_tracks_offset() {
        let mut scroll = layout(400., 100.);
        let inner = Rect::new(0., 0., 100., 100.);
        assert_eq!(scroll.knob_height(100.), 25.);
        scroll.set_offset(300.);
        let knob = scroll.knob_rect(inner, 1.0).unwrap();
        assert_eq!(knob.y0, 75.);
        assert_eq!(knob.x0, 87.);
        assert!(scroll.drag_knob_to(37.5, inner));
        assert_eq!(scroll.offset(), 150.);
    }
}
