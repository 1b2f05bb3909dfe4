// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The default layout: children are stacked on top of each other, each centred in the
//! inner rectangle of the parent.

use kurbo::{Point, Rect, Size};

use crate::core::{LayoutCtx, Node, PlaceCtx};
use crate::geometry::{deflate_size, inflate_size};

/// The largest minimum size of any child.
pub fn minimum_size(ctx: &mut LayoutCtx<'_>) -> Size {
    let mut size = Size::ZERO;
    for index in 0..ctx.child_count() {
        let child = ctx.child_minimum(index);
        size = Size::new(size.width.max(child.width), size.height.max(child.height));
    }
    size
}

/// Offers every child the inner size and takes the union of the node's own content size
/// and the children's sizes, plus insets.
pub fn resize<N: Node + ?Sized>(node: &mut N, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
    let insets = ctx.style().insets();
    let inner = deflate_size(available, insets);
    let mut size = node.content_size(ctx, inner);
    for index in 0..ctx.child_count() {
        let child = ctx.resize_child(index, inner);
        size = Size::new(size.width.max(child.width), size.height.max(child.height));
    }
    inflate_size(size, insets)
}

/// Centres the node in `inside` and places every child in the node's inner rectangle.
pub fn reposition(ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
    let origin = centered_origin(inside, ctx.size());
    let inner = Rect::from_origin_size(origin, ctx.size()) - ctx.style().insets();
    for index in 0..ctx.child_count() {
        ctx.place_child(index, inner);
    }
    origin
}

/// The origin that centres `size` in the slack of `inside`.
///
/// When `size` overflows `inside` on an axis, the leading edges are aligned instead.
pub fn centered_origin(inside: Rect, size: Size) -> Point {
    Point::new(
        inside.x0 + ((inside.width() - size.width) / 2.).max(0.),
        inside.y0 + ((inside.height() - size.height) / 2.).max(0.),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_in_slack() {
        let inside = Rect::new(10., 20., 110., 70.);
        assert_eq!(
            centered_origin(inside, Size::new(20., 10.)),
            Point::new(50., 40.)
        );
    }

    #[test]
    fn overflow_aligns_leading() {
        let inside = Rect::new(0., 0., 10., 10.);
        assert_eq!(centered_origin(inside, Size::new(30., 4.)), Point::new(0., 3.));
    }
}
