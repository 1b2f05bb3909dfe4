// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Priority-weighted linear layout.
//!
//! Children are grouped by [`Priority`]. Levels are served from the highest down: each
//! level first reserves the minimum sizes of every lower level, then divides what is left
//! evenly among its own children, never offering a child less than its own minimum. The
//! first level served always gets at least its minimums; later levels are capped at what
//! remains, so low-priority children may end up with nothing.

use std::collections::BTreeMap;

use kurbo::{Point, Rect, Size};
use tracing::trace;

use crate::core::{LayoutCtx, PlaceCtx};
use crate::geometry::{Axis, Priority, deflate_size};
use crate::layout::overlay::centered_origin;

fn total_spacing(spacing: f64, count: usize) -> f64 {
    spacing * count.saturating_sub(1) as f64
}

/// Sum of the children's minimums along `axis`, largest minimum across it, plus spacing.
pub fn minimum_size(ctx: &mut LayoutCtx<'_>, axis: Axis) -> Size {
    let count = ctx.child_count();
    let mut major = total_spacing(ctx.style().spacing, count);
    let mut minor: f64 = 0.;
    for index in 0..count {
        let child = ctx.child_minimum(index);
        major += axis.major(child);
        minor = minor.max(axis.minor(child));
    }
    axis.pack_size(major, minor)
}

/// Resize the children along `axis` and return the stack's size.
pub fn resize(ctx: &mut LayoutCtx<'_>, axis: Axis, available: Size) -> Size {
    ctx.set_child_axis(Some(axis));
    let insets = ctx.style().insets();
    let count = ctx.child_count();
    let spacing = total_spacing(ctx.style().spacing, count);
    let inner = deflate_size(available, insets);
    let cross_available = axis.minor(inner);

    let minimums: Vec<f64> = (0..count)
        .map(|index| axis.major(ctx.child_minimum(index)))
        .collect();
    let mut levels: BTreeMap<Priority, Vec<usize>> = BTreeMap::new();
    for index in 0..count {
        levels
            .entry(ctx.child_style(index).priority)
            .or_default()
            .push(index);
    }

    let mut remaining = axis.major(inner) - spacing;
    let mut consumed = 0.;
    let mut max_cross: f64 = 0.;
    for (level_index, (priority, children)) in levels.iter().rev().enumerate() {
        let reserved: f64 = levels
            .range(..*priority)
            .flat_map(|(_, lower)| lower.iter())
            .map(|&index| minimums[index])
            .sum();
        let mut unreserved = remaining - reserved;
        for (position, &index) in children.iter().enumerate() {
            let later_minimums: f64 = children[position + 1..]
                .iter()
                .map(|&later| minimums[later])
                .sum();
            let share = unreserved / (children.len() - position) as f64;
            let mut offer = minimums[index].max(share.min(unreserved - later_minimums));
            if level_index > 0 {
                offer = offer.min(remaining.max(0.));
            }
            let offer = offer.max(0.);
            let child = ctx.resize_child(index, axis.pack_size(offer, cross_available));
            trace!(?priority, index, offer, size = ?child, "stack child");
            let taken = axis.major(child);
            unreserved -= taken;
            remaining -= taken;
            consumed += taken;
            max_cross = max_cross.max(axis.minor(child));
        }
    }

    axis.pack_size(
        consumed + spacing + axis.major_insets(insets),
        max_cross + axis.cross().major_insets(insets),
    )
}

/// Place the children one after the other along `axis`, aligned across it.
pub fn reposition(ctx: &mut PlaceCtx<'_>, axis: Axis, inside: Rect) -> Point {
    let size = ctx.size();
    let origin = centered_origin(inside, size);
    let inner = Rect::from_origin_size(origin, size) - ctx.style().insets();
    let spacing = ctx.style().spacing;
    let fraction = ctx.style().alignment.fraction();
    let cross_origin = axis.minor_pos(inner.origin());
    let cross_extent = axis.minor(inner.size());

    let mut cursor = axis.major_pos(inner.origin());
    for index in 0..ctx.child_count() {
        let child = ctx.child_size(index);
        let leftover = (cross_extent - axis.minor(child)).max(0.);
        let pos = axis.pack_point(cursor, cross_origin + fraction * leftover);
        ctx.place_child(index, Rect::from_origin_size(pos, child));
        cursor += axis.major(child) + spacing;
    }
    origin
}
