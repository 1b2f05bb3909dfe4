// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Flow layout in fixed-size chunks.
//!
//! A vertical grid fills rows from left to right and stacks the rows from top to bottom:
//!
//! ```text
//! 1 2
//! 3 4
//! 5 6
//! ```
//!
//! A horizontal grid fills columns from top to bottom and lines the columns up from left
//! to right. The axis is the one the grid would scroll along.

use kurbo::{Point, Rect, Size};

use crate::core::{LayoutCtx, PlaceCtx};
use crate::geometry::{Axis, deflate_size};
use crate::layout::overlay::centered_origin;
use crate::layout::stack;

/// Configuration and per-layout cache of a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    /// Fixed number of items per chunk.
    pub num: Option<usize>,
    /// Fixed cross extent of every item, in logical units. The number of items per chunk is
    /// derived from the available space.
    pub cell_size: Option<f64>,
    /// The axis chunks are stacked along.
    pub axis: Axis,
    /// Stretch cells to share the available cross space even when `cell_size` is set.
    pub flex: bool,
    /// Divide the available main space evenly between chunks instead of sizing each chunk
    /// to its largest item.
    pub cram: bool,

    count: usize,
    cell: f64,
    chunks: Vec<f64>,
}

impl GridLayout {
    /// A grid configuration. `count` and `cell_size` are mutually exclusive.
    pub fn new(num: Option<usize>, cell_size: Option<f64>, axis: Axis) -> Self {
        Self {
            num,
            cell_size,
            axis,
            flex: false,
            cram: false,
            count: 1,
            cell: 0.,
            chunks: Vec::new(),
        }
    }

    /// Number of items per chunk for the given available cross extent.
    ///
    /// At least one.
    pub fn cross_count(&self, available_cross: f64, spacing: f64, scale: f64) -> usize {
        match (self.num, self.cell_size) {
            (Some(num), _) => num.max(1),
            (None, Some(size)) if size > 0. => {
                let size = size * scale;
                (((available_cross + spacing) / (size + spacing)).floor() as usize).max(1)
            }
            _ => 1,
        }
    }

    /// Items per chunk chosen by the last resize.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Main-axis extent of every chunk chosen by the last resize.
    pub fn chunk_extents(&self) -> &[f64] {
        &self.chunks
    }

    /// Minimum size of a grid: every item in a single chunk, laid out along the axis.
    pub fn minimum_size(&self, ctx: &mut LayoutCtx<'_>) -> Size {
        stack::minimum_size(ctx, self.axis)
    }

    /// Resize pass of a grid.
    ///
    /// The grid takes all of the available cross space and as much main space as its chunks
    /// need.
    pub fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        let axis = self.axis;
        let insets = ctx.style().insets();
        let spacing = ctx.style().spacing;
        let inner = deflate_size(available, insets);
        let items = ctx.child_count();

        self.count = self.cross_count(axis.minor(inner), spacing, ctx.scale());
        let cross_available = (axis.minor(inner) - spacing * (self.count - 1) as f64).max(0.);
        self.cell = match self.cell_size {
            Some(size) if !self.flex => size * ctx.scale(),
            _ => cross_available / self.count as f64,
        };

        let chunk_count = items.div_ceil(self.count);
        let cram_extent = self.cram.then(|| {
            let gaps = spacing * chunk_count.saturating_sub(1) as f64;
            ((axis.major(inner) - gaps) / chunk_count.max(1) as f64).max(0.)
        });

        self.chunks.clear();
        for chunk in 0..chunk_count {
            let mut extent: f64 = 0.;
            for index in chunk * self.count..((chunk + 1) * self.count).min(items) {
                let offer = axis.pack_size(cram_extent.unwrap_or(self.cell), self.cell);
                let child = ctx.resize_child(index, offer);
                extent = extent.max(axis.major(child));
            }
            self.chunks.push(cram_extent.unwrap_or(extent));
        }

        let main = self.chunks.iter().sum::<f64>()
            + spacing * chunk_count.saturating_sub(1) as f64
            + axis.major_insets(insets);
        axis.pack_size(main, axis.minor(available))
    }

    /// Reposition pass of a grid: every item is centred in its cell.
    pub fn reposition(&self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        let axis = self.axis;
        let size = ctx.size();
        let origin = centered_origin(inside, size);
        let inner = Rect::from_origin_size(origin, size) - ctx.style().insets();
        let spacing = ctx.style().spacing;
        let items = ctx.child_count();

        let mut main = axis.major_pos(inner.origin());
        for (chunk, extent) in self.chunks.iter().enumerate() {
            let mut cross = axis.minor_pos(inner.origin());
            for index in chunk * self.count..((chunk + 1) * self.count).min(items) {
                let cell = Rect::from_origin_size(
                    axis.pack_point(main, cross),
                    axis.pack_size(*extent, self.cell),
                );
                ctx.place_child(index, cell);
                cross += self.cell + spacing;
            }
            main += extent + spacing;
        }
        origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_from_cell_size() {
        let grid = GridLayout::new(None, Some(50.), Axis::Vertical);
        // (230 + 10) / (50 + 10) = 4
        assert_eq!(grid.cross_count(230., 10., 1.0), 4);
        assert_eq!(grid.cross_count(229., 10., 1.0), 3);
        assert_eq!(grid.cross_count(10., 10., 1.0), 1, "never zero");
        assert_eq!(grid.cross_count(230., 10., 2.0), 2);
    }

    #[test]
    fn fixed_count_ignores_space() {
        let grid = GridLayout::new(Some(3), None, Axis::Horizontal);
        assert_eq!(grid.cross_count(1., 10., 1.0), 3);
    }
}
