// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Point, Rect, Size};

use crate::core::{BuildError, LayoutCtx, Node, PlaceCtx};
use crate::geometry::Axis;
use crate::layout::GridLayout;

/// A container that flows its children into chunks of equal length.
///
/// Exactly one of [`num`](Self::num) and [`cell_size`](Self::cell_size) must be set;
/// anything else is a construction error. See [`layout::grid`](crate::layout::grid).
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    layout: GridLayout,
}

// --- MARK: BUILDERS
impl Grid {
    /// A grid whose chunks are stacked along `axis`.
    pub fn new(axis: Axis) -> Self {
        Self {
            layout: GridLayout::new(None, None, axis),
        }
    }

    /// A grid filling rows, stacked top to bottom.
    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    /// A grid filling columns, lined up left to right.
    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal)
    }

    /// Fixed number of items per chunk.
    pub fn num(mut self, num: usize) -> Self {
        self.layout.num = Some(num);
        self
    }

    /// Fixed cross extent of every item, in logical units.
    pub fn cell_size(mut self, size: f64) -> Self {
        self.layout.cell_size = Some(size);
        self
    }

    /// Stretch cells to fill the cross axis even with a fixed cell size.
    pub fn flex(mut self, flex: bool) -> Self {
        self.layout.flex = flex;
        self
    }

    /// Divide the main axis evenly between chunks.
    pub fn cram(mut self, cram: bool) -> Self {
        self.layout.cram = cram;
        self
    }

    /// The layout state, including the results of the last resize.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }
}

// --- MARK: IMPL NODE
impl Node for Grid {
    fn validate(&self) -> Result<(), BuildError> {
        match (self.layout.num, self.layout.cell_size) {
            (Some(0), _) => Err(BuildError::invalid("Grid", "`num` must be at least 1")),
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(BuildError::invalid(
                "Grid",
                "exactly one of `num` and `cell_size` must be set",
            )),
        }
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        self.layout.minimum_size(ctx)
    }

    fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        self.layout.resize(ctx, available)
    }

    fn reposition(&mut self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        self.layout.reposition(ctx, inside)
    }
}
