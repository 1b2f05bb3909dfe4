// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Point, Rect, Size};

use crate::core::{LayoutCtx, Node, PlaceCtx};
use crate::geometry::{Alignment, Axis};
use crate::layout::stack;
use crate::style::Style;

/// Default spacing between stack children, in logical units.
const DEFAULT_SPACING: f64 = 10.;

/// A container that lays out its children in a row or a column.
///
/// Space along the axis is served by [priority](crate::geometry::Priority): see
/// [`layout::stack`](crate::layout::stack). Children are aligned across the axis by the
/// stack's alignment, centred by default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    axis: Axis,
}

// --- MARK: BUILDERS
impl Stack {
    /// A stack laying out children along `axis`.
    pub fn new(axis: Axis) -> Self {
        Self { axis }
    }

    /// A row.
    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal)
    }

    /// A column.
    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    /// The stacking axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }
}

// --- MARK: IMPL NODE
impl Node for Stack {
    fn default_style(&self) -> Style {
        Style {
            spacing: Some(DEFAULT_SPACING),
            alignment: Some(Alignment::Center),
            ..Default::default()
        }
    }

    fn debug_text(&self) -> Option<String> {
        Some(format!("{:?}", self.axis))
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        stack::minimum_size(ctx, self.axis)
    }

    fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        stack::resize(ctx, self.axis, available)
    }

    fn reposition(&mut self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        stack::reposition(ctx, self.axis, inside)
    }
}

// --- MARK: TESTS
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeExt;
    use crate::nodes::{Rectangle, Spacer, Text};
    use crate::style::StyleExt;
    use crate::testing::TestHarness;

    #[test]
    fn default_spacing_and_alignment() {
        let tree = Stack::vertical()
            .with_child(Text::new("long line"))
            .with_child(Text::new("a"));
        let harness = TestHarness::create(tree);

        let stack = harness.get(&["Stack-0"]);
        assert_eq!(stack.size(), Size::new(90., 42.));
        let short = harness.get(&["Stack-0", "Text-1"]);
        let long = harness.get(&["Stack-0", "Text-0"]);
        assert_eq!(short.layout_rect().y0 - long.layout_rect().y1, 10.);
        assert_eq!(short.layout_rect().center().x, long.layout_rect().center().x);
    }

    #[test]
    fn leading_alignment() {
        let tree = Stack::vertical()
            .with_child(Text::new("long line"))
            .with_child(Text::new("a"))
            .alignment(Alignment::Leading);
        let harness = TestHarness::create(tree);

        let short = harness.get(&["Stack-0", "Text-1"]);
        let long = harness.get(&["Stack-0", "Text-0"]);
        assert_eq!(short.layout_rect().x0, long.layout_rect().x0);
    }

    #[test]
    fn spacer_takes_the_rest_of_the_row() {
        let tree = Stack::horizontal()
            .with_child(Text::new("left"))
            .with_child(Spacer::new())
            .with_child(Text::new("right"))
            .spacing(0.);
        let harness = TestHarness::create_with_size(tree, Size::new(300., 50.));

        assert_eq!(harness.get(&["Stack-0"]).size().width, 300.);
        assert_eq!(harness.get(&["Stack-0", "Spacer-1"]).size(), Size::new(210., 0.));
        assert_eq!(harness.get(&["Stack-0", "Text-2"]).layout_rect().x1, 300.);
    }

    #[test]
    fn equal_priorities_split_evenly() {
        let tree = Stack::horizontal()
            .with_child(Rectangle::new())
            .with_child(Rectangle::new())
            .spacing(10.);
        let harness = TestHarness::create_with_size(tree, Size::new(210., 40.));

        assert_eq!(harness.get(&["Stack-0", "Rectangle-0"]).size(), Size::new(100., 40.));
        assert_eq!(harness.get(&["Stack-0", "Rectangle-1"]).size(), Size::new(100., 40.));
    }
}
