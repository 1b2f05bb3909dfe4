// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Rect, Size};

use crate::backend::Primitive;
use crate::core::{LayoutCtx, Node, PaintCtx};

/// One dimension of a [`Rectangle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// A fixed length in logical units, multiplied by the scale factor.
    Fixed(f64),
    /// A fraction of the offered space.
    Fraction(f64),
}

impl Length {
    /// The length in backend pixels, given the offered extent.
    pub fn resolve(self, available: f64, scale: f64) -> f64 {
        match self {
            Self::Fixed(length) => length * scale,
            Self::Fraction(fraction) => fraction * available,
        }
    }

    fn minimum(self, scale: f64) -> f64 {
        match self {
            Self::Fixed(length) => length * scale,
            Self::Fraction(_) => 0.,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::Fraction(1.0)
    }
}

/// A filled rectangle.
///
/// Drawn with the background colour if there is one, and the foreground colour otherwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rectangle {
    width: Length,
    height: Length,
}

impl Rectangle {
    /// A rectangle taking all of the offered space.
    pub fn new() -> Self {
        Self::default()
    }

    /// A rectangle of fixed size, in logical units.
    pub fn fixed(width: f64, height: f64) -> Self {
        Self::sized(Length::Fixed(width), Length::Fixed(height))
    }

    /// A rectangle with the given dimensions.
    pub fn sized(width: Length, height: Length) -> Self {
        Self { width, height }
    }
}

impl Node for Rectangle {
    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        let scale = ctx.scale();
        Size::new(self.width.minimum(scale), self.height.minimum(scale))
    }

    fn content_size(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        let scale = ctx.scale();
        Size::new(
            self.width.resolve(available.width, scale),
            self.height.resolve(available.height, scale),
        )
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, _inner: Rect) {
        let color = ctx.style().background.unwrap_or(ctx.style().color);
        let frame = ctx.frame();
        ctx.draw(&Primitive::Fill(color), frame);
    }
}
