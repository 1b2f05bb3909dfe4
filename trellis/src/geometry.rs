// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometry vocabulary shared by style, layout and event routing.
//!
//! Points, sizes, rectangles and insets are the [`kurbo`] types; this module adds the
//! axis, alignment and priority enumerations and a few helpers over them.

use kurbo::{Insets, Point, Rect, Size, Vec2};
use serde::Deserialize;

/// An axis in visual space.
///
/// Stacks and grids lay their children out along a primary axis; the other one is the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

impl Axis {
    /// Get the axis perpendicular to this one.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Extract from the argument the magnitude along this axis.
    pub fn major(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Extract from the argument the magnitude along the perpendicular axis.
    pub fn minor(self, size: Size) -> f64 {
        self.cross().major(size)
    }

    /// Extract the coordinate of the argument along this axis.
    pub fn major_pos(self, pos: Point) -> f64 {
        match self {
            Self::Horizontal => pos.x,
            Self::Vertical => pos.y,
        }
    }

    /// Extract the coordinate of the argument along the perpendicular axis.
    pub fn minor_pos(self, pos: Point) -> f64 {
        self.cross().major_pos(pos)
    }

    /// Extract the component of a vector along this axis.
    pub fn major_vec(self, vec: Vec2) -> f64 {
        match self {
            Self::Horizontal => vec.x,
            Self::Vertical => vec.y,
        }
    }

    /// Total insets along this axis, leading plus trailing.
    pub fn major_insets(self, insets: Insets) -> f64 {
        match self {
            Self::Horizontal => insets.x_value(),
            Self::Vertical => insets.y_value(),
        }
    }

    /// Leading inset along this axis (left or top).
    pub fn leading_inset(self, insets: Insets) -> f64 {
        match self {
            Self::Horizontal => insets.x0,
            Self::Vertical => insets.y0,
        }
    }

    /// Arrange the major and minor measurements into a [`Size`].
    pub fn pack_size(self, major: f64, minor: f64) -> Size {
        match self {
            Self::Horizontal => Size::new(major, minor),
            Self::Vertical => Size::new(minor, major),
        }
    }

    /// Arrange the major and minor coordinates into a [`Point`].
    pub fn pack_point(self, major: f64, minor: f64) -> Point {
        match self {
            Self::Horizontal => Point::new(major, minor),
            Self::Vertical => Point::new(minor, major),
        }
    }
}

/// Placement of a child on the cross axis of its container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left or top.
    Leading,
    /// Centered in the leftover space.
    #[default]
    Center,
    /// Right or bottom.
    Trailing,
}

impl Alignment {
    /// The fraction of leftover space placed before the child.
    pub fn fraction(self) -> f64 {
        match self {
            Self::Leading => 0.0,
            Self::Center => 0.5,
            Self::Trailing => 1.0,
        }
    }
}

/// Discrete layout priority of a stack child.
///
/// Higher priorities are offered space first; lower levels only get what is left after the
/// minimum sizes of everything below them have been reserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Served last; may receive no space at all.
    Optional = 0,
    /// Below normal.
    Low = 1,
    /// The default.
    #[default]
    Normal = 2,
    /// Served first.
    High = 3,
}

/// Returns `true` if `pos` lies inside `rect`, edges included.
pub fn contains_inclusive(rect: Rect, pos: Point) -> bool {
    pos.x >= rect.x0 && pos.x <= rect.x1 && pos.y >= rect.y0 && pos.y <= rect.y1
}

/// Linear interpolation of every component of two rectangles' origin and size.
pub fn lerp_rect(from: Rect, to: Rect, t: f64) -> Rect {
    let lerp = |a: f64, b: f64| a + (b - a) * t;
    Rect::from_origin_size(
        (lerp(from.x0, to.x0), lerp(from.y0, to.y0)),
        (
            lerp(from.width(), to.width()),
            lerp(from.height(), to.height()),
        ),
    )
}

/// Shrink `size` by `insets`, never going below zero.
pub fn deflate_size(size: Size, insets: Insets) -> Size {
    Size::new(
        (size.width - insets.x_value()).max(0.),
        (size.height - insets.y_value()).max(0.),
    )
}

/// Grow `size` by `insets`.
pub fn inflate_size(size: Size, insets: Insets) -> Size {
    Size::new(size.width + insets.x_value(), size.height + insets.y_value())
}

/// Scale every edge of `insets` by `factor`.
pub fn scale_insets(insets: Insets, factor: f64) -> Insets {
    Insets::new(
        insets.x0 * factor,
        insets.y0 * factor,
        insets.x1 * factor,
        insets.y1 * factor,
    )
}

/// Sum of two insets, edge by edge.
pub fn add_insets(a: Insets, b: Insets) -> Insets {
    Insets::new(a.x0 + b.x0, a.y0 + b.y0, a.x1 + b.x1, a.y1 + b.y1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_insets_inflate_and_deflate() {
        let rect = Rect::from_origin_size((100., 100.), (150., 50.));
        let grown = rect + Insets::uniform(10.);
        assert_eq!(grown.origin(), Point::new(90., 90.));
        assert_eq!(grown.size(), Size::new(170., 70.));
        let shrunk = rect - Insets::uniform(10.);
        assert_eq!(shrunk.origin(), Point::new(110., 110.));
        assert_eq!(shrunk.size(), Size::new(130., 30.));
    }

    #[test]
    fn axis_packing() {
        let axis = Axis::Vertical;
        assert_eq!(axis.pack_size(3., 4.), Size::new(4., 3.));
        assert_eq!(axis.major(Size::new(4., 3.)), 3.);
        assert_eq!(axis.minor(Size::new(4., 3.)), 4.);
        assert_eq!(axis.cross(), Axis::Horizontal);
        let insets = Insets::new(1., 2., 3., 4.);
        assert_eq!(Axis::Horizontal.major_insets(insets), 4.);
        assert_eq!(Axis::Vertical.leading_inset(insets), 2.);
    }

    #[test]
    fn priorities_are_ordered() {
        assert!(Priority::Optional < Priority::Low);
        assert!(Priority::Low < Priority::Normal);
        assert!(Priority::Normal < Priority::High);
    }

    #[test]
    fn containment_includes_edges() {
        let rect = Rect::new(0., 0., 10., 10.);
        assert!(contains_inclusive(rect, Point::new(10., 10.)));
        assert!(!contains_inclusive(rect, Point::new(10.5, 0.)));
    }

    #[test]
    fn deflate_never_goes_negative() {
        let size = deflate_size(Size::new(5., 50.), Insets::uniform(4.));
        assert_eq!(size, Size::new(0., 42.));
    }
}
