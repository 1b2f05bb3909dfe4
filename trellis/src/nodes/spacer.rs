// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::Size;

use crate::core::{LayoutCtx, Node};
use crate::geometry::{Axis, Priority};
use crate::style::Style;

/// Flexible empty space.
///
/// Inside a stack, a spacer has [`Priority::Optional`] and takes all the space it is
/// offered along the stack's axis, and none across it. Elsewhere it is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Spacer;

impl Spacer {
    /// Create a spacer.
    pub fn new() -> Self {
        Self
    }
}

impl Node for Spacer {
    fn default_style(&self) -> Style {
        Style {
            priority: Some(Priority::Optional),
            ..Default::default()
        }
    }

    fn content_size(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        match ctx.parent_axis() {
            Some(Axis::Horizontal) => Size::new(available.width, 0.),
            Some(Axis::Vertical) => Size::new(0., available.height),
            None => Size::ZERO,
        }
    }
}
