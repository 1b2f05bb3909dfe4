// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Rect, Size};

use crate::core::{LayoutCtx, Node, PaintCtx};

/// A run of text, drawn with the inherited font and colour.
///
/// The minimum size is the text measured on one line. Given less width than that, the
/// text wraps at the offered width, up to the style's line limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    text: String,
}

impl Text {
    /// Create a text node.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The displayed text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Node for Text {
    fn debug_text(&self) -> Option<String> {
        Some(format!("{:?}", self.text))
    }

    /// Reused only when the text is unchanged, so a changed text is a fresh node.
    fn can_reuse(&self, candidate: &dyn Node) -> bool {
        candidate
            .downcast_ref::<Self>()
            .is_some_and(|candidate| candidate.text == self.text)
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        ctx.measure_text(&self.text, None)
    }

    fn content_size(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        ctx.measure_text(&self.text, Some(available.width))
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, inner: Rect) {
        ctx.fill_background();
        ctx.draw_text(&self.text, inner);
    }
}
