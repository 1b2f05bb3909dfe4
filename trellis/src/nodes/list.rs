// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Point, Rect, Size};
use peniko::Color;
use tracing::debug;

use crate::backend::Primitive;
use crate::core::{
    BuildCtx, BuildError, Content, EventCtx, Handled, LayoutCtx, NewNode, Node, NodeExt,
    PaintCtx, PlaceCtx, PointerEvent, expand_contents,
};
use crate::geometry::{Alignment, Axis};
use crate::layout::stack;
use crate::nodes::Spacer;
use crate::state::StateCell;
use crate::style::{Style, StyleExt};

const SELECTED_BACKGROUND: Color = Color::from_rgba8(200, 200, 255, 16);
const ROW_PADDING: f64 = 10.;

/// A column of selectable rows.
///
/// Every child becomes a padded [`ListItem`] spanning the list's width. Clicking a row
/// selects it, or clears the selection when it was already selected. Clicking the list
/// outside the rows clears the selection. A trailing spacer takes the remaining height.
#[derive(Clone, Debug)]
pub struct List {
    selection: StateCell<Vec<usize>>,
}

impl List {
    /// A list whose selected row indices are kept in `selection`.
    pub fn new(selection: StateCell<Vec<usize>>) -> Self {
        Self { selection }
    }
}

impl Node for List {
    fn is_interactive(&self) -> bool {
        true
    }

    fn draws_focus(&self) -> bool {
        false
    }

    fn default_style(&self) -> Style {
        Style {
            spacing: Some(0.),
            alignment: Some(Alignment::Leading),
            ..Default::default()
        }
    }

    fn children(
        &mut self,
        _ctx: &mut BuildCtx<'_>,
        contents: &[Content],
    ) -> Result<Vec<NewNode>, BuildError> {
        let mut rows: Vec<NewNode> = expand_contents(contents)?
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                ListItem {
                    index,
                    selection: self.selection.clone(),
                }
                .with_child(item)
                .with_child(Spacer::new())
                .padding(ROW_PADDING)
            })
            .collect();
        rows.push(Spacer::new().into());
        Ok(rows)
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        stack::minimum_size(ctx, Axis::Vertical)
    }

    fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        stack::resize(ctx, Axis::Vertical, available)
    }

    fn reposition(&mut self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        stack::reposition(ctx, Axis::Vertical, inside)
    }

    fn on_pointer_event(&mut self, ctx: &mut EventCtx<'_>, event: &PointerEvent) -> Handled {
        match event {
            PointerEvent::Click { .. } => {
                if self.selection.with(|selection| !selection.is_empty()) {
                    debug!("list {} selection cleared", ctx.node_id());
                    self.selection.set(Vec::new());
                    ctx.request_render();
                }
                Handled::Yes
            }
            _ => Handled::No,
        }
    }
}

/// A row of a [`List`].
///
/// Lays its children out in a row and draws a highlight while selected.
#[derive(Clone, Debug)]
pub struct ListItem {
    index: usize,
    selection: StateCell<Vec<usize>>,
}

impl ListItem {
    /// Position of the row in its list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the row is selected.
    pub fn is_selected(&self) -> bool {
        self.selection.with(|selection| selection.contains(&self.index))
    }
}

impl Node for ListItem {
    fn is_interactive(&self) -> bool {
        true
    }

    fn draws_focus(&self) -> bool {
        false
    }

    fn default_style(&self) -> Style {
        Style {
            spacing: Some(0.),
            ..Default::default()
        }
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        stack::minimum_size(ctx, Axis::Horizontal)
    }

    fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        stack::resize(ctx, Axis::Horizontal, available)
    }

    fn reposition(&mut self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        stack::reposition(ctx, Axis::Horizontal, inside)
    }

    fn on_pointer_event(&mut self, ctx: &mut EventCtx<'_>, event: &PointerEvent) -> Handled {
        match event {
            PointerEvent::Click { .. } => {
                let selection = if self.is_selected() {
                    Vec::new()
                } else {
                    vec![self.index]
                };
                debug!("list selection is now {selection:?}");
                self.selection.set(selection);
                ctx.request_render();
                Handled::Yes
            }
            _ => Handled::No,
        }
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, _inner: Rect) {
        if self.is_selected() {
            let frame = ctx.frame();
            ctx.draw(&Primitive::Fill(SELECTED_BACKGROUND), frame);
        } else {
            ctx.fill_background();
        }
    }
}
