// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::rc::Rc;

use kurbo::{Insets, Point, Rect, Size};
use tracing::trace;

use crate::core::{
    BuildCtx, BuildError, Content, EventCtx, Handled, LayoutCtx, NewNode, Node, PaintCtx,
    PlaceCtx, PointerEvent, expand_contents,
};
use crate::geometry::Axis;
use crate::layout::stack;
use crate::nodes::Text;
use crate::style::Style;

/// Callback invoked when a button is clicked.
type Action = Rc<dyn Fn(&mut EventCtx<'_>)>;

/// A button with a label.
///
/// The label and any extra contents are laid out in a row. The button looks pressed
/// between pointer down and up, and invokes its action on click, which includes Space
/// while it has focus.
///
/// It draws the `button` asset, or `button.pressed` while pressed. Use
/// [`asset`](Self::asset) to change the base name.
#[derive(Clone)]
pub struct Button {
    label: NewNode,
    action: Option<Action>,
    asset: Rc<str>,
    pressed: bool,
}

// --- MARK: BUILDERS
impl Button {
    /// A button with a text label.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_label(Text::new(text))
    }

    /// A button with an arbitrary label.
    pub fn with_label(label: impl Into<NewNode>) -> Self {
        Self {
            label: label.into(),
            action: None,
            asset: "button".into(),
            pressed: false,
        }
    }

    /// Set the callback invoked on click.
    pub fn on_click(mut self, action: impl Fn(&mut EventCtx<'_>) + 'static) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    /// Set the base name of the drawn assets.
    pub fn asset(mut self, name: impl Into<Rc<str>>) -> Self {
        self.asset = name.into();
        self
    }

    /// Whether the button is drawn pressed.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("asset", &self.asset)
            .field("pressed", &self.pressed)
            .finish_non_exhaustive()
    }
}

// --- MARK: IMPL NODE
impl Node for Button {
    fn is_interactive(&self) -> bool {
        true
    }

    fn default_style(&self) -> Style {
        Style {
            padding: Some(Insets::new(20., 5., 20., 6.)),
            spacing: Some(10.),
            ..Default::default()
        }
    }

    fn children(
        &mut self,
        _ctx: &mut BuildCtx<'_>,
        contents: &[Content],
    ) -> Result<Vec<NewNode>, BuildError> {
        let mut children = vec![self.label.clone()];
        children.extend(expand_contents(contents)?);
        Ok(children)
    }

    fn adopt(&mut self, previous: Box<dyn Node>) {
        if let Some(previous) = previous.downcast_ref::<Self>() {
            self.pressed = previous.pressed;
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
            PointerEvent::Down { .. } => {
                self.pressed = true;
                ctx.request_render();
                Handled::Yes
            }
            PointerEvent::Up { .. } => {
                self.pressed = false;
                ctx.request_render();
                Handled::Yes
            }
            PointerEvent::Click { .. } => {
                trace!("Button {} clicked", ctx.node_id());
                if let Some(action) = self.action.clone() {
                    action(ctx);
                }
                Handled::Yes
            }
            PointerEvent::Move { .. } | PointerEvent::Wheel { .. } => Handled::No,
        }
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, _inner: Rect) {
        let frame = ctx.frame();
        let drawn = if self.pressed {
            ctx.draw_asset(&format!("{}.pressed", self.asset), frame)
        } else {
            ctx.draw_asset(&self.asset, frame)
        };
        if !drawn {
            ctx.fill_background();
        }
    }
}
