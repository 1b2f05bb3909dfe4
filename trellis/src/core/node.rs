// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::any::Any;
use std::fmt::Display;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use kurbo::{Point, Rect, Size};
use tracing::field::DisplayValue;
use tracing::{Span, trace_span};

use crate::core::{
    BuildCtx, BuildError, Content, EventCtx, Handled, LayoutCtx, Lifecycle, LifecycleCtx, NewNode,
    PaintCtx, PlaceCtx, PointerEvent, TextEvent, Update, UpdateCtx, expand_contents,
};
use crate::layout::overlay;
use crate::style::Style;

/// A unique identifier for one node instance.
///
/// Ids are allocated when a descriptor is mounted and kept for as long as reconciliation
/// reuses the instance. They are never recycled.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(NonZeroU64);

impl NodeId {
    /// Allocates a new, unique `NodeId`.
    pub(crate) fn next() -> Self {
        static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
        let id = NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        match NonZeroU64::new(id) {
            Some(id) => Self(id),
            // The counter starts at one and would take centuries to wrap.
            None => unreachable!(),
        }
    }

    /// Returns the integer value of the `NodeId`.
    pub fn to_raw(self) -> u64 {
        self.0.into()
    }

    /// A serialized representation of the `NodeId` for tracing fields.
    pub fn trace(self) -> DisplayValue<Self> {
        tracing::field::display(self)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[doc(hidden)]
/// Object-safe cloning of nodes. Implemented for every `Node + Clone`.
pub trait CloneNode {
    fn clone_box(&self) -> Box<dyn Node>;
}

impl<T: Node + Clone> CloneNode for T {
    fn clone_box(&self) -> Box<dyn Node> {
        Box::new(self.clone())
    }
}

/// The trait implemented by every node type.
///
/// A node value is a *descriptor* until reconciliation mounts it: from then on it is owned by
/// the tree and its methods are called by the passes. Node types only hold their own
/// configuration and caches. Frames, identity, resolved style and state cells live in the
/// runtime and are reached through the context arguments.
///
/// All methods have defaults describing a plain container that overlays its children,
/// each centred in the inner rectangle.
#[allow(unused_variables, reason = "Default impls don't use method arguments")]
pub trait Node: Any + CloneNode {
    // --- Identity and flags ---

    /// Gets the (verbose) type name of the node for debugging purposes.
    #[doc(hidden)]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Gets the short type name, used in identity paths.
    ///
    /// Wrapper nodes may forward the name of what they wrap so that wrapping does not change
    /// identity paths.
    fn short_type_name(&self) -> &'static str {
        let name = self.type_name();
        name.split('<')
            .next()
            .unwrap_or(name)
            .split("::")
            .last()
            .unwrap_or(name)
    }

    /// Whether pointer presses target this node and Tab can focus it. False by default.
    ///
    /// Overridable per instance with [`NodeExt::interactive`](crate::core::NodeExt::interactive).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Whether wheel events target this node. False by default.
    fn is_scrollable(&self) -> bool {
        false
    }

    /// Whether a focus ring is drawn around this node while it has focus.
    fn draws_focus(&self) -> bool {
        true
    }

    /// Whether drawing and hit-testing of children are clipped to this node's frame.
    fn clips_children(&self) -> bool {
        false
    }

    /// Type-level style defaults, consulted after the theme's style for the type.
    fn default_style(&self) -> Style {
        Style::default()
    }

    /// Checks the node's configuration before it enters the tree.
    fn validate(&self) -> Result<(), BuildError> {
        Ok(())
    }

    /// Returns a small string describing the instance for tree dumps.
    fn debug_text(&self) -> Option<String> {
        None
    }

    // --- Reconciliation ---

    /// Expands the authored contents into the candidate child list.
    ///
    /// The default expands every [`ForEach`](crate::core::ForEach) in order. Nodes that
    /// synthesize children from their own state override this.
    fn children(
        &mut self,
        ctx: &mut BuildCtx<'_>,
        contents: &[Content],
    ) -> Result<Vec<NewNode>, BuildError> {
        expand_contents(contents)
    }

    /// Whether this mounted node may be kept in place of `candidate`, a descriptor with the
    /// same identity path. Defaults to `true`.
    fn can_reuse(&self, candidate: &dyn Node) -> bool {
        true
    }

    /// Called on the candidate after it replaced `previous` in the tree.
    ///
    /// Nodes with caches or transient interaction state move them over here.
    fn adopt(&mut self, previous: Box<dyn Node>) {}

    /// Handles a reconciliation notification.
    fn lifecycle(&mut self, ctx: &mut LifecycleCtx<'_>, event: Lifecycle) {}

    // --- Layout ---

    /// Minimum size of the content, not including padding and border.
    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        overlay::minimum_size(ctx)
    }

    /// Size of the node's own content for the given space, not including padding and border.
    fn content_size(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        Size::ZERO
    }

    /// Resize pass: sizes the children and returns the node's size, padding and border included.
    ///
    /// `available` is already clamped to the explicit size override. Returning more than
    /// `available` is clamped by the caller.
    fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        overlay::resize(self, ctx, available)
    }

    /// Reposition pass: places the children and returns the node's own origin.
    ///
    /// `inside` is the rectangle the parent assigned. The node's size is
    /// [`PlaceCtx::size`].
    fn reposition(&mut self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        overlay::reposition(ctx, inside)
    }

    // --- Events ---

    /// Called every tick while the node has requested animation frames.
    fn on_anim_frame(&mut self, ctx: &mut UpdateCtx<'_>, interval: Duration) {}

    /// Handles a pointer event routed to this node.
    fn on_pointer_event(&mut self, ctx: &mut EventCtx<'_>, event: &PointerEvent) -> Handled {
        Handled::No
    }

    /// Handles keyboard and text input routed to this node.
    fn on_text_event(&mut self, ctx: &mut EventCtx<'_>, event: &TextEvent) -> Handled {
        Handled::No
    }

    /// Handles a status change.
    fn update(&mut self, ctx: &mut UpdateCtx<'_>, event: &Update) {}

    // --- Paint ---

    /// Draws the node below its children. `inner` is the frame minus padding and border.
    ///
    /// The default fills the background.
    fn paint(&mut self, ctx: &mut PaintCtx<'_>, inner: Rect) {
        ctx.fill_background();
    }

    /// Draws the node above its children.
    fn post_paint(&mut self, ctx: &mut PaintCtx<'_>, inner: Rect) {}

    /// Returns a span for tracing.
    fn make_trace_span(&self, id: NodeId) -> Span {
        trace_span!("Node", r#type = self.short_type_name(), id = id.trace())
    }
}

impl dyn Node {
    /// Downcast to a concrete node type.
    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref()
    }

    /// Mutable downcast to a concrete node type.
    pub fn downcast_mut<T: Node>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut()
    }
}

impl Clone for Box<dyn Node> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Spacer, Text};

    #[test]
    fn short_type_name_strips_paths_and_generics() {
        let node: Box<dyn Node> = Box::new(Text::new("hi"));
        assert_eq!(node.short_type_name(), "Text");
        assert!(node.downcast_ref::<Text>().is_some());
        assert!(node.downcast_ref::<Spacer>().is_none());
    }

    #[test]
    fn ids_are_unique() {
        let a = NodeId::next();
        let b = NodeId::next();
        assert_ne!(a, b);
        assert_eq!(format!("{a}"), format!("#{}", a.to_raw()));
    }
}
