// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Helper nodes for writing tests.
//!
//! Note: these types are meant to help maintainers and node authors test their code,
//! not to appear in application trees.

use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use kurbo::{Point, Rect, Size};

use crate::core::{
    BuildCtx, BuildError, Content, EventCtx, Handled, LayoutCtx, Lifecycle, LifecycleCtx,
    NewNode, Node, PaintCtx, PlaceCtx, PointerEvent, TextEvent, Update, UpdateCtx,
    expand_contents,
};
use crate::layout::overlay;
use crate::style::Style;

/// A node that records each time one of its methods is called.
///
/// The wrapper forwards its type name, so wrapping a node does not change its identity
/// path.
///
/// ```
/// use assert_matches::assert_matches;
/// use trellis::core::Lifecycle;
/// use trellis::nodes::Text;
/// use trellis::testing::{Record, Recording, TestHarness, TestNodeExt};
///
/// let recording = Recording::default();
/// let harness = TestHarness::create(Text::new("Hello").record(&recording));
/// assert_matches!(recording.next(), Some(Record::Children));
/// assert_matches!(recording.next(), Some(Record::Lifecycle(Lifecycle::Mounted)));
/// ```
#[derive(Debug, Clone)]
pub struct Recorder<N> {
    recording: Recording,
    inner: N,
}

/// A shared recording of node method calls.
#[derive(Debug, Clone, Default)]
pub struct Recording(Rc<RefCell<VecDeque<Record>>>);

/// A recording of a method call on a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// [`Node::children`] was called.
    Children,
    /// A reconciliation notification.
    Lifecycle(Lifecycle),
    /// A pointer event.
    Pointer(PointerEvent),
    /// A keyboard or text event.
    Text(TextEvent),
    /// A status change.
    Update(Update),
    /// An animation frame.
    AnimFrame(Duration),
    /// The size returned by [`Node::resize`].
    Resize(Size),
    /// The rectangle passed to [`Node::reposition`].
    Reposition(Rect),
    /// [`Node::paint`] was called.
    Paint,
}

/// Test-only extension methods on nodes.
pub trait TestNodeExt: Node + Sized {
    /// Wrap the node in a [`Recorder`].
    fn record(self, recording: &Recording) -> Recorder<Self> {
        Recorder {
            recording: recording.clone(),
            inner: self,
        }
    }
}

impl<N: Node> TestNodeExt for N {}

impl Recording {
    /// Whether nothing was recorded since the last read.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Number of unread records.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Drop every unread record.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Returns the next record, if one exists.
    ///
    /// This consumes the record.
    pub fn next(&self) -> Option<Record> {
        self.0.borrow_mut().pop_front()
    }

    /// Returns every unread record.
    pub fn drain(&self) -> Vec<Record> {
        self.0.borrow_mut().drain(..).collect()
    }

    /// The unread lifecycle notifications, consuming every unread record.
    pub fn lifecycle(&self) -> Vec<Lifecycle> {
        self.drain()
            .into_iter()
            .filter_map(|record| match record {
                Record::Lifecycle(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    fn push(&self, record: Record) {
        self.0.borrow_mut().push_back(record);
    }
}

impl<N> Recorder<N> {
    /// The wrapped node.
    pub fn inner(&self) -> &N {
        &self.inner
    }
}

impl<N: Node + Clone> Node for Recorder<N> {
    fn short_type_name(&self) -> &'static str {
        self.inner.short_type_name()
    }

    fn is_interactive(&self) -> bool {
        self.inner.is_interactive()
    }

    fn is_scrollable(&self) -> bool {
        self.inner.is_scrollable()
    }

    fn draws_focus(&self) -> bool {
        self.inner.draws_focus()
    }

    fn clips_children(&self) -> bool {
        self.inner.clips_children()
    }

    fn default_style(&self) -> Style {
        self.inner.default_style()
    }

    fn validate(&self) -> Result<(), BuildError> {
        self.inner.validate()
    }

    fn debug_text(&self) -> Option<String> {
        self.inner.debug_text()
    }

    fn children(
        &mut self,
        ctx: &mut BuildCtx<'_>,
        contents: &[Content],
    ) -> Result<Vec<NewNode>, BuildError> {
        self.recording.push(Record::Children);
        self.inner.children(ctx, contents)
    }

    fn can_reuse(&self, candidate: &dyn Node) -> bool {
        candidate
            .downcast_ref::<Self>()
            .is_some_and(|candidate| self.inner.can_reuse(&candidate.inner))
    }

    fn adopt(&mut self, previous: Box<dyn Node>) {
        let previous: Box<dyn Any> = previous;
        if let Ok(previous) = previous.downcast::<Self>() {
            self.inner.adopt(Box::new(previous.inner));
        }
    }

    fn lifecycle(&mut self, ctx: &mut LifecycleCtx<'_>, event: Lifecycle) {
        self.recording.push(Record::Lifecycle(event));
        self.inner.lifecycle(ctx, event);
    }

    fn minimum_size(&mut self, ctx: &mut LayoutCtx<'_>) -> Size {
        self.inner.minimum_size(ctx)
    }

    fn content_size(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        self.inner.content_size(ctx, available)
    }

    fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        let size = self.inner.resize(ctx, available);
        self.recording.push(Record::Resize(size));
        size
    }

    fn reposition(&mut self, ctx: &mut PlaceCtx<'_>, inside: Rect) -> Point {
        self.recording.push(Record::Reposition(inside));
        self.inner.reposition(ctx, inside)
    }

    fn on_anim_frame(&mut self, ctx: &mut UpdateCtx<'_>, interval: Duration) {
        self.recording.push(Record::AnimFrame(interval));
        self.inner.on_anim_frame(ctx, interval);
    }

    fn on_pointer_event(&mut self, ctx: &mut EventCtx<'_>, event: &PointerEvent) -> Handled {
        self.recording.push(Record::Pointer(event.clone()));
        self.inner.on_pointer_event(ctx, event)
    }

    fn on_text_event(&mut self, ctx: &mut EventCtx<'_>, event: &TextEvent) -> Handled {
        self.recording.push(Record::Text(event.clone()));
        self.inner.on_text_event(ctx, event)
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>, event: &Update) {
        self.recording.push(Record::Update(*event));
        self.inner.update(ctx, event);
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, inner: Rect) {
        self.recording.push(Record::Paint);
        self.inner.paint(ctx, inner);
    }

    fn post_paint(&mut self, ctx: &mut PaintCtx<'_>, inner: Rect) {
        self.inner.post_paint(ctx, inner);
    }
}

type LifecycleFn<S> = dyn Fn(&mut S, &mut LifecycleCtx<'_>, Lifecycle);
type ChildrenFn<S> = dyn Fn(&mut S, &mut BuildCtx<'_>) -> Result<Vec<NewNode>, BuildError>;
type PointerEventFn<S> = dyn Fn(&mut S, &mut EventCtx<'_>, &PointerEvent) -> Handled;
type TextEventFn<S> = dyn Fn(&mut S, &mut EventCtx<'_>, &TextEvent) -> Handled;
type ContentSizeFn<S> = dyn Fn(&S, Size) -> Size;

/// A node that can be constructed from individual functions, builder-style.
///
/// This node is generic over its state, which is passed in at construction time and
/// cloned with the descriptor. It is interactive, and never reused across rebuilds unless
/// [`reusable`](Self::reusable) is set.
pub struct ModularNode<S> {
    state: S,
    reusable: bool,
    lifecycle: Option<Rc<LifecycleFn<S>>>,
    children: Option<Rc<ChildrenFn<S>>>,
    on_pointer_event: Option<Rc<PointerEventFn<S>>>,
    on_text_event: Option<Rc<TextEventFn<S>>>,
    content_size: Option<Rc<ContentSizeFn<S>>>,
}

impl<S: Clone> Clone for ModularNode<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            reusable: self.reusable,
            lifecycle: self.lifecycle.clone(),
            children: self.children.clone(),
            on_pointer_event: self.on_pointer_event.clone(),
            on_text_event: self.on_text_event.clone(),
            content_size: self.content_size.clone(),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for ModularNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModularNode")
            .field("state", &self.state)
            .field("reusable", &self.reusable)
            .finish_non_exhaustive()
    }
}

impl<S> ModularNode<S> {
    /// A node with the given state and no behaviour.
    pub fn new(state: S) -> Self {
        Self {
            state,
            reusable: false,
            lifecycle: None,
            children: None,
            on_pointer_event: None,
            on_text_event: None,
            content_size: None,
        }
    }

    /// The node's state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Allow reconciliation to keep the instance.
    pub fn reusable(mut self) -> Self {
        self.reusable = true;
        self
    }

    /// Handle reconciliation notifications.
    pub fn lifecycle_fn(
        mut self,
        f: impl Fn(&mut S, &mut LifecycleCtx<'_>, Lifecycle) + 'static,
    ) -> Self {
        self.lifecycle = Some(Rc::new(f));
        self
    }

    /// Synthesize children instead of expanding the authored contents.
    pub fn children_fn(
        mut self,
        f: impl Fn(&mut S, &mut BuildCtx<'_>) -> Result<Vec<NewNode>, BuildError> + 'static,
    ) -> Self {
        self.children = Some(Rc::new(f));
        self
    }

    /// Handle pointer events.
    pub fn pointer_event_fn(
        mut self,
        f: impl Fn(&mut S, &mut EventCtx<'_>, &PointerEvent) -> Handled + 'static,
    ) -> Self {
        self.on_pointer_event = Some(Rc::new(f));
        self
    }

    /// Handle keyboard and text events.
    pub fn text_event_fn(
        mut self,
        f: impl Fn(&mut S, &mut EventCtx<'_>, &TextEvent) -> Handled + 'static,
    ) -> Self {
        self.on_text_event = Some(Rc::new(f));
        self
    }

    /// Report a content size.
    pub fn content_size_fn(mut self, f: impl Fn(&S, Size) -> Size + 'static) -> Self {
        self.content_size = Some(Rc::new(f));
        self
    }
}

impl<S: Clone + 'static> Node for ModularNode<S> {
    fn is_interactive(&self) -> bool {
        true
    }

    fn children(
        &mut self,
        ctx: &mut BuildCtx<'_>,
        contents: &[Content],
    ) -> Result<Vec<NewNode>, BuildError> {
        match self.children.clone() {
            Some(f) => f(&mut self.state, ctx),
            None => expand_contents(contents),
        }
    }

    fn can_reuse(&self, _candidate: &dyn Node) -> bool {
        self.reusable
    }

    fn lifecycle(&mut self, ctx: &mut LifecycleCtx<'_>, event: Lifecycle) {
        if let Some(f) = self.lifecycle.clone() {
            f(&mut self.state, ctx, event);
        }
    }

    fn content_size(&mut self, _ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        self.content_size
            .as_ref()
            .map_or(Size::ZERO, |f| f(&self.state, available))
    }

    fn resize(&mut self, ctx: &mut LayoutCtx<'_>, available: Size) -> Size {
        overlay::resize(self, ctx, available)
    }

    fn on_pointer_event(&mut self, ctx: &mut EventCtx<'_>, event: &PointerEvent) -> Handled {
        match self.on_pointer_event.clone() {
            Some(f) => f(&mut self.state, ctx, event),
            None => Handled::No,
        }
    }

    fn on_text_event(&mut self, ctx: &mut EventCtx<'_>, event: &TextEvent) -> Handled {
        match self.on_text_event.clone() {
            Some(f) => f(&mut self.state, ctx, event),
            None => Handled::No,
        }
    }
}
