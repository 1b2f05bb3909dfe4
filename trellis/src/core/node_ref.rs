// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use kurbo::{Point, Rect, Size};

use crate::core::{IdPath, Node, NodeId, NodePod};
use crate::geometry::contains_inclusive;
use crate::state::{StateCell, StateError, UntypedCell};
use crate::style::ResolvedStyle;

/// A read-only reference to a mounted node and its generic state.
///
/// Obtained from [`RenderRoot::root_ref`](crate::app::RenderRoot::root_ref) and
/// [`RenderRoot::resolve`](crate::app::RenderRoot::resolve).
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    pub(crate) pod: &'a NodePod,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(pod: &'a NodePod) -> Self {
        Self { pod }
    }

    /// The node's id.
    pub fn id(&self) -> NodeId {
        self.pod.state.id
    }

    /// The node's identity path.
    pub fn path(&self) -> &'a IdPath {
        &self.pod.state.path
    }

    /// The id of the parent node.
    pub fn parent_id(&self) -> Option<NodeId> {
        self.pod.state.parent
    }

    /// Short type name of the node.
    pub fn short_type_name(&self) -> &'static str {
        self.pod.state.type_name
    }

    /// The node value.
    pub fn node(&self) -> &'a dyn Node {
        &*self.pod.node
    }

    /// Downcast the node value.
    pub fn downcast<T: Node>(&self) -> Option<&'a T> {
        self.pod.node.downcast_ref()
    }

    /// The resolved style.
    pub fn style(&self) -> &'a ResolvedStyle {
        &self.pod.state.style
    }

    /// The frame the node is currently rendered with.
    pub fn layout_rect(&self) -> Rect {
        self.pod.state.frame
    }

    /// The frame computed by the last layout, ignoring animations.
    pub fn target_rect(&self) -> Rect {
        self.pod.state.target
    }

    /// The size chosen by the last resize pass.
    pub fn size(&self) -> Size {
        self.pod.state.size
    }

    /// Whether the node is interactive.
    pub fn is_interactive(&self) -> bool {
        self.pod.state.is_interactive
    }

    /// Whether the node or an ancestor is disabled.
    pub fn is_disabled(&self) -> bool {
        self.pod.state.is_disabled
    }

    /// Whether the node has focus.
    pub fn is_focused(&self) -> bool {
        self.pod.state.is_focused
    }

    /// Whether the pointer is over the node.
    pub fn is_hovered(&self) -> bool {
        self.pod.state.is_hovered
    }

    /// Whether the node is scrollable.
    pub fn is_scrollable(&self) -> bool {
        self.pod.state.is_scrollable
    }

    /// Number of resolved children.
    pub fn child_count(&self) -> usize {
        self.pod.children.len()
    }

    /// The resolved child at `index`.
    pub fn child(&self, index: usize) -> Option<Self> {
        self.pod.children.get(index).map(Self::new)
    }

    /// The resolved children, in order.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + use<'a> {
        self.pod.children.iter().map(Self::new)
    }

    /// The state cell called `name`, if the node created it.
    pub fn state<T: Clone + PartialEq + 'static>(
        &self,
        name: &'static str,
    ) -> Option<Result<StateCell<T>, StateError>> {
        self.pod.state.cells.get(name)
    }

    /// An untyped handle to the state cell called `name`.
    pub fn untyped_state(&self, name: &'static str) -> Option<UntypedCell> {
        self.pod.state.cells.untyped(name)
    }

    /// Number of state cells the node created.
    pub fn state_count(&self) -> usize {
        self.pod.state.cells.len()
    }

    /// Find the first descendant (or `self`) with the given short type name, depth first.
    pub fn find_by_type(&self, type_name: &str) -> Option<Self> {
        if self.short_type_name() == type_name {
            return Some(*self);
        }
        self.children().find_map(|child| child.find_by_type(type_name))
    }

    /// Find a descendant (or `self`) by id.
    pub fn find(&self, id: NodeId) -> Option<Self> {
        self.pod.find(id).map(Self::new)
    }

    /// Whether `pos` lies inside the rendered frame, edges included.
    pub fn contains(&self, pos: Point) -> bool {
        contains_inclusive(self.layout_rect(), pos)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("path", self.path())
            .field("id", &self.id())
            .field("frame", &self.layout_rect())
            .field("children", &self.children().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    /// Writes the subtree, one node per line, indented by depth.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = self.path().len().saturating_sub(1);
        write!(
            f,
            "{:indent$}{} {} {:?}",
            "",
            self.path(),
            self.id(),
            self.layout_rect(),
            indent = depth * 2
        )?;
        if let Some(text) = self.node().debug_text() {
            write!(f, " {text:?}")?;
        }
        writeln!(f)?;
        for child in self.children() {
            write!(f, "{child}")?;
        }
        Ok(())
    }
}
