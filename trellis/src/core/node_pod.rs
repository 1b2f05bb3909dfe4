// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use crate::core::{Content, IdPath, NewNode, Node, NodeId, NodeState};

/// A mounted node: the node value, its generic state, its raw contents and its
/// resolved children.
///
/// Pods form a strict tree: a pod exclusively owns its children. The parent link in
/// [`NodeState`] is a non-owning id.
pub(crate) struct NodePod {
    pub(crate) state: NodeState,
    pub(crate) node: Box<dyn Node>,
    pub(crate) contents: Vec<Content>,
    pub(crate) item: Option<Box<NewNode>>,
    pub(crate) children: Vec<NodePod>,
}

impl NodePod {
    /// Mount a descriptor at `path`.
    ///
    /// The style is resolved later, by the rebuild pass.
    pub(crate) fn mount(new: NewNode, path: IdPath, parent: Option<NodeId>, scale: f64) -> Self {
        let NewNode {
            node,
            style,
            options,
            contents,
            item,
        } = new;
        let mut state = NodeState::new(NodeId::next(), path, parent, node.short_type_name(), scale);
        state.authored = style;
        state.options = options;
        let mut pod = Self {
            state,
            node,
            contents,
            item,
            children: Vec::new(),
        };
        pod.refresh_flags();
        pod
    }

    /// Replace the node value with a reusable candidate, keeping identity, frames and cells.
    pub(crate) fn reuse(&mut self, candidate: NewNode) {
        let NewNode {
            node,
            style,
            options,
            contents,
            item,
        } = candidate;
        let previous = std::mem::replace(&mut self.node, node);
        self.node.adopt(previous);
        self.state.authored = style;
        self.state.options = options;
        self.contents = contents;
        self.item = item;
        self.state.prev_frame = self.state.has_layout.then_some(self.state.frame);
        self.refresh_flags();
    }

    fn refresh_flags(&mut self) {
        let state = &mut self.state;
        state.is_interactive = state
            .options
            .interactive
            .unwrap_or_else(|| self.node.is_interactive());
        state.is_scrollable = self.node.is_scrollable();
        state.draws_focus = self.node.draws_focus();
        state.clips_children = self.node.clips_children();
    }

    pub(crate) fn id(&self) -> NodeId {
        self.state.id
    }

    /// Find a descendant (or `self`) by id.
    pub(crate) fn find(&self, id: NodeId) -> Option<&Self> {
        if self.state.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Resolve an identity path against this subtree.
    ///
    /// Returns `None` when any segment no longer exists.
    pub(crate) fn resolve(&self, path: &IdPath) -> Option<&Self> {
        let segments = path.segments();
        let (first, rest) = segments.split_first()?;
        if self.state.path.last() != Some(*first) || self.state.path.len() != 1 {
            return None;
        }
        let mut pod = self;
        for segment in rest {
            pod = pod
                .children
                .get(segment.index)
                .filter(|child| child.state.type_name == segment.type_name)?;
        }
        Some(pod)
    }

    /// Mutable version of [`resolve`](Self::resolve).
    pub(crate) fn resolve_mut(&mut self, path: &IdPath) -> Option<&mut Self> {
        let segments = path.segments();
        let (first, rest) = segments.split_first()?;
        if self.state.path.last() != Some(*first) || self.state.path.len() != 1 {
            return None;
        }
        let mut pod = self;
        for segment in rest {
            pod = pod
                .children
                .get_mut(segment.index)
                .filter(|child| child.state.type_name == segment.type_name)?;
        }
        Some(pod)
    }

    /// Visit this pod and every descendant, depth first, parents before children.
    pub(crate) fn for_each(&self, f: &mut impl FnMut(&Self)) {
        f(self);
        for child in &self.children {
            child.for_each(f);
        }
    }

    /// Mutable version of [`for_each`](Self::for_each).
    pub(crate) fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Self)) {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }
}

impl std::fmt::Debug for NodePod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodePod")
            .field("path", &self.state.path)
            .field("id", &self.state.id)
            .field("frame", &self.state.frame)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
