// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Rect, Size};

use crate::core::{IdPath, NodeId, NodeOptions};
use crate::state::StateCells;
use crate::style::{ResolvedStyle, Style};

/// Generic state for every node in the tree.
///
/// This holds what the passes need to know about a node and that node types don't store
/// themselves. It survives reuse: when reconciliation keeps an instance, only the node
/// value, the authored style and the options are replaced.
///
/// ## Naming scheme
///
/// - `request_xxx`: this node has requested xxx.
/// - `is_xxx`: this node has the xxx property.
#[derive(Debug)]
pub(crate) struct NodeState {
    pub(crate) id: NodeId,
    pub(crate) path: IdPath,
    /// Non-owning back-reference for traversal and logs.
    pub(crate) parent: Option<NodeId>,
    pub(crate) type_name: &'static str,

    // --- STYLE ---
    pub(crate) authored: Style,
    pub(crate) style: ResolvedStyle,
    pub(crate) options: NodeOptions,

    // --- LAYOUT ---
    /// The size chosen during the last resize pass.
    pub(crate) size: Size,
    /// The frame computed by the last reposition pass.
    pub(crate) target: Rect,
    /// The frame the node is rendered and hit-tested with.
    ///
    /// Equal to `target` unless an animation is in flight.
    pub(crate) frame: Rect,
    /// Captured when reconciliation reuses the node, consumed by the next reposition.
    pub(crate) prev_frame: Option<Rect>,
    pub(crate) has_layout: bool,

    // --- FLAGS ---
    pub(crate) is_interactive: bool,
    pub(crate) is_scrollable: bool,
    pub(crate) draws_focus: bool,
    pub(crate) clips_children: bool,
    /// Disabled by its own options or by an ancestor.
    pub(crate) is_disabled: bool,
    pub(crate) is_hovered: bool,
    pub(crate) is_focused: bool,
    pub(crate) request_anim: bool,

    pub(crate) cells: StateCells,
}

impl NodeState {
    pub(crate) fn new(
        id: NodeId,
        path: IdPath,
        parent: Option<NodeId>,
        type_name: &'static str,
        scale: f64,
    ) -> Self {
        Self {
            id,
            path,
            parent,
            type_name,
            authored: Style::default(),
            style: ResolvedStyle::root(scale),
            options: NodeOptions::default(),
            size: Size::ZERO,
            target: Rect::ZERO,
            frame: Rect::ZERO,
            prev_frame: None,
            has_layout: false,
            is_interactive: false,
            is_scrollable: false,
            draws_focus: true,
            clips_children: false,
            is_disabled: false,
            is_hovered: false,
            is_focused: false,
            request_anim: false,
            cells: StateCells::default(),
        }
    }

    /// The frame minus padding and border.
    pub(crate) fn inner_rect(&self) -> Rect {
        self.frame - self.style.insets()
    }

    /// Whether the router may target this node with presses and focus.
    pub(crate) fn accepts_input(&self) -> bool {
        self.is_interactive && !self.is_disabled
    }
}
