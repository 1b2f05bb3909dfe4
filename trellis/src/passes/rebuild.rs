// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The rebuild pass, which reconciles declared children against the mounted tree.
//!
//! A node's raw contents are expanded into a list of candidate descriptors. Candidate `k`
//! is matched against the previous child `k`: the two are the same logical node when their
//! identity paths are equal, which happens exactly when they have the same type. A matched
//! child that declares itself reusable keeps its instance, and with it its [`NodeId`],
//! state cells and frame. Everything else is mounted fresh.

use tracing::{debug, info_span, warn};

use crate::app::{LifecycleRecord, RenderRoot, RenderRootSignal, RenderRootState};
use crate::core::{
    BuildCtx, BuildError, IdPath, Lifecycle, LifecycleCtx, NewNode, NodeId, NodePod, Update,
};
use crate::passes::enter_span_if;
use crate::passes::event::send_update;
use crate::style::ResolvedStyle;

/// Opacity multiplier of disabled nodes.
const DISABLED_OPACITY: f64 = 0.25;

// --- MARK: NOTIFY
/// Fire a reconciliation notification on `pod`.
fn notify(global_state: &mut RenderRootState, pod: &mut NodePod, event: Lifecycle) {
    debug!("{event:?} {} {}", pod.state.path, pod.state.id);
    global_state.emit_signal(RenderRootSignal::Lifecycle(LifecycleRecord {
        id: pod.state.id,
        path: pod.state.path.clone(),
        type_name: pod.state.type_name,
        event,
    }));
    let mut ctx = LifecycleCtx {
        global_state,
        node_state: &mut pod.state,
    };
    pod.node.lifecycle(&mut ctx, event);
}

/// Take `pod` out of the tree.
///
/// Only `pod` itself receives [`Lifecycle::Removed`]. Every cell of the subtree is detached
/// and every animation of the subtree is cancelled.
pub(crate) fn remove_pod(global_state: &mut RenderRootState, mut pod: NodePod) {
    notify(global_state, &mut pod, Lifecycle::Removed);
    pod.for_each_mut(&mut |node| {
        node.state.cells.detach();
        global_state.scheduler.cancel(node.state.id);
    });
    global_state.needs_layout = true;
    global_state.needs_render = true;
}

// --- MARK: STYLE
fn resolve_style(
    global_state: &mut RenderRootState,
    pod: &mut NodePod,
    parent_style: &ResolvedStyle,
    parent_disabled: bool,
) {
    let type_defaults = global_state
        .assets
        .style_for(pod.state.type_name)
        .or(&pod.node.default_style());
    let mut style = pod.state.authored.resolve(parent_style, &type_defaults);
    let disabled = pod.state.options.disabled || parent_disabled;
    if disabled {
        style.opacity *= DISABLED_OPACITY;
    }
    pod.state.style = style;
    if pod.state.is_disabled != disabled {
        send_update(global_state, pod, Update::DisabledChanged(disabled));
    }
}

// --- MARK: REBUILD
/// Rebuild `pod`: resolve its style, expand its contents and reconcile its children.
///
/// Candidates are validated before any child is touched, so a construction error leaves
/// the previous children of `pod` in place. Errors of a child's own rebuild do not stop its
/// siblings; the first one is returned.
pub(crate) fn rebuild_pod(
    global_state: &mut RenderRootState,
    pod: &mut NodePod,
    parent_style: &ResolvedStyle,
    parent_disabled: bool,
) -> Result<(), BuildError> {
    let _span = enter_span_if(global_state.trace.rebuild, pod);
    resolve_style(global_state, pod, parent_style, parent_disabled);

    let candidates = {
        let NodePod {
            state,
            node,
            contents,
            ..
        } = &mut *pod;
        let mut ctx = BuildCtx {
            global_state: &mut *global_state,
            node_state: state,
        };
        node.children(&mut ctx, contents)?
    };
    for candidate in &candidates {
        candidate.node().validate()?;
    }

    let parent_id = pod.state.id;
    let mut previous = std::mem::take(&mut pod.children).into_iter();
    let mut children = Vec::with_capacity(candidates.len());
    let mut first_error = None;
    for (index, candidate) in candidates.into_iter().enumerate() {
        let path = pod.state.path.child(candidate.short_type_name(), index);
        let (child, result) = reconcile(
            global_state,
            previous.next(),
            candidate,
            path,
            Some(parent_id),
            &pod.state.style,
            pod.state.is_disabled,
        );
        if let Err(err) = result {
            first_error.get_or_insert(err);
        }
        children.push(child);
    }
    for stale in previous {
        remove_pod(global_state, stale);
    }
    pod.children = children;

    global_state.needs_layout = true;
    global_state.needs_render = true;
    first_error.map_or(Ok(()), Err)
}

/// Match `candidate` against the previous child at the same index, then rebuild the kept
/// or fresh instance.
fn reconcile(
    global_state: &mut RenderRootState,
    existing: Option<NodePod>,
    candidate: NewNode,
    path: IdPath,
    parent: Option<NodeId>,
    parent_style: &ResolvedStyle,
    parent_disabled: bool,
) -> (NodePod, Result<(), BuildError>) {
    let (mut pod, event) = match existing {
        Some(mut pod) if pod.state.path == path && pod.node.can_reuse(candidate.node()) => {
            pod.reuse(candidate);
            (pod, Lifecycle::Updated)
        }
        existing => {
            if let Some(stale) = existing {
                remove_pod(global_state, stale);
            }
            let pod = NodePod::mount(candidate, path, parent, global_state.scale_factor);
            (pod, Lifecycle::Mounted)
        }
    };
    let result = rebuild_pod(global_state, &mut pod, parent_style, parent_disabled);
    notify(global_state, &mut pod, event);
    (pod, result)
}

// --- MARK: ROOT
/// Mount a fresh tree.
pub(crate) fn mount_root(
    global_state: &mut RenderRootState,
    tree: NewNode,
) -> Result<NodePod, BuildError> {
    let _span = info_span!("rebuild").entered();
    tree.node().validate()?;
    let path = IdPath::root(tree.short_type_name());
    let mut pod = NodePod::mount(tree, path, None, global_state.scale_factor);
    let parent_style = ResolvedStyle::root(global_state.scale_factor);
    let result = rebuild_pod(global_state, &mut pod, &parent_style, false);
    notify(global_state, &mut pod, Lifecycle::Mounted);
    result.map(|()| pod)
}

/// Reconcile a new description of the whole tree against the mounted one.
pub(crate) fn run_root_rebuild(root: &mut RenderRoot, tree: NewNode) -> Result<(), BuildError> {
    let _span = info_span!("rebuild").entered();
    tree.node().validate()?;
    let global_state = &mut root.global_state;
    let path = IdPath::root(tree.short_type_name());
    let parent_style = ResolvedStyle::root(global_state.scale_factor);

    let event = if root.root.state.path == path && root.root.node.can_reuse(tree.node()) {
        root.root.reuse(tree);
        Lifecycle::Updated
    } else {
        let fresh = NodePod::mount(tree, path, None, global_state.scale_factor);
        let stale = std::mem::replace(&mut root.root, fresh);
        remove_pod(global_state, stale);
        Lifecycle::Mounted
    };
    let result = rebuild_pod(global_state, &mut root.root, &parent_style, false);
    notify(global_state, &mut root.root, event);
    result
}

/// Rebuild every node whose state changed since the last tick.
///
/// A dirty node is rebuilt with its whole subtree, so dirty descendants of a dirty node
/// are covered by the same rebuild.
pub(crate) fn run_dirty_rebuilds(root: &mut RenderRoot) -> Result<(), BuildError> {
    let dirty = root.global_state.dirty.take();
    if dirty.is_empty() {
        return Ok(());
    }
    let _span = info_span!("rebuild", count = dirty.len()).entered();
    let parent_style = ResolvedStyle::root(root.global_state.scale_factor);
    let mut first_error = None;
    rebuild_dirty_in(
        &mut root.global_state,
        &mut root.root,
        &parent_style,
        false,
        &dirty,
        &mut first_error,
    );
    if let Some(overlay) = &mut root.overlay {
        rebuild_dirty_in(
            &mut root.global_state,
            &mut overlay.pod,
            &parent_style,
            false,
            &dirty,
            &mut first_error,
        );
    }
    match first_error {
        Some(err) => {
            warn!("rebuild failed: {err}");
            Err(err)
        }
        None => Ok(()),
    }
}

fn rebuild_dirty_in(
    global_state: &mut RenderRootState,
    pod: &mut NodePod,
    parent_style: &ResolvedStyle,
    parent_disabled: bool,
    dirty: &[NodeId],
    first_error: &mut Option<BuildError>,
) {
    if dirty.contains(&pod.state.id) {
        pod.state.prev_frame = pod.state.has_layout.then_some(pod.state.frame);
        if let Err(err) = rebuild_pod(global_state, pod, parent_style, parent_disabled) {
            first_error.get_or_insert(err);
        }
        notify(global_state, pod, Lifecycle::Updated);
        return;
    }
    let NodePod {
        state, children, ..
    } = pod;
    for child in children {
        rebuild_dirty_in(
            global_state,
            child,
            &state.style,
            state.is_disabled,
            dirty,
            first_error,
        );
    }
}
