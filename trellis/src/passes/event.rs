// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Input routing.
//!
//! The router remembers the tracked, hovered and focused nodes by identity path. A path is
//! resolved against the current tree every time it is used, and a path that no longer
//! resolves is treated as "nothing": nodes removed by a rebuild silently lose tracking,
//! hover and focus.
//!
//! A shown menu is a second layer above the tree. Hit tests and path resolution try the
//! menu first. Every pointer release dismisses the menu after the release is dispatched.

use kurbo::Point;
use tracing::{debug, info_span, trace};

use crate::app::{RenderRoot, RenderRootSignal, RenderRootState};
use crate::core::{
    EventCtx, Handled, IdPath, NodePod, NodeState, PointerEvent, TextEvent, Update, UpdateCtx,
};
use crate::geometry::contains_inclusive;
use crate::passes::enter_span_if;
use crate::passes::focus::{advance_focus, focus_chain, set_focus};
use crate::passes::rebuild::remove_pod;

/// Router state kept across ticks.
#[derive(Debug, Default)]
pub(crate) struct RouterState {
    /// The node receiving the current press gesture.
    pub(crate) tracking: Option<IdPath>,
    pub(crate) hovered: Option<IdPath>,
    pub(crate) focused: Option<IdPath>,
}

// --- MARK: HELPERS
/// `true` if this [`PointerEvent`] type is likely to occur every frame.
fn is_very_frequent(event: &PointerEvent) -> bool {
    matches!(event, PointerEvent::Move { .. } | PointerEvent::Wheel { .. })
}

/// The deepest node under `pos` accepted by `filter`.
///
/// Children are tested before their parent and earlier siblings before later ones.
/// Containment includes the edges. Children of clipping nodes are only tested inside the
/// clip.
pub(crate) fn hit_test<'a>(
    pod: &'a NodePod,
    pos: Point,
    filter: &impl Fn(&NodeState) -> bool,
) -> Option<&'a NodePod> {
    let inside = contains_inclusive(pod.state.frame, pos);
    if inside || !pod.state.clips_children {
        for child in &pod.children {
            if let Some(hit) = hit_test(child, pos, filter) {
                return Some(hit);
            }
        }
    }
    (inside && filter(&pod.state)).then_some(pod)
}

/// The deepest node under `pos` accepted by `filter`, in the menu first, then in the tree.
fn hit_path(
    root: &RenderRoot,
    pos: Point,
    filter: impl Fn(&NodeState) -> bool,
) -> Option<IdPath> {
    let hit = root
        .layers()
        .find_map(|layer| hit_test(layer, pos, &filter))
        .map(|pod| pod.state.path.clone());
    trace!("hit test at {pos:?}: {hit:?}");
    hit
}

/// Resolve `path` in the menu first, then in the tree, keeping the shared state borrowable.
fn resolve_mut<'a>(
    root: &'a mut RenderRoot,
    path: &IdPath,
) -> (&'a mut RenderRootState, Option<&'a mut NodePod>) {
    let RenderRoot {
        root: tree,
        overlay,
        global_state,
        ..
    } = root;
    let pod = match overlay
        .as_mut()
        .and_then(|overlay| overlay.pod.resolve_mut(path))
    {
        Some(pod) => Some(pod),
        None => tree.resolve_mut(path),
    };
    (global_state, pod)
}

/// Set the status flag matching `update` and call [`Node::update`](crate::core::Node::update).
pub(crate) fn send_update(global_state: &mut RenderRootState, pod: &mut NodePod, update: Update) {
    match update {
        Update::FocusChanged(focused) => pod.state.is_focused = focused,
        Update::HoveredChanged(hovered) => pod.state.is_hovered = hovered,
        Update::DisabledChanged(disabled) => pod.state.is_disabled = disabled,
    }
    let mut ctx = UpdateCtx {
        global_state,
        node_state: &mut pod.state,
    };
    pod.node.update(&mut ctx, &update);
}

/// Send `update` to the node at `path`, if it still exists.
pub(crate) fn send_update_to(root: &mut RenderRoot, path: &IdPath, update: Update) {
    if let (global_state, Some(pod)) = resolve_mut(root, path) {
        send_update(global_state, pod, update);
    }
}

/// Give the focus and hover flags to nodes mounted at the focused or hovered path.
///
/// Reused nodes keep their flags across a rebuild. A fresh instance mounted at the same
/// path starts without them.
pub(crate) fn restore_router_flags(root: &mut RenderRoot) {
    if let Some(focused) = root.router.focused.clone() {
        let stale = root
            .resolve_pod(&focused)
            .is_some_and(|pod| !pod.state.is_focused);
        if stale {
            debug!("focus restored on {focused}");
            send_update_to(root, &focused, Update::FocusChanged(true));
            root.global_state.needs_render = true;
        }
    }
    if let Some(hovered) = root.router.hovered.clone() {
        let stale = root
            .resolve_pod(&hovered)
            .is_some_and(|pod| !pod.state.is_hovered);
        if stale {
            send_update_to(root, &hovered, Update::HoveredChanged(true));
            root.global_state.needs_render = true;
        }
    }
}

fn dispatch_pointer(root: &mut RenderRoot, path: &IdPath, event: &PointerEvent) -> Handled {
    let trace = root.global_state.trace.event && !is_very_frequent(event);
    let (global_state, Some(pod)) = resolve_mut(root, path) else {
        return Handled::No;
    };
    let _span = enter_span_if(trace, pod);
    let mut ctx = EventCtx {
        global_state,
        node_state: &mut pod.state,
    };
    let handled = pod.node.on_pointer_event(&mut ctx, event);
    if trace {
        trace!("{} sent to {path}: {handled:?}", event.short_name());
    }
    handled
}

fn dispatch_text(root: &mut RenderRoot, path: &IdPath, event: &TextEvent) -> Handled {
    let (global_state, Some(pod)) = resolve_mut(root, path) else {
        return Handled::No;
    };
    let _span = enter_span_if(global_state.trace.event, pod);
    let mut ctx = EventCtx {
        global_state,
        node_state: &mut pod.state,
    };
    let handled = pod.node.on_text_event(&mut ctx, event);
    trace!("{} sent to {path}: {handled:?}", event.short_name());
    handled
}

/// The focused path, if it resolves to an enabled node.
fn focused_target(root: &RenderRoot) -> Option<IdPath> {
    let focused = root.router.focused.as_ref()?;
    let pod = root.resolve_pod(focused)?;
    (!pod.state.is_disabled).then(|| focused.clone())
}

fn accepts_input(state: &NodeState) -> bool {
    state.accepts_input()
}

fn accepts_wheel(state: &NodeState) -> bool {
    state.is_scrollable && !state.is_disabled
}

// --- MARK: POINTER
pub(crate) fn run_on_pointer_event_pass(root: &mut RenderRoot, event: &PointerEvent) -> Handled {
    let _span = (!is_very_frequent(event))
        .then(|| info_span!("pointer_event", event = event.short_name()).entered());
    let pos = event.position();
    let root_path = root.root.state.path.clone();

    match event {
        PointerEvent::Down { .. } => {
            let target = hit_path(root, pos, accepts_input).unwrap_or(root_path);
            root.router.tracking = Some(target.clone());
            dispatch_pointer(root, &target, event)
        }
        PointerEvent::Move { .. } => {
            let hovered = hit_path(root, pos, accepts_input);
            if hovered != root.router.hovered {
                if let Some(old) = root.router.hovered.take() {
                    send_update_to(root, &old, Update::HoveredChanged(false));
                }
                if let Some(new) = &hovered {
                    send_update_to(root, new, Update::HoveredChanged(true));
                }
                root.router.hovered = hovered;
                root.global_state.needs_render = true;
            }
            match root.router.tracking.clone() {
                Some(tracking) => dispatch_pointer(root, &tracking, event),
                None => Handled::No,
            }
        }
        PointerEvent::Up { .. } => {
            let handled = release(root, event, pos);
            dismiss_overlay(root);
            handled
        }
        PointerEvent::Click { .. } => {
            let target = hit_path(root, pos, accepts_input).unwrap_or(root_path);
            dispatch_pointer(root, &target, event)
        }
        PointerEvent::Wheel { .. } => {
            let target = hit_path(root, pos, accepts_wheel).unwrap_or(root_path);
            dispatch_pointer(root, &target, event)
        }
    }
}

/// End the press gesture: the tracked node gets the release, and a click when the pointer
/// is still over it.
fn release(root: &mut RenderRoot, event: &PointerEvent, pos: Point) -> Handled {
    let hit = hit_path(root, pos, accepts_input);
    if hit.is_none() && root.router.focused.is_some() {
        set_focus(root, None);
    }
    let Some(tracking) = root.router.tracking.take() else {
        return Handled::No;
    };
    let handled = dispatch_pointer(root, &tracking, event);
    if hit.as_ref() == Some(&tracking) {
        // Menu items never take focus.
        if root.root.resolve(&tracking).is_some() {
            set_focus(root, Some(tracking.clone()));
        }
        dispatch_pointer(root, &tracking, &PointerEvent::Click { pos });
        return Handled::Yes;
    }
    handled
}

/// Remove the menu, if one is shown.
///
/// Router paths into the menu are dropped along with it.
pub(crate) fn dismiss_overlay(root: &mut RenderRoot) {
    let Some(overlay) = root.overlay.take() else {
        return;
    };
    debug!("menu {} dismissed", overlay.pod.state.path);
    let in_menu = |path: &Option<IdPath>| {
        path.as_ref()
            .is_some_and(|path| overlay.pod.resolve(path).is_some())
    };
    if in_menu(&root.router.tracking) {
        root.router.tracking = None;
    }
    if in_menu(&root.router.hovered) {
        root.router.hovered = None;
    }
    if in_menu(&root.router.focused) {
        root.router.focused = None;
        root.global_state
            .emit_signal(RenderRootSignal::FocusChanged(None));
    }
    remove_pod(&mut root.global_state, overlay.pod);
}

// --- MARK: TEXT
pub(crate) fn run_on_text_event_pass(root: &mut RenderRoot, event: &TextEvent) -> Handled {
    let _span = info_span!("text_event", event = event.short_name()).entered();
    match event {
        TextEvent::Keyboard(key) => {
            if key.is_tab() {
                let forward = !key.shift();
                let chain = focus_chain(&root.root);
                let next = advance_focus(&chain, root.router.focused.as_ref(), forward);
                debug!("Tab: focus moves to {next:?}");
                set_focus(root, next);
                return Handled::Yes;
            }
            let target = focused_target(root).unwrap_or_else(|| root.root.state.path.clone());
            let handled = dispatch_text(root, &target, event);
            if handled.is_handled() || !key.is_space() {
                return handled;
            }
            // Space activates the focused control as if it had been clicked.
            let Some(center) = root
                .resolve_pod(&target)
                .filter(|pod| pod.state.accepts_input())
                .map(|pod| pod.state.frame.center())
            else {
                return Handled::No;
            };
            dispatch_pointer(root, &target, &PointerEvent::Click { pos: center });
            Handled::Yes
        }
        TextEvent::Insert(_) => match focused_target(root) {
            Some(target) => dispatch_text(root, &target, event),
            None => Handled::No,
        },
    }
}
