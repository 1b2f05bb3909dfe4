// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The layout pass, which computes the target frame of each node.
//!
//! Most of the logic for this pass happens in [`Node::resize`](crate::core::Node::resize)
//! and [`Node::reposition`](crate::core::Node::reposition) implementations. The drivers
//! here clamp what nodes return, store the results in [`NodeState`], and hand frame
//! changes of animated nodes to the scheduler.

use kurbo::{Rect, Size};
use tracing::{info_span, trace};

use crate::anim::FrameAnimation;
use crate::app::{RenderRoot, RenderRootState};
use crate::core::{LayoutCtx, NodePod, NodeState, PlaceCtx};
use crate::geometry::{Axis, inflate_size};
use crate::passes::enter_span_if;
use crate::util::Sanitize;

/// Negative or NaN budgets are treated as zero. Infinite budgets are kept.
fn sanitize_available(available: Size) -> Size {
    let clamp = |value: f64| if value.is_nan() { 0. } else { value.max(0.) };
    Size::new(clamp(available.width), clamp(available.height))
}

// --- MARK: MINIMUM
/// Minimum size of `pod`, padding and border included and capped by its explicit size.
pub(crate) fn minimum_pod(
    global_state: &mut RenderRootState,
    pod: &mut NodePod,
    parent_axis: Option<Axis>,
) -> Size {
    let NodePod {
        state,
        node,
        children,
        ..
    } = pod;
    let insets = state.style.insets();
    let explicit = (state.style.width, state.style.height);
    let mut ctx = LayoutCtx {
        global_state: &mut *global_state,
        node_state: &mut *state,
        children: children.as_mut_slice(),
        parent_axis,
        child_axis: None,
    };
    let content = node.minimum_size(&mut ctx).sanitize("minimum size");
    let minimum = inflate_size(content, insets);
    Size::new(
        explicit.0.map_or(minimum.width, |w| minimum.width.min(w)),
        explicit.1.map_or(minimum.height, |h| minimum.height.min(h)),
    )
}

// --- MARK: RESIZE
/// Run [`Node::resize`](crate::core::Node::resize) on `pod` and store the size it chose.
///
/// The result never exceeds `available` (after clamping to the explicit size) and is never
/// negative.
pub(crate) fn resize_pod(
    global_state: &mut RenderRootState,
    pod: &mut NodePod,
    available: Size,
    parent_axis: Option<Axis>,
) -> Size {
    let _span = enter_span_if(global_state.trace.layout, pod);
    let NodePod {
        state,
        node,
        children,
        ..
    } = pod;
    let available = state.style.constrain(sanitize_available(available));
    let mut ctx = LayoutCtx {
        global_state: &mut *global_state,
        node_state: &mut *state,
        children: children.as_mut_slice(),
        parent_axis,
        child_axis: None,
    };
    let size = node.resize(&mut ctx, available);
    let size = Size::new(
        size.width.min(available.width),
        size.height.min(available.height),
    )
    .sanitize("resize result");
    trace!(?available, ?size, "resized {}", state.path);
    state.size = size;
    size
}

// --- MARK: REPOSITION
/// Run [`Node::reposition`](crate::core::Node::reposition) on `pod` and commit its target frame.
pub(crate) fn reposition_pod(global_state: &mut RenderRootState, pod: &mut NodePod, inside: Rect) {
    let _span = enter_span_if(global_state.trace.layout, pod);
    let NodePod {
        state,
        node,
        children,
        ..
    } = pod;
    let mut ctx = PlaceCtx {
        global_state: &mut *global_state,
        node_state: &mut *state,
        children: children.as_mut_slice(),
    };
    let origin = node.reposition(&mut ctx, inside);
    let target = Rect::from_origin_size(origin, state.size);
    commit_frame(global_state, state, target);
}

/// Store `target` and decide which frame the node renders with until the next tick.
fn commit_frame(global_state: &mut RenderRootState, state: &mut NodeState, target: Rect) {
    state.target = target;
    let previous = state.prev_frame.take();
    let animation = state.style.animation;
    let running_target = global_state
        .scheduler
        .get(state.id)
        .map(FrameAnimation::target);

    match (animation, running_target) {
        (Some(spec), Some(running)) => {
            if running != target {
                // Re-target from wherever the node is drawn right now.
                global_state
                    .scheduler
                    .register(FrameAnimation::new(state.id, state.frame, target, spec));
            }
        }
        (Some(spec), None) => match previous {
            Some(previous) if previous != target => {
                global_state
                    .scheduler
                    .register(FrameAnimation::new(state.id, previous, target, spec));
                state.frame = previous;
            }
            _ => state.frame = target,
        },
        (None, running) => {
            if running.is_some() {
                global_state.scheduler.cancel(state.id);
            }
            state.frame = target;
        }
    }
    state.has_layout = true;
    trace!(frame = ?state.frame, ?target, "placed {}", state.path);
}

// --- MARK: ROOT
/// Lay out the whole tree in the window rectangle.
pub(crate) fn run_layout_pass(root: &mut RenderRoot) {
    let _span = info_span!("layout").entered();
    root.global_state.needs_layout = false;
    let window = root.size;
    resize_pod(&mut root.global_state, &mut root.root, window, None);
    reposition_pod(
        &mut root.global_state,
        &mut root.root,
        Rect::from_origin_size((0., 0.), window),
    );
    if let Some(overlay) = &mut root.overlay {
        let size = resize_pod(&mut root.global_state, &mut overlay.pod, window, None);
        reposition_pod(
            &mut root.global_state,
            &mut overlay.pod,
            Rect::from_origin_size(overlay.anchor, size),
        );
    }
    root.global_state.needs_render = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_budgets_become_zero() {
        assert_eq!(
            sanitize_available(Size::new(-5., f64::INFINITY)),
            Size::new(0., f64::INFINITY)
        );
        assert_eq!(sanitize_available(Size::new(f64::NAN, 3.)), Size::new(0., 3.));
    }
}
