// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use hashbrown::HashMap;
use kurbo::Rect;
use tracing::{info_span, trace};

use crate::app::{RenderRoot, RenderRootSignal, RenderRootState};
use crate::core::{NodeId, NodePod, UpdateCtx};
use crate::passes::enter_span_if;

// --- MARK: UPDATE ANIM
fn update_anim_for_node(global_state: &mut RenderRootState, pod: &mut NodePod, dt: Duration) {
    let _span = enter_span_if(global_state.trace.anim, pod);
    let NodePod {
        state,
        node,
        children,
        ..
    } = pod;

    // The flag is cleared before the call: nodes that keep animating request again from
    // inside `on_anim_frame`.
    if state.request_anim {
        state.request_anim = false;
        let mut ctx = UpdateCtx {
            global_state: &mut *global_state,
            node_state: &mut *state,
        };
        node.on_anim_frame(&mut ctx, dt);
    }

    for child in children {
        update_anim_for_node(global_state, child, dt);
    }
}

/// Run the animation pass.
///
/// Nodes that requested an animation frame get [`Node::on_anim_frame`] first. Then the
/// scheduler advances by `dt` and every animated node takes the frame it sampled.
///
/// [`Node::on_anim_frame`]: crate::core::Node::on_anim_frame
pub(crate) fn run_update_anim_pass(root: &mut RenderRoot, dt: Duration) {
    let _span = info_span!("anim").entered();
    let global_state = &mut root.global_state;

    if global_state.needs_anim {
        global_state.needs_anim = false;
        update_anim_for_node(global_state, &mut root.root, dt);
        if let Some(overlay) = &mut root.overlay {
            update_anim_for_node(global_state, &mut overlay.pod, dt);
        }
        global_state.needs_render = true;
    }

    if global_state.scheduler.is_active() {
        let frames: HashMap<NodeId, Rect> = global_state.scheduler.tick(dt).into_iter().collect();
        trace!("{} animated frames", frames.len());
        let mut take_frame = |pod: &mut NodePod| {
            if let Some(frame) = frames.get(&pod.state.id) {
                pod.state.frame = *frame;
            }
        };
        root.root.for_each_mut(&mut take_frame);
        if let Some(overlay) = &mut root.overlay {
            overlay.pod.for_each_mut(&mut take_frame);
        }
        global_state.needs_render = true;
    }

    if global_state.scheduler.is_active() || global_state.needs_anim {
        global_state.emit_signal(RenderRootSignal::RequestAnimFrame);
    }
}
