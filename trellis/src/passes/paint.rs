// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use tracing::{info_span, trace};

use crate::app::{RenderRoot, RenderRootState};
use crate::backend::Primitive;
use crate::core::{NodePod, PaintCtx};
use crate::passes::enter_span_if;

// --- MARK: PAINT NODE
fn paint_node(global_state: &mut RenderRootState, pod: &mut NodePod) {
    let trace = global_state.trace.paint;
    let _span = enter_span_if(trace, pod);
    let NodePod {
        state,
        node,
        children,
        ..
    } = pod;
    if trace {
        trace!("Painting node '{}' {}", state.type_name, state.id);
    }

    let inner = state.inner_rect();
    let mut ctx = PaintCtx {
        global_state: &mut *global_state,
        node_state: &*state,
    };
    node.paint(&mut ctx, inner);

    if state.clips_children {
        global_state.renderer.push_clip(state.frame);
    }
    for child in children.iter_mut() {
        paint_node(global_state, child);
    }
    if state.clips_children {
        global_state.renderer.pop_clip();
    }

    let mut ctx = PaintCtx {
        global_state: &mut *global_state,
        node_state: &*state,
    };
    node.post_paint(&mut ctx, inner);
}

// --- MARK: ROOT
/// Draw the whole tree, then the focus ring, then the menu if one is shown, and present the
/// frame.
pub(crate) fn run_paint_pass(root: &mut RenderRoot) {
    let _span = info_span!("paint").entered();
    let global_state = &mut root.global_state;
    global_state.needs_render = false;

    let background = global_state.assets.window_background();
    global_state.renderer.clear(background);
    paint_node(global_state, &mut root.root);

    // Drawn on top of the whole tree.
    let focused = root
        .router
        .focused
        .as_ref()
        .and_then(|path| root.root.resolve(path))
        .filter(|pod| pod.state.draws_focus);
    if let Some(pod) = focused {
        let color = global_state.assets.focus_color();
        let ring = pod.state.frame.inflate(pod.state.style.scale, pod.state.style.scale);
        global_state
            .renderer
            .draw(&Primitive::FocusRing(color), ring, &pod.state.style);
    }

    if let Some(overlay) = &mut root.overlay {
        paint_node(global_state, &mut overlay.pod);
    }

    global_state.renderer.present();
}
