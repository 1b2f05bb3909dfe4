// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Keyboard focus.

use tracing::debug;

use crate::app::{RenderRoot, RenderRootSignal};
use crate::core::{IdPath, NodePod, Update};
use crate::passes::event::send_update_to;

/// The focusable nodes in tab order: interactive, enabled nodes, depth first.
pub(crate) fn focus_chain(root: &NodePod) -> Vec<IdPath> {
    let mut chain = Vec::new();
    root.for_each(&mut |pod| {
        if pod.state.accepts_input() {
            chain.push(pod.state.path.clone());
        }
    });
    chain
}

/// The node after (or before) `current` in `chain`, wrapping around at both ends.
///
/// Without a current node, or with one that is not in the chain, forward traversal starts
/// at the first node and backward traversal at the last.
pub(crate) fn advance_focus(
    chain: &[IdPath],
    current: Option<&IdPath>,
    forward: bool,
) -> Option<IdPath> {
    if chain.is_empty() {
        return None;
    }
    let len = chain.len();
    let position = current.and_then(|current| chain.iter().position(|path| path == current));
    let next = match (position, forward) {
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
        (None, true) => 0,
        (None, false) => len - 1,
    };
    Some(chain[next].clone())
}

/// Move focus to `path`, blurring the previous holder first.
pub(crate) fn set_focus(root: &mut RenderRoot, path: Option<IdPath>) {
    if root.router.focused == path {
        return;
    }
    if let Some(old) = root.router.focused.take() {
        send_update_to(root, &old, Update::FocusChanged(false));
    }
    if let Some(new) = &path {
        send_update_to(root, new, Update::FocusChanged(true));
    }
    debug!("focus changed to {path:?}");
    root.router.focused = path.clone();
    root.global_state
        .emit_signal(RenderRootSignal::FocusChanged(path));
    root.global_state.needs_render = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Vec<IdPath> {
        let root = IdPath::root("Stack");
        (0..n).map(|i| root.child("Button", i)).collect()
    }

    #[test]
    fn forward_traversal_wraps_to_start() {
        let chain = chain(4);
        for start in &chain {
            let mut current = start.clone();
            for _ in 0..chain.len() {
                current = advance_focus(&chain, Some(&current), true).unwrap();
            }
            assert_eq!(&current, start);
        }
    }

    #[test]
    fn backward_traversal_wraps_to_end() {
        let chain = chain(3);
        assert_eq!(
            advance_focus(&chain, Some(&chain[0]), false),
            Some(chain[2].clone())
        );
        assert_eq!(
            advance_focus(&chain, Some(&chain[2]), true),
            Some(chain[0].clone())
        );
    }

    #[test]
    fn unknown_focus_starts_at_an_end() {
        let chain = chain(3);
        let stale = IdPath::root("Text");
        assert_eq!(advance_focus(&chain, None, true), Some(chain[0].clone()));
        assert_eq!(
            advance_focus(&chain, Some(&stale), false),
            Some(chain[2].clone())
        );
        assert_eq!(advance_focus(&[], None, true), None);
    }
}
