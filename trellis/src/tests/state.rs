// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use assert_matches::assert_matches;

use crate::core::{BuildError, ForEach, Lifecycle, NodeExt};
use crate::nodes::{Stack, Text};
use crate::state::{StateCell, StateError};
use crate::testing::{ModularNode, TestHarness};

fn texts(harness: &TestHarness) -> Vec<String> {
    harness
        .root()
        .children()
        .filter_map(|child| child.downcast::<Text>().map(|text| text.text().to_string()))
        .collect()
}

#[test]
fn bound_state_rebuilds_the_tree() {
    let items = StateCell::detached(vec!["a".to_string()]);
    let source = items.clone();
    let tree = Stack::vertical().with_each(ForEach::dynamic(move || {
        source.get().into_iter().map(Text::new).collect::<Vec<_>>()
    }));
    let mut harness = TestHarness::create(tree);
    harness.bind_state(&items);
    assert_eq!(texts(&harness), ["a"]);

    items.update(|items| items.push("b".to_string()));
    assert!(harness.render_root().needs_tick());
    harness.tick().unwrap();
    assert_eq!(texts(&harness), ["a", "b"]);
}

#[test]
fn node_state_drives_its_own_rebuild() {
    let counter = ModularNode::new(()).reusable().children_fn(|_, ctx| {
        let count = ctx.state("count", || 0u32)?.get();
        Ok(vec![Text::new(format!("count {count}")).into()])
    });
    let mut harness = TestHarness::create(Stack::vertical().with_child(counter));
    let node = harness.get(&["Stack-0", "ModularNode-0"]);
    let cell = node.state::<u32>("count").unwrap().unwrap();
    let text = |harness: &TestHarness| {
        let text = harness.get(&["Stack-0", "ModularNode-0", "Text-0"]);
        text.downcast::<Text>().unwrap().text().to_string()
    };
    assert_eq!(text(&harness), "count 0");

    cell.set(1);
    harness.tick().unwrap();
    assert_eq!(text(&harness), "count 1");

    // Equal writes are no-ops.
    cell.set(1);
    assert!(!harness.render_root().needs_tick());
}

#[test]
fn spawned_task_writes_state() {
    let node = ModularNode::new(())
        .reusable()
        .children_fn(|_, ctx| {
            let loaded = ctx.state("loaded", String::new)?.get();
            Ok(vec![Text::new(loaded).into()])
        })
        .lifecycle_fn(|_, ctx, event| {
            if event != Lifecycle::Mounted {
                return;
            }
            let Ok(cell) = ctx.state("loaded", String::new) else {
                return;
            };
            ctx.spawn(async move {
                cell.set("done".to_string());
            });
        });
    let harness = TestHarness::create(node);
    // The creation tick polls the task, then rebuilds the node.
    let text = harness.get(&["ModularNode-0", "Text-0"]);
    assert_eq!(text.downcast::<Text>().unwrap().text(), "done");
}

#[test]
fn mismatched_state_type_is_a_construction_error() {
    let node = ModularNode::new(()).children_fn(|_, ctx| {
        ctx.state("value", || 0u32)?;
        ctx.state("value", String::new)?;
        Ok(Vec::new())
    });
    let result = TestHarness::try_create_with(node, Default::default());
    assert_matches!(
        result.err(),
        Some(BuildError::State(StateError::TypeMismatch { name: "value", .. }))
    );
}
