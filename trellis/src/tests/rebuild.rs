// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use assert_matches::assert_matches;

use crate::core::{BuildError, ForEach, Lifecycle, NewNode, NodeExt};
use crate::nodes::{Group, Rectangle, Stack, Text};
use crate::testing::{ModularNode, Record, Recording, TestHarness, TestNodeExt};

fn counter() -> ModularNode<()> {
    ModularNode::new(()).children_fn(|_, ctx| {
        ctx.state("count", || 0u32)?;
        Ok(Vec::new())
    })
}

#[test]
fn reused_instance_keeps_its_state() {
    let tree = || Stack::vertical().with_child(counter().reusable());
    let mut harness = TestHarness::create(tree());
    let node = harness.get(&["Stack-0", "ModularNode-0"]);
    let id = node.id();
    let cell = node.state::<u32>("count").unwrap().unwrap();
    cell.set(3);
    harness.tick().unwrap();

    harness.rebuild(tree()).unwrap();
    let node = harness.get(&["Stack-0", "ModularNode-0"]);
    assert_eq!(node.id(), id);
    let after = node.state::<u32>("count").unwrap().unwrap();
    assert!(after.ptr_eq(&cell));
    assert_eq!(after.get(), 3);
}

#[test]
fn refused_reuse_replaces_the_instance() {
    let tree = || Stack::vertical().with_child(counter());
    let mut harness = TestHarness::create(tree());
    let before = harness.get(&["Stack-0", "ModularNode-0"]);
    let id = before.id();
    let cell = before.state::<u32>("count").unwrap().unwrap();
    harness.take_lifecycle_records();

    harness.rebuild(tree()).unwrap();
    let after = harness.get(&["Stack-0", "ModularNode-0"]);
    assert_ne!(after.id(), id);
    assert!(!cell.is_attached());

    let events: Vec<_> = harness
        .take_lifecycle_records()
        .into_iter()
        .filter(|record| record.path.matches(&["Stack-0", "ModularNode-0"]))
        .map(|record| (record.id == id, record.event))
        .collect();
    assert_eq!(
        events,
        [(true, Lifecycle::Removed), (false, Lifecycle::Mounted)]
    );
}

#[test]
fn removed_child_fires_one_notification() {
    let mut harness = TestHarness::create(
        Stack::vertical()
            .with_child(Text::new("a"))
            .with_child(Text::new("b")),
    );
    harness.take_lifecycle_records();

    harness
        .rebuild(Stack::vertical().with_child(Text::new("a")))
        .unwrap();
    let records = harness.take_lifecycle_records();
    let removed: Vec<_> = records
        .iter()
        .filter(|record| record.path.matches(&["Stack-0", "Text-1"]))
        .collect();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].event, Lifecycle::Removed);
    assert_eq!(removed[0].type_name, "Text");

    let kept: Vec<_> = records
        .iter()
        .filter(|record| record.path.matches(&["Stack-0", "Text-0"]))
        .map(|record| record.event)
        .collect();
    assert_eq!(kept, [Lifecycle::Updated]);
}

#[test]
fn changed_type_is_a_different_path() {
    let recording = Recording::default();
    let mut harness =
        TestHarness::create(Group::new().with_child(Text::new("a").record(&recording)));
    recording.clear();

    harness
        .rebuild(Group::new().with_child(Rectangle::fixed(5., 5.)))
        .unwrap();
    assert_eq!(recording.lifecycle(), [Lifecycle::Removed]);
    assert!(harness.try_get(&["Group-0", "Text-0"]).is_none());
    assert!(harness.try_get(&["Group-0", "Rectangle-0"]).is_some());
}

#[test]
fn notifications_follow_the_subtree_rebuild() {
    let recording = Recording::default();
    let _harness = TestHarness::create(
        Stack::vertical()
            .record(&recording)
            .with_child(Text::new("a").record(&recording)),
    );
    // The stack builds its children, the text is mounted, then the stack.
    assert_eq!(recording.next(), Some(Record::Children));
    assert_eq!(recording.next(), Some(Record::Children));
    assert_eq!(recording.next(), Some(Record::Lifecycle(Lifecycle::Mounted)));
    assert_eq!(recording.next(), Some(Record::Lifecycle(Lifecycle::Mounted)));
}

#[test]
fn removal_detaches_the_whole_subtree() {
    let tree = Stack::vertical().with_child(Group::new().with_child(counter().reusable()));
    let mut harness = TestHarness::create(tree);
    let cell = harness
        .get(&["Stack-0", "Group-0", "ModularNode-0"])
        .state::<u32>("count")
        .unwrap()
        .unwrap();
    assert!(cell.is_attached());

    harness.rebuild(Stack::vertical()).unwrap();
    assert!(!cell.is_attached());
    // Writes to a detached cell change nothing in the tree.
    cell.set(5);
    harness.tick().unwrap();
    assert_eq!(harness.root().child_count(), 0);
}

#[test]
fn dynamic_contents_expand_in_place() {
    let tree = Stack::vertical()
        .with_child(Text::new("header"))
        .with_each(ForEach::indexed(["x", "y"], |index, item| {
            Text::new(format!("{index}:{item}"))
        }));
    let harness = TestHarness::create(tree);
    let texts: Vec<_> = harness
        .root()
        .children()
        .map(|child| child.downcast::<Text>().unwrap().text().to_string())
        .collect();
    assert_eq!(texts, ["header", "0:x", "1:y"]);
}

#[test]
fn construction_error_keeps_the_previous_children() {
    let mut harness = TestHarness::create(Stack::vertical().with_child(Text::new("kept")));
    let failing: NewNode = Stack::vertical().with_each(ForEach::try_new([1, 2], |n| {
        if *n == 2 {
            Err("no twos")
        } else {
            Ok(Text::new(n.to_string()))
        }
    }));

    assert_matches!(harness.rebuild(failing), Err(BuildError::Builder { .. }));
    let kept = harness.get(&["Stack-0", "Text-0"]);
    assert_eq!(kept.downcast::<Text>().unwrap().text(), "kept");
}
