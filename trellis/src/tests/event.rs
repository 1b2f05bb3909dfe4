// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::Cell;
use std::rc::Rc;

use assert_matches::assert_matches;
use kurbo::{Point, Size};

use crate::app::RenderRootSignal;
use crate::core::{
    Handled, Key, KeyEvent, NewNode, NodeExt, PointerButton, PointerEvent, TextEvent, Update,
};
use crate::nodes::{Button, Menu, MenuItem, ScrollView, Stack, Text};
use crate::style::StyleExt;
use crate::testing::{DrawCommand, ModularNode, Record, Recording, TestHarness, TestNodeExt};

fn buttons(count: usize) -> NewNode {
    Stack::vertical().with_children((0..count).map(|index| Button::new(format!("b{index}"))))
}

fn focused(harness: &TestHarness) -> Option<String> {
    harness.focused_path().map(|path| path.to_string())
}

#[test]
fn tab_wraps_around() {
    let mut harness = TestHarness::create(buttons(3));
    assert_eq!(focused(&harness), None);

    harness.press_tab(true);
    assert_eq!(focused(&harness).as_deref(), Some("Stack-0/Button-0"));
    for _ in 0..3 {
        harness.press_tab(true);
    }
    assert_eq!(focused(&harness).as_deref(), Some("Stack-0/Button-0"));
}

#[test]
fn shift_tab_goes_backwards() {
    let mut harness = TestHarness::create(buttons(3));
    harness.press_tab(false);
    assert_eq!(focused(&harness).as_deref(), Some("Stack-0/Button-2"));
    harness.press_tab(false);
    assert_eq!(focused(&harness).as_deref(), Some("Stack-0/Button-1"));
}

#[test]
fn disabled_nodes_are_skipped() {
    let tree = Stack::vertical()
        .with_child(Button::new("a"))
        .with_child(Button::new("b").disabled(true))
        .with_child(Button::new("c"));
    let mut harness = TestHarness::create(tree);

    harness.press_tab(true);
    harness.press_tab(true);
    assert_eq!(focused(&harness).as_deref(), Some("Stack-0/Button-2"));

    let disabled = harness.get(&["Stack-0", "Button-1"]);
    assert!(disabled.is_disabled());
    assert_eq!(disabled.style().opacity, 0.25);
    let id = disabled.id();
    harness.mouse_click_on(id);
    assert_ne!(focused(&harness).as_deref(), Some("Stack-0/Button-1"));
}

#[test]
fn focus_changes_are_signalled_and_drawn() {
    let mut harness = TestHarness::create(buttons(2));
    harness.take_signals();
    harness.press_tab(true);

    let signals = harness.take_signals();
    assert!(signals.iter().any(|signal| matches!(
        signal,
        RenderRootSignal::FocusChanged(Some(path)) if path.matches(&["Stack-0", "Button-0"])
    )));
    let frame = harness.get(&["Stack-0", "Button-0"]).layout_rect();
    let rings: Vec<_> = harness
        .draw_log()
        .commands()
        .into_iter()
        .filter(|command| matches!(command, DrawCommand::FocusRing(_)))
        .collect();
    assert_eq!(rings, [DrawCommand::FocusRing(frame.inflate(1., 1.))]);
}

#[test]
fn focus_survives_a_rebuild_and_clears_when_removed() {
    let mut harness = TestHarness::create(buttons(3));
    harness.press_tab(true);
    harness.press_tab(true);
    harness.rebuild(buttons(3)).unwrap();
    assert_eq!(focused(&harness).as_deref(), Some("Stack-0/Button-1"));

    harness.rebuild(buttons(1)).unwrap();
    assert_eq!(focused(&harness), None);
    // Traversal restarts from the first node.
    harness.press_tab(true);
    assert_eq!(focused(&harness).as_deref(), Some("Stack-0/Button-0"));
}

#[test]
fn replacement_node_takes_over_focus_and_hover() {
    let tree = || {
        Stack::vertical()
            .with_child(ModularNode::new(()).content_size_fn(|_, _| Size::new(50., 50.)))
    };
    let mut harness = TestHarness::create(tree());
    harness.press_tab(true);
    let center = harness.get(&["Stack-0", "ModularNode-0"]).layout_rect().center();
    harness.mouse_move(center);
    let old = harness.get(&["Stack-0", "ModularNode-0"]).id();

    harness.rebuild(tree()).unwrap();
    let node = harness.get(&["Stack-0", "ModularNode-0"]);
    assert_ne!(node.id(), old);
    assert!(node.is_focused());
    assert!(node.is_hovered());
    let ring = DrawCommand::FocusRing(node.layout_rect().inflate(1., 1.));
    assert!(harness.draw_log().commands().contains(&ring));
}

#[test]
fn hover_follows_the_pointer() {
    let recording = Recording::default();
    let tree = Stack::vertical()
        .with_child(Button::new("a").record(&recording))
        .with_child(Button::new("b"));
    let mut harness = TestHarness::create(tree);
    let first = harness.get(&["Stack-0", "Button-0"]).layout_rect();
    let second = harness.get(&["Stack-0", "Button-1"]).layout_rect();
    recording.clear();

    harness.mouse_move(first.center());
    assert!(harness.get(&["Stack-0", "Button-0"]).is_hovered());
    assert_eq!(
        harness.hovered_path().map(|path| path.to_string()).as_deref(),
        Some("Stack-0/Button-0")
    );

    harness.mouse_move(second.center());
    assert!(!harness.get(&["Stack-0", "Button-0"]).is_hovered());
    let updates: Vec<_> = recording
        .drain()
        .into_iter()
        .filter_map(|record| match record {
            Record::Update(update) => Some(update),
            _ => None,
        })
        .collect();
    assert_eq!(
        updates,
        [Update::HoveredChanged(true), Update::HoveredChanged(false)]
    );
}

#[test]
fn pointer_gesture_stays_with_the_pressed_node() {
    let recording = Recording::default();
    let tree = Stack::vertical()
        .with_child(Button::new("a").record(&recording))
        .with_child(Button::new("b"));
    let mut harness = TestHarness::create(tree);
    let first = harness.get(&["Stack-0", "Button-0"]).layout_rect();
    let second = harness.get(&["Stack-0", "Button-1"]).layout_rect();
    recording.clear();

    harness.mouse_move(first.center());
    harness.mouse_down();
    harness.mouse_move(second.center());
    harness.mouse_up();

    let pointer: Vec<_> = recording
        .drain()
        .into_iter()
        .filter_map(|record| match record {
            Record::Pointer(event) => Some(event),
            _ => None,
        })
        .collect();
    assert_matches!(
        pointer.as_slice(),
        [
            PointerEvent::Down { .. },
            PointerEvent::Move { .. },
            PointerEvent::Up { .. },
        ]
    );
}

#[test]
fn press_outside_interactive_nodes_goes_to_the_root() {
    let pressed = Rc::new(Cell::new(false));
    let flag = pressed.clone();
    let root = ModularNode::new(())
        .pointer_event_fn(move |_, _, event| {
            if matches!(event, PointerEvent::Down { .. }) {
                flag.set(true);
            }
            Handled::Yes
        })
        .interactive(false);
    let mut harness = TestHarness::create(root);
    harness.mouse_click_at((10., 10.));
    assert!(pressed.get());
}

#[test]
fn space_clicks_only_when_unhandled() {
    let clicks = Rc::new(Cell::new(0));
    let count = clicks.clone();
    let tree = Stack::vertical().with_child(
        Button::new("go").on_click(move |_| count.set(count.get() + 1)),
    );
    let mut harness = TestHarness::create(tree);
    harness.press_tab(true);

    assert!(harness.key_down(Key::Character(" ".into())).is_handled());
    assert!(!harness.key_down(Key::Enter).is_handled());
    assert_eq!(clicks.get(), 1);
}

#[test]
fn key_events_go_to_the_focused_node() {
    let recording = Recording::default();
    let tree = Stack::vertical()
        .with_child(Button::new("a"))
        .with_child(Button::new("b").record(&recording));
    let mut harness = TestHarness::create(tree);
    harness.press_tab(false);
    recording.clear();

    harness.key_down(Key::Enter);
    harness.type_text("x");
    let texts: Vec<_> = recording
        .drain()
        .into_iter()
        .filter_map(|record| match record {
            Record::Text(event) => Some(event),
            _ => None,
        })
        .collect();
    assert_eq!(
        texts,
        [
            TextEvent::Keyboard(KeyEvent::down(Key::Enter)),
            TextEvent::Keyboard(KeyEvent::up(Key::Enter)),
            TextEvent::Insert("x".to_string()),
        ]
    );
}

#[test]
fn wheel_goes_to_the_scrollable_under_the_pointer() {
    let tree = Stack::vertical()
        .with_child(
            ScrollView::new()
                .with_child(
                    Stack::vertical().with_children((0..20).map(|i| Text::new(i.to_string()))),
                )
                .size(None, 100.),
        )
        .with_child(Text::new("below"));
    let mut harness = TestHarness::create_with_size(tree, Size::new(200., 300.));
    let view = harness.get(&["Stack-0", "ScrollView-0"]).layout_rect();

    harness.mouse_move(view.center());
    assert!(harness.mouse_wheel((0., 1.)).is_handled());
    let scroll = harness.get(&["Stack-0", "ScrollView-0"]);
    assert_eq!(scroll.downcast::<ScrollView>().unwrap().offset(), 20.);
}

#[test]
fn queued_events_run_at_the_next_tick() {
    let clicks = Rc::new(Cell::new(0));
    let count = clicks.clone();
    let button = Button::new("go").on_click(move |_| count.set(count.get() + 1));
    let mut harness = TestHarness::create(button);
    let center = harness.root().layout_rect().center();

    let root = harness.render_root_mut();
    root.queue_event(PointerEvent::Down {
        pos: center,
        button: PointerButton::Primary,
    });
    root.queue_event(PointerEvent::Up {
        pos: center,
        button: PointerButton::Primary,
    });
    assert!(root.needs_tick());
    assert_eq!(clicks.get(), 0);

    harness.tick().unwrap();
    assert_eq!(clicks.get(), 1);
}

#[test]
fn menu_is_drawn_last_and_hit_first() {
    let under = Rc::new(Cell::new(0));
    let over = Rc::new(Cell::new(0));
    let count_under = under.clone();
    let count_over = over.clone();
    let tree = Stack::vertical()
        .with_child(Button::new("under").on_click(move |_| count_under.set(count_under.get() + 1)));
    let mut harness = TestHarness::create(tree);

    let menu = Menu::new().with_child(
        MenuItem::new()
            .on_select(move |_| count_over.set(count_over.get() + 1))
            .with_child(Text::new("over")),
    );
    harness
        .render_root_mut()
        .show_menu(menu, Point::new(190., 190.))
        .unwrap();
    harness.tick().unwrap();

    let last_text = harness
        .draw_log()
        .commands()
        .iter()
        .rev()
        .find_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.clone()),
            _ => None,
        });
    assert_eq!(last_text.as_deref(), Some("over"));

    harness.mouse_click_at((200., 200.));
    assert_eq!(over.get(), 1);
    assert_eq!(under.get(), 0);
    assert!(harness.menu().is_none());
    assert!(harness.focused_path().is_none(), "menu items never take focus");
}

#[test]
fn debug_output_names_the_node() {
    let seen = Rc::new(std::cell::RefCell::new(String::new()));
    let sink = seen.clone();
    let tree = ModularNode::new(())
        .content_size_fn(|_, _| Size::new(50., 50.))
        .pointer_event_fn(move |_, ctx, _| {
            *sink.borrow_mut() = format!("{ctx:?}");
            Handled::No
        });
    let mut harness = TestHarness::create(tree);
    let center = harness.root().layout_rect().center();
    harness.mouse_click_at(center);

    assert_eq!(*seen.borrow(), "EventCtx { node: IdPath(ModularNode-0), .. }");
    let harness_debug = format!("{harness:?}");
    assert!(harness_debug.starts_with("TestHarness"));
    assert!(harness_debug.contains("ModularNode"));
}
