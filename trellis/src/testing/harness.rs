// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Tools and infrastructure for testing nodes.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use kurbo::{Point, Size, Vec2};

use crate::app::{
    LifecycleRecord, RenderRoot, RenderRootOptions, RenderRootSignal, try_init_test_tracing,
};
use crate::core::{
    BuildError, Handled, IdPath, Key, KeyEvent, Modifiers, NewNode, NodeId, NodeRef,
    PointerButton, PointerEvent, TextEvent, WindowEvent,
};
use crate::state::StateCell;
use crate::testing::{DrawLog, HeadlessRenderer};

/// Default window size for tests.
pub const HARNESS_DEFAULT_SIZE: Size = Size::new(400., 400.);

/// A headless environment to test nodes in.
///
/// `TestHarness` wraps a [`RenderRoot`] drawing into a [`HeadlessRenderer`].
///
/// ## Workflow
///
/// - Create a harness with some tree.
/// - Send events to the tree as if you were a user interacting with a window.
///   Every event is followed by a zero-length tick, so rebuilds, layout and painting
///   happen automatically.
/// - Check that the tree matches what you expect, through [`NodeRef`]s, the lifecycle log
///   and the draw log.
///
/// Time only passes when [`animate`](Self::animate) is called.
///
/// ## Example
///
/// ```
/// use trellis::core::NodeExt;
/// use trellis::nodes::{Stack, Text};
/// use trellis::testing::TestHarness;
///
/// let harness = TestHarness::create(Stack::vertical().with_child(Text::new("Hello")));
/// let text = harness.get(&["Stack-0", "Text-0"]);
/// assert_eq!(text.size().width, 50.0);
/// ```
pub struct TestHarness {
    render_root: RenderRoot,
    draw_log: DrawLog,
    signals: Rc<RefCell<VecDeque<RenderRootSignal>>>,
    mouse_pos: Point,
}

impl fmt::Debug for TestHarness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestHarness")
            .field("render_root", &self.render_root)
            .field("mouse_pos", &self.mouse_pos)
            .finish_non_exhaustive()
    }
}

impl TestHarness {
    /// Builds a harness with the given tree.
    ///
    /// Window size will be [`HARNESS_DEFAULT_SIZE`].
    #[track_caller]
    pub fn create(tree: impl Into<NewNode>) -> Self {
        Self::create_with_size(tree, HARNESS_DEFAULT_SIZE)
    }

    /// Builds a harness with the given tree and window size.
    #[track_caller]
    pub fn create_with_size(tree: impl Into<NewNode>, window_size: Size) -> Self {
        Self::create_with(
            tree,
            RenderRootOptions {
                size: window_size,
                ..Default::default()
            },
        )
    }

    /// Builds a harness with the given tree and options.
    ///
    /// # Panics
    ///
    /// If the initial tree fails to build.
    #[track_caller]
    pub fn create_with(tree: impl Into<NewNode>, options: RenderRootOptions) -> Self {
        match Self::try_create_with(tree, options) {
            Ok(harness) => harness,
            Err(err) => panic!("failed to build the initial tree: {err}"),
        }
    }

    /// Builds a harness, returning construction errors of the initial tree.
    pub fn try_create_with(
        tree: impl Into<NewNode>,
        options: RenderRootOptions,
    ) -> Result<Self, BuildError> {
        let _ = try_init_test_tracing();

        let renderer = HeadlessRenderer::new();
        let draw_log = renderer.log();
        let signals = Rc::new(RefCell::new(VecDeque::new()));
        let sink = signals.clone();
        let render_root = RenderRoot::new(
            tree,
            renderer,
            move |signal| sink.borrow_mut().push_back(signal),
            options,
        )?;
        let mut harness = Self {
            render_root,
            draw_log,
            signals,
            mouse_pos: Point::ZERO,
        };
        harness.tick()?;
        Ok(harness)
    }

    // --- MARK: FRAMES

    /// Run one zero-length tick.
    pub fn tick(&mut self) -> Result<(), BuildError> {
        self.render_root.tick(Duration::ZERO)
    }

    /// Replace the tree description and run a zero-length tick.
    pub fn rebuild(&mut self, tree: impl Into<NewNode>) -> Result<(), BuildError> {
        self.render_root.rebuild(tree)?;
        self.tick()
    }

    /// Run one tick of length `dt`.
    ///
    /// # Panics
    ///
    /// If a rebuild fails during the tick.
    #[track_caller]
    pub fn animate(&mut self, dt: Duration) {
        if let Err(err) = self.render_root.tick(dt) {
            panic!("rebuild failed while animating: {err}");
        }
    }

    /// Run one tick of `millis` milliseconds.
    #[track_caller]
    pub fn animate_ms(&mut self, millis: u64) {
        self.animate(Duration::from_millis(millis));
    }

    #[track_caller]
    fn process_tick(&mut self) {
        if let Err(err) = self.tick() {
            panic!("rebuild failed after an event: {err}");
        }
    }

    // --- MARK: EVENTS

    /// Send a pointer event to the tree, then tick.
    #[track_caller]
    pub fn process_pointer_event(&mut self, event: PointerEvent) -> Handled {
        let handled = self.render_root.handle_pointer_event(event);
        self.process_tick();
        handled
    }

    /// Send a text event to the tree, then tick.
    #[track_caller]
    pub fn process_text_event(&mut self, event: TextEvent) -> Handled {
        let handled = self.render_root.handle_text_event(event);
        self.process_tick();
        handled
    }

    /// Send a window event to the tree, then tick.
    #[track_caller]
    pub fn process_window_event(&mut self, event: WindowEvent) -> Handled {
        let handled = self.render_root.handle_window_event(event);
        self.process_tick();
        handled
    }

    /// Move the mouse to `pos`.
    #[track_caller]
    pub fn mouse_move(&mut self, pos: impl Into<Point>) -> Handled {
        self.mouse_pos = pos.into();
        self.process_pointer_event(PointerEvent::Move {
            pos: self.mouse_pos,
        })
    }

    /// Press the primary button at the current mouse position.
    #[track_caller]
    pub fn mouse_down(&mut self) -> Handled {
        self.process_pointer_event(PointerEvent::Down {
            pos: self.mouse_pos,
            button: PointerButton::Primary,
        })
    }

    /// Release the primary button at the current mouse position.
    #[track_caller]
    pub fn mouse_up(&mut self) -> Handled {
        self.process_pointer_event(PointerEvent::Up {
            pos: self.mouse_pos,
            button: PointerButton::Primary,
        })
    }

    /// Move to `pos`, press and release.
    #[track_caller]
    pub fn mouse_click_at(&mut self, pos: impl Into<Point>) -> Handled {
        self.mouse_move(pos);
        self.mouse_down();
        self.mouse_up()
    }

    /// Click the centre of the node `id`.
    ///
    /// # Panics
    ///
    /// If the node isn't in the tree.
    #[track_caller]
    pub fn mouse_click_on(&mut self, id: NodeId) -> Handled {
        let Some(node) = self.render_root.get_node(id) else {
            panic!("could not find node {id}");
        };
        let center = node.layout_rect().center();
        self.mouse_click_at(center)
    }

    /// Turn the wheel by `delta` notches at the current mouse position.
    #[track_caller]
    pub fn mouse_wheel(&mut self, delta: impl Into<Vec2>) -> Handled {
        self.process_pointer_event(PointerEvent::Wheel {
            pos: self.mouse_pos,
            delta: delta.into(),
        })
    }

    /// Press and release `key`.
    ///
    /// Returns whether the press was handled.
    #[track_caller]
    pub fn key_down(&mut self, key: Key) -> Handled {
        self.key_down_with(key, Modifiers::empty())
    }

    /// Press and release `key` while holding `modifiers`.
    #[track_caller]
    pub fn key_down_with(&mut self, key: Key, modifiers: Modifiers) -> Handled {
        let handled = self.process_text_event(TextEvent::Keyboard(
            KeyEvent::down(key.clone()).with_modifiers(modifiers),
        ));
        self.process_text_event(TextEvent::Keyboard(
            KeyEvent::up(key).with_modifiers(modifiers),
        ));
        handled
    }

    /// Press Tab, or Shift-Tab when `forward` is false.
    #[track_caller]
    pub fn press_tab(&mut self, forward: bool) {
        let modifiers = if forward {
            Modifiers::empty()
        } else {
            Modifiers::SHIFT
        };
        self.key_down_with(Key::Tab, modifiers);
    }

    /// Type `text` into the focused node.
    #[track_caller]
    pub fn type_text(&mut self, text: &str) -> Handled {
        self.process_text_event(TextEvent::Insert(text.to_string()))
    }

    /// Resize the window.
    #[track_caller]
    pub fn resize(&mut self, size: impl Into<Size>) {
        self.process_window_event(WindowEvent::Resize(size.into()));
    }

    /// Change the scale factor.
    #[track_caller]
    pub fn rescale(&mut self, scale_factor: f64) {
        self.process_window_event(WindowEvent::Rescale(scale_factor));
    }

    // --- MARK: GETTERS

    /// The root node.
    pub fn root(&self) -> NodeRef<'_> {
        self.render_root.root_ref()
    }

    /// The node whose identity path is written `names`, such as `["Stack-0", "Text-1"]`.
    ///
    /// # Panics
    ///
    /// If no node has that path.
    #[track_caller]
    pub fn get(&self, names: &[&str]) -> NodeRef<'_> {
        match self.try_get(names) {
            Some(node) => node,
            None => panic!("could not find node {}\n{}", names.join("/"), self.root()),
        }
    }

    /// The node whose identity path is written `names`, if it exists.
    pub fn try_get(&self, names: &[&str]) -> Option<NodeRef<'_>> {
        fn find<'a>(node: NodeRef<'a>, names: &[&str]) -> Option<NodeRef<'a>> {
            let depth = node.path().len();
            if depth > names.len() || !node.path().matches(&names[..depth]) {
                return None;
            }
            if depth == names.len() {
                return Some(node);
            }
            node.children().find_map(|child| find(child, names))
        }
        find(self.root(), names).or_else(|| find(self.menu()?, names))
    }

    /// The root of the shown menu, if any.
    pub fn menu(&self) -> Option<NodeRef<'_>> {
        self.render_root.menu_ref()
    }

    /// The node with the given id, if it exists.
    pub fn get_node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.render_root.get_node(id)
    }

    /// The first node with the given short type name, depth first.
    ///
    /// # Panics
    ///
    /// If there is none.
    #[track_caller]
    pub fn find_by_type(&self, type_name: &str) -> NodeRef<'_> {
        match self.root().find_by_type(type_name) {
            Some(node) => node,
            None => panic!("no {type_name} in the tree\n{}", self.root()),
        }
    }

    /// The focused path, if it resolves.
    pub fn focused_path(&self) -> Option<IdPath> {
        let path = self.render_root.focused_path()?;
        self.render_root.resolve(path).map(|node| node.path().clone())
    }

    /// The hovered path, if it resolves.
    pub fn hovered_path(&self) -> Option<IdPath> {
        let path = self.render_root.hovered_path()?;
        self.render_root.resolve(path).map(|node| node.path().clone())
    }

    /// The current mouse position.
    pub fn mouse_pos(&self) -> Point {
        self.mouse_pos
    }

    /// Reconciliation notifications emitted since the last call.
    ///
    /// Other signals are dropped.
    pub fn take_lifecycle_records(&mut self) -> Vec<LifecycleRecord> {
        self.take_signals()
            .into_iter()
            .filter_map(|signal| match signal {
                RenderRootSignal::Lifecycle(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    /// Every signal emitted since the last call.
    pub fn take_signals(&mut self) -> Vec<RenderRootSignal> {
        self.signals.borrow_mut().drain(..).collect()
    }

    /// The draw commands of the last frame.
    pub fn draw_log(&self) -> &DrawLog {
        &self.draw_log
    }

    /// The wrapped root.
    pub fn render_root(&self) -> &RenderRoot {
        &self.render_root
    }

    /// Mutable access to the wrapped root.
    pub fn render_root_mut(&mut self) -> &mut RenderRoot {
        &mut self.render_root
    }

    /// Rebuild the root whenever `cell` changes.
    pub fn bind_state<T: Clone + PartialEq + 'static>(&mut self, cell: &StateCell<T>) {
        self.render_root.bind_state(cell);
    }
}
