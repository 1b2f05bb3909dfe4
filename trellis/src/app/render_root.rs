// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use futures::executor::{LocalPool, LocalSpawner};
use kurbo::{Point, Size};
use tracing::{debug, info_span, trace, warn};

use crate::anim::AnimationScheduler;
use crate::backend::{AssetLoader, Renderer, Theme};
use crate::core::{
    BuildError, Handled, IdPath, InputEvent, KeyEvent, Lifecycle, NewNode, NodeId, NodePod,
    NodeRef, PointerEvent, TextEvent, WindowEvent,
};
use crate::passes::PassTracing;
use crate::passes::anim::run_update_anim_pass;
use crate::passes::event::{
    RouterState, dismiss_overlay, restore_router_flags, run_on_pointer_event_pass,
    run_on_text_event_pass,
};
use crate::passes::layout::run_layout_pass;
use crate::passes::paint::run_paint_pass;
use crate::passes::rebuild::{mount_root, run_dirty_rebuilds, run_root_rebuild};
use crate::state::{DirtyQueue, StateCell};

// --- MARK: STRUCTS

/// The runtime of one window.
///
/// This owns the node tree and is the entry point for all input and for the frame clock.
/// Events may be handled immediately or queued; either way, the resulting rebuilds, layout
/// and drawing happen in the next [`tick`](Self::tick).
pub struct RenderRoot {
    pub(crate) root: NodePod,

    /// Pop-up layer drawn above the tree and hit-tested before it.
    pub(crate) overlay: Option<Overlay>,

    /// Id of the current root node, shared with the callbacks of bound state cells.
    pub(crate) root_id: Rc<Cell<NodeId>>,

    /// Current size of the window, in backend pixels.
    pub(crate) size: Size,

    /// Tracked, hovered and focused paths.
    pub(crate) router: RouterState,

    /// State passed to context types.
    pub(crate) global_state: RenderRootState,

    pub(crate) pool: LocalPool,
    pub(crate) event_queue: VecDeque<InputEvent>,
}

/// A mounted pop-up menu.
#[derive(Debug)]
pub(crate) struct Overlay {
    pub(crate) pod: NodePod,
    /// Top-left corner of the menu, in window coordinates.
    pub(crate) anchor: Point,
}

/// State shared between passes.
pub(crate) struct RenderRootState {
    /// Sink for signals to be processed by the platform layer.
    pub(crate) signal_sink: Box<dyn FnMut(RenderRootSignal)>,
    pub(crate) renderer: Box<dyn Renderer>,
    pub(crate) assets: Box<dyn AssetLoader>,
    pub(crate) scheduler: AnimationScheduler,
    /// Nodes whose state cells changed since the last rebuild.
    pub(crate) dirty: Rc<DirtyQueue>,
    pub(crate) spawner: LocalSpawner,
    pub(crate) needs_layout: bool,
    pub(crate) needs_render: bool,
    /// Some node requested an animation frame.
    pub(crate) needs_anim: bool,
    /// Menu requested by an event handler, shown once the event is handled.
    pub(crate) menu_request: Option<(NewNode, Point)>,
    pub(crate) scale_factor: f64,
    /// Pass tracing configuration, used to skip tracing to limit overhead.
    pub(crate) trace: PassTracing,
}

/// Options for creating a [`RenderRoot`].
pub struct RenderRootOptions {
    /// The size of the window, in backend pixels.
    pub size: Size,

    /// The scale factor lengths are multiplied by.
    ///
    /// `1.0` is a sensible default.
    pub scale_factor: f64,

    /// Source of drawables and per-type style defaults.
    pub theme: Box<dyn AssetLoader>,
}

impl Default for RenderRootOptions {
    fn default() -> Self {
        Self {
            size: Size::new(800., 600.),
            scale_factor: 1.0,
            theme: Box::new(Theme::new()),
        }
    }
}

impl fmt::Debug for RenderRootOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderRootOptions")
            .field("size", &self.size)
            .field("scale_factor", &self.scale_factor)
            .finish_non_exhaustive()
    }
}

/// One reconciliation notification, as reported to the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleRecord {
    /// The node instance.
    pub id: NodeId,
    /// Its identity path.
    pub path: IdPath,
    /// Its short type name.
    pub type_name: &'static str,
    /// What happened to it.
    pub event: Lifecycle,
}

/// Objects emitted by the [`RenderRoot`] to signal that something has changed or requires
/// external actions.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderRootSignal {
    /// A node was mounted, reused or removed by reconciliation.
    Lifecycle(LifecycleRecord),
    /// The window needs a [`tick`](RenderRoot::tick).
    RequestRedraw,
    /// The window should tick again on the next animation frame.
    RequestAnimFrame,
    /// Keyboard focus moved.
    FocusChanged(Option<IdPath>),
}

impl RenderRoot {
    /// Creates a new `RenderRoot` and mounts `tree`.
    ///
    /// Nothing is laid out or drawn until the first [`tick`](Self::tick).
    pub fn new(
        tree: impl Into<NewNode>,
        renderer: impl Renderer + 'static,
        signal_sink: impl FnMut(RenderRootSignal) + 'static,
        options: RenderRootOptions,
    ) -> Result<Self, BuildError> {
        let RenderRootOptions {
            size,
            scale_factor,
            theme,
        } = options;
        let pool = LocalPool::new();
        let mut global_state = RenderRootState {
            signal_sink: Box::new(signal_sink),
            renderer: Box::new(renderer),
            assets: theme,
            scheduler: AnimationScheduler::new(),
            dirty: Rc::new(DirtyQueue::default()),
            spawner: pool.spawner(),
            needs_layout: true,
            needs_render: true,
            needs_anim: false,
            menu_request: None,
            scale_factor,
            trace: PassTracing::from_env(),
        };
        global_state.renderer.resize(size);
        let root = mount_root(&mut global_state, tree.into())?;
        Ok(Self {
            root_id: Rc::new(Cell::new(root.id())),
            root,
            overlay: None,
            size,
            router: RouterState::default(),
            global_state,
            pool,
            event_queue: VecDeque::new(),
        })
    }

    // --- MARK: TICK
    /// Advance the runtime by one frame.
    ///
    /// In order: queued events are dispatched, spawned tasks are polled until they stall,
    /// nodes with changed state are rebuilt, the tree is laid out if anything changed,
    /// animations advance by `dt`, and the frame is drawn if anything changed.
    ///
    /// A construction error aborts the rebuild of the affected subtree only; the rest of
    /// the tick still runs and the first error is returned.
    pub fn tick(&mut self, dt: Duration) -> Result<(), BuildError> {
        let _span = info_span!("tick", ?dt).entered();
        while let Some(event) = self.event_queue.pop_front() {
            self.handle_input_event(event);
        }
        self.pool.run_until_stalled();

        let result = run_dirty_rebuilds(self);
        restore_router_flags(self);
        if self.global_state.needs_layout {
            run_layout_pass(self);
        }
        run_update_anim_pass(self, dt);
        if self.global_state.needs_render {
            run_paint_pass(self);
        }
        result
    }

    /// Reconcile a new description of the whole tree against the mounted one.
    ///
    /// Layout and drawing happen in the next [`tick`](Self::tick).
    pub fn rebuild(&mut self, tree: impl Into<NewNode>) -> Result<(), BuildError> {
        let result = run_root_rebuild(self, tree.into());
        self.root_id.set(self.root.id());
        restore_router_flags(self);
        self.global_state
            .emit_signal(RenderRootSignal::RequestRedraw);
        result
    }

    /// Rebuild the root whenever `cell` changes.
    ///
    /// This is how application-level state that lives outside the tree drives rebuilds,
    /// typically through [`ForEach::dynamic`](crate::core::ForEach::dynamic) contents.
    pub fn bind_state<T: Clone + PartialEq + 'static>(&mut self, cell: &StateCell<T>) {
        let dirty = Rc::downgrade(&self.global_state.dirty);
        let root_id = self.root_id.clone();
        cell.subscribe(move |name| {
            if let Some(dirty) = dirty.upgrade() {
                trace!("bound state `{name}` changed");
                dirty.mark(root_id.get());
            }
        });
    }

    // --- MARK: MENUS
    /// Show `menu` above the tree, with its top-left corner at `at`.
    ///
    /// The menu replaces any menu already shown. It is hit-tested before the tree, drawn
    /// after it, and dismissed by the next pointer release once that release has been
    /// dispatched. Its nodes resolve like tree nodes, with the menu searched first.
    pub fn show_menu(&mut self, menu: impl Into<NewNode>, at: Point) -> Result<(), BuildError> {
        dismiss_overlay(self);
        let pod = mount_root(&mut self.global_state, menu.into())?;
        debug!("menu {} shown at {at:?}", pod.state.path);
        self.overlay = Some(Overlay { pod, anchor: at });
        self.global_state.needs_layout = true;
        self.global_state.needs_render = true;
        self.global_state
            .emit_signal(RenderRootSignal::RequestRedraw);
        Ok(())
    }

    /// Remove the menu, if one is shown.
    pub fn dismiss_menu(&mut self) {
        dismiss_overlay(self);
        self.request_redraw_if_needed();
    }

    /// Show the menu an event handler asked for.
    fn apply_menu_request(&mut self) {
        if let Some((menu, at)) = self.global_state.menu_request.take() {
            if let Err(err) = self.show_menu(menu, at) {
                warn!("failed to show menu: {err}");
            }
        }
    }

    // --- MARK: EVENTS
    /// Queue an event for the next [`tick`](Self::tick).
    pub fn queue_event(&mut self, event: impl Into<InputEvent>) {
        self.event_queue.push_back(event.into());
    }

    fn handle_input_event(&mut self, event: InputEvent) -> Handled {
        match event {
            InputEvent::Pointer(event) => self.handle_pointer_event(event),
            InputEvent::Text(event) => self.handle_text_event(event),
            InputEvent::Window(event) => self.handle_window_event(event),
        }
    }

    /// Handles a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Handled {
        let handled = run_on_pointer_event_pass(self, &event);
        self.apply_menu_request();
        self.request_redraw_if_needed();
        handled
    }

    /// Handles a key press or release.
    pub fn handle_key_event(&mut self, event: KeyEvent) -> Handled {
        self.handle_text_event(TextEvent::Keyboard(event))
    }

    /// Handles a text event.
    pub fn handle_text_event(&mut self, event: TextEvent) -> Handled {
        let handled = run_on_text_event_pass(self, &event);
        self.apply_menu_request();
        self.request_redraw_if_needed();
        handled
    }

    /// Handles a window event.
    pub fn handle_window_event(&mut self, event: WindowEvent) -> Handled {
        match event {
            WindowEvent::Resize(size) => {
                debug!("window resized to {size:?}");
                self.size = size;
                self.global_state.renderer.resize(size);
            }
            WindowEvent::Rescale(scale_factor) => {
                debug!("scale factor changed to {scale_factor}");
                self.global_state.scale_factor = scale_factor;
                // Resolved styles carry scaled lengths.
                self.global_state.dirty.mark(self.root.id());
            }
        }
        self.global_state.needs_layout = true;
        self.global_state.needs_render = true;
        self.global_state
            .emit_signal(RenderRootSignal::RequestRedraw);
        Handled::Yes
    }

    fn request_redraw_if_needed(&mut self) {
        let state = &mut self.global_state;
        if state.needs_layout || state.needs_render || state.needs_anim || !state.dirty.is_empty()
        {
            state.emit_signal(RenderRootSignal::RequestRedraw);
        }
    }

    // --- MARK: ACCESS
    /// The root node.
    pub fn root_ref(&self) -> NodeRef<'_> {
        NodeRef::new(&self.root)
    }

    /// The root of the menu, if one is shown.
    pub fn menu_ref(&self) -> Option<NodeRef<'_>> {
        self.overlay.as_ref().map(|overlay| NodeRef::new(&overlay.pod))
    }

    /// The node at `path`, if it exists in the menu or the tree.
    pub fn resolve(&self, path: &IdPath) -> Option<NodeRef<'_>> {
        self.resolve_pod(path).map(NodeRef::new)
    }

    /// The node with the given id, if it exists in the menu or the tree.
    pub fn get_node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.layers().find_map(|layer| layer.find(id)).map(NodeRef::new)
    }

    /// The menu, if any, then the tree.
    pub(crate) fn layers(&self) -> impl Iterator<Item = &NodePod> {
        self.overlay
            .iter()
            .map(|overlay| &overlay.pod)
            .chain(std::iter::once(&self.root))
    }

    /// Resolve `path` in the menu first, then in the tree.
    pub(crate) fn resolve_pod(&self, path: &IdPath) -> Option<&NodePod> {
        self.layers().find_map(|layer| layer.resolve(path))
    }

    /// The path of the focused node, as stored by the router.
    ///
    /// The path may no longer resolve.
    pub fn focused_path(&self) -> Option<&IdPath> {
        self.router.focused.as_ref()
    }

    /// The path of the hovered node, as stored by the router.
    pub fn hovered_path(&self) -> Option<&IdPath> {
        self.router.hovered.as_ref()
    }

    /// The window size, in backend pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Whether a tick would do work beyond advancing animations.
    pub fn needs_tick(&self) -> bool {
        let state = &self.global_state;
        state.needs_layout
            || state.needs_render
            || state.needs_anim
            || state.scheduler.is_active()
            || !state.dirty.is_empty()
            || !self.event_queue.is_empty()
    }

    /// Log the tree with identity paths and frames at DEBUG, and return the dump.
    pub fn dump(&self) -> String {
        let dump = self.root_ref().to_string();
        debug!("tree:\n{dump}");
        dump
    }
}

impl fmt::Debug for RenderRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderRoot")
            .field("size", &self.size)
            .field("router", &self.router)
            .field("root", &self.root)
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}

impl RenderRootState {
    /// Sends a signal to the platform layer.
    pub(crate) fn emit_signal(&mut self, signal: RenderRootSignal) {
        (self.signal_sink)(signal);
    }
}
