// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The context types that are passed into various node methods.

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures::task::LocalSpawnExt;
use kurbo::{Point, Rect, Size};
use tracing::{trace, warn};

use crate::app::RenderRootState;
use crate::backend::{Drawable, Primitive, Renderer};
use crate::core::{IdPath, NewNode, NodeId, NodePod, NodeState};
use crate::geometry::Axis;
use crate::passes::layout::{minimum_pod, reposition_pod, resize_pod};
use crate::state::{StateCell, StateError, dirty_callback};
use crate::style::ResolvedStyle;

// Note - Most methods defined in this file revolve around `NodeState` fields.
// Consider reading `NodeState` documentation (especially the documented naming scheme)
// before editing context method code.

/// A macro for implementing methods on multiple contexts.
///
/// There are a lot of methods defined on multiple contexts; this lets us only
/// have to write them out once.
macro_rules! impl_context_method {
    ($ty:ty,  { $($method:item)+ } ) => {
        impl $ty { $($method)+ }
    };
    ( $ty:ty, $($more:ty),+, { $($method:item)+ } ) => {
        impl_context_method!($ty, { $($method)+ });
        impl_context_method!($($more),+, { $($method)+ });
    };
}

/// A context provided to [`Node::children`](crate::core::Node::children).
pub struct BuildCtx<'a> {
    pub(crate) global_state: &'a mut RenderRootState,
    pub(crate) node_state: &'a mut NodeState,
}

/// A context provided to [`Node::lifecycle`](crate::core::Node::lifecycle).
pub struct LifecycleCtx<'a> {
    pub(crate) global_state: &'a mut RenderRootState,
    pub(crate) node_state: &'a mut NodeState,
}

/// A context provided to event-handling node methods.
pub struct EventCtx<'a> {
    pub(crate) global_state: &'a mut RenderRootState,
    pub(crate) node_state: &'a mut NodeState,
}

/// A context provided to [`Node::update`](crate::core::Node::update) and
/// [`Node::on_anim_frame`](crate::core::Node::on_anim_frame).
pub struct UpdateCtx<'a> {
    pub(crate) global_state: &'a mut RenderRootState,
    pub(crate) node_state: &'a mut NodeState,
}

/// A context provided to the resize pass methods.
pub struct LayoutCtx<'a> {
    pub(crate) global_state: &'a mut RenderRootState,
    pub(crate) node_state: &'a mut NodeState,
    pub(crate) children: &'a mut [NodePod],
    pub(crate) parent_axis: Option<Axis>,
    pub(crate) child_axis: Option<Axis>,
}

/// A context provided to [`Node::reposition`](crate::core::Node::reposition).
pub struct PlaceCtx<'a> {
    pub(crate) global_state: &'a mut RenderRootState,
    pub(crate) node_state: &'a mut NodeState,
    pub(crate) children: &'a mut [NodePod],
}

/// A context passed to the paint methods.
pub struct PaintCtx<'a> {
    pub(crate) global_state: &'a mut RenderRootState,
    pub(crate) node_state: &'a NodeState,
}

macro_rules! impl_context_debug {
    ($($ty:ident),+) => {
        $(
            impl fmt::Debug for $ty<'_> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($ty))
                        .field("node", &self.node_state.path)
                        .finish_non_exhaustive()
                }
            }
        )+
    };
}

impl_context_debug!(
    BuildCtx,
    LifecycleCtx,
    EventCtx,
    UpdateCtx,
    LayoutCtx,
    PlaceCtx,
    PaintCtx
);

// --- MARK: GETTERS
// Methods for all context types
impl_context_method!(
    BuildCtx<'_>,
    LifecycleCtx<'_>,
    EventCtx<'_>,
    UpdateCtx<'_>,
    LayoutCtx<'_>,
    PlaceCtx<'_>,
    PaintCtx<'_>,
    {
        /// The `NodeId` of the current node.
        pub fn node_id(&self) -> NodeId {
            self.node_state.id
        }

        /// The identity path of the current node.
        pub fn path(&self) -> &IdPath {
            &self.node_state.path
        }

        /// The resolved style of the current node.
        pub fn style(&self) -> &ResolvedStyle {
            &self.node_state.style
        }

        /// The resolved scale factor.
        pub fn scale(&self) -> f64 {
            self.node_state.style.scale
        }

        /// The frame the node is currently rendered with.
        ///
        /// During the reposition pass this is still the previous frame.
        pub fn frame(&self) -> Rect {
            self.node_state.frame
        }

        /// The frame minus padding and border.
        pub fn inner_rect(&self) -> Rect {
            self.node_state.inner_rect()
        }

        /// Whether the node or an ancestor is disabled.
        pub fn is_disabled(&self) -> bool {
            self.node_state.is_disabled
        }

        /// Whether the node has focus.
        pub fn is_focused(&self) -> bool {
            self.node_state.is_focused
        }

        /// Whether the pointer is over the node.
        pub fn is_hovered(&self) -> bool {
            self.node_state.is_hovered
        }
    }
);

// --- MARK: STATE
impl_context_method!(
    BuildCtx<'_>,
    LifecycleCtx<'_>,
    EventCtx<'_>,
    UpdateCtx<'_>,
    {
        /// Get the state cell called `name`, creating it with `default` on first access.
        ///
        /// The cell belongs to the current node instance and survives as long as
        /// reconciliation reuses it. Writing a new value schedules a rebuild of the node for
        /// the next tick.
        pub fn state<T: Clone + PartialEq + 'static>(
            &mut self,
            name: &'static str,
            default: impl FnOnce() -> T,
        ) -> Result<StateCell<T>, StateError> {
            let id = self.node_state.id;
            let dirty = self.global_state.dirty.clone();
            self.node_state
                .cells
                .get_or_create(name, default, move || dirty_callback(&dirty, id))
        }
    }
);

impl_context_method!(LifecycleCtx<'_>, EventCtx<'_>, UpdateCtx<'_>, {
    /// Rebuild the current node whenever `cell` changes.
    ///
    /// Use this for cells the node does not own, such as a cell passed in by the
    /// application. The subscription lasts as long as the cell. Once the node is gone,
    /// notifications mark an id that no longer exists and are ignored.
    pub fn watch<T: Clone + PartialEq + 'static>(&mut self, cell: &StateCell<T>) {
        let callback = dirty_callback(&self.global_state.dirty, self.node_state.id);
        cell.subscribe(move |name| callback(name));
    }
});

// --- MARK: TASKS
impl_context_method!(LifecycleCtx<'_>, EventCtx<'_>, UpdateCtx<'_>, {
    /// Run a future on the single-threaded task pool.
    ///
    /// The pool is polled at the start of every tick. The task is never cancelled: when
    /// the node is removed in the meantime, its state cells are detached and writes to
    /// them have no effect on the tree.
    pub fn spawn(&mut self, task: impl Future<Output = ()> + 'static) {
        if let Err(err) = self.global_state.spawner.spawn_local(task) {
            warn!("failed to spawn task for {}: {err}", self.node_state.path);
        }
    }
});

// --- MARK: MENUS
impl EventCtx<'_> {
    /// Show `menu` above the tree with its top-left corner at `at`, once the current event
    /// has been dispatched.
    ///
    /// See [`RenderRoot::show_menu`](crate::app::RenderRoot::show_menu).
    pub fn show_menu(&mut self, menu: impl Into<NewNode>, at: Point) {
        trace!("show_menu at {at:?}");
        self.global_state.menu_request = Some((menu.into(), at));
    }
}

// --- MARK: UPDATE FLAGS
impl_context_method!(LifecycleCtx<'_>, EventCtx<'_>, UpdateCtx<'_>, {
    /// Requests a paint pass.
    pub fn request_render(&mut self) {
        trace!("request_render");
        self.global_state.needs_render = true;
    }

    /// Requests a layout pass, which is followed by a paint pass.
    pub fn request_layout(&mut self) {
        trace!("request_layout");
        self.global_state.needs_layout = true;
        self.global_state.needs_render = true;
    }

    /// Requests a rebuild of the current node on the next tick.
    pub fn request_rebuild(&mut self) {
        trace!("request_rebuild");
        self.global_state.dirty.mark(self.node_state.id);
    }

    /// Requests an animation frame.
    ///
    /// [`Node::on_anim_frame`](crate::core::Node::on_anim_frame) is called on the next
    /// tick, and must request another frame to keep animating.
    pub fn request_anim_frame(&mut self) {
        trace!("request_anim_frame");
        self.node_state.request_anim = true;
        self.global_state.needs_anim = true;
    }
});

// --- MARK: LAYOUT
impl LayoutCtx<'_> {
    /// Number of resolved children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// The resolved style of the child at `index`.
    #[track_caller]
    pub fn child_style(&self, index: usize) -> &ResolvedStyle {
        &self.children[index].state.style
    }

    /// Minimum size of the child at `index`, including its padding and border.
    #[track_caller]
    pub fn child_minimum(&mut self, index: usize) -> Size {
        let axis = self.child_axis;
        match self.children.get_mut(index) {
            Some(child) => minimum_pod(self.global_state, child, axis),
            None => {
                debug_panic!("child_minimum: no child at index {index}");
                Size::ZERO
            }
        }
    }

    /// Run the resize pass on the child at `index` and return the size it chose.
    #[track_caller]
    pub fn resize_child(&mut self, index: usize, available: Size) -> Size {
        let axis = self.child_axis;
        match self.children.get_mut(index) {
            Some(child) => resize_pod(self.global_state, child, available, axis),
            None => {
                debug_panic!("resize_child: no child at index {index}");
                Size::ZERO
            }
        }
    }

    /// The size the child at `index` chose during its last resize.
    #[track_caller]
    pub fn child_size(&self, index: usize) -> Size {
        self.children[index].state.size
    }

    /// Set the axis children see as their parent axis.
    ///
    /// Stacks set their own axis so that spacers know which way to grow.
    pub fn set_child_axis(&mut self, axis: Option<Axis>) {
        self.child_axis = axis;
    }

    /// The layout axis of the enclosing stack, if any.
    pub fn parent_axis(&self) -> Option<Axis> {
        self.parent_axis
    }

    /// Measure `text` with the node's font and line limit.
    pub fn measure_text(&mut self, text: &str, max_width: Option<f64>) -> Size {
        let style = &self.node_state.style;
        self.global_state
            .renderer
            .measure_text(text, &style.font, max_width, style.lines)
    }

    /// Look up a drawable.
    pub fn load_asset(&mut self, name: &str) -> Option<Rc<dyn Drawable>> {
        self.global_state.assets.load_asset(name)
    }
}

impl PlaceCtx<'_> {
    /// Number of resolved children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// The resolved style of the child at `index`.
    #[track_caller]
    pub fn child_style(&self, index: usize) -> &ResolvedStyle {
        &self.children[index].state.style
    }

    /// The size the child at `index` chose during the resize pass.
    #[track_caller]
    pub fn child_size(&self, index: usize) -> Size {
        self.children[index].state.size
    }

    /// The size the current node chose during the resize pass.
    pub fn size(&self) -> Size {
        self.node_state.size
    }

    /// Run the reposition pass on the child at `index` with the rectangle `inside`.
    #[track_caller]
    pub fn place_child(&mut self, index: usize, inside: Rect) {
        match self.children.get_mut(index) {
            Some(child) => reposition_pod(self.global_state, child, inside),
            None => debug_panic!("place_child: no child at index {index}"),
        }
    }
}

// --- MARK: PAINT
impl PaintCtx<'_> {
    /// The renderer.
    pub fn renderer(&mut self) -> &mut dyn Renderer {
        &mut *self.global_state.renderer
    }

    /// Draw a primitive with the node's style into `frame`.
    pub fn draw(&mut self, primitive: &Primitive<'_>, frame: Rect) {
        self.global_state
            .renderer
            .draw(primitive, frame, &self.node_state.style);
    }

    /// Fill the frame with the background colour, if the style has one.
    pub fn fill_background(&mut self) {
        if let Some(background) = self.node_state.style.background {
            let frame = self.node_state.frame;
            self.draw(&Primitive::Fill(background), frame);
        }
    }

    /// Draw `text` into `frame`.
    pub fn draw_text(&mut self, text: &str, frame: Rect) {
        self.draw(&Primitive::Text(text), frame);
    }

    /// Look up a drawable.
    pub fn load_asset(&mut self, name: &str) -> Option<Rc<dyn Drawable>> {
        self.global_state.assets.load_asset(name)
    }

    /// Draw the named asset into `frame` with the node's opacity.
    ///
    /// Returns `false`, drawing nothing, when the asset is missing.
    pub fn draw_asset(&mut self, name: &str, frame: Rect) -> bool {
        match self.load_asset(name) {
            Some(drawable) => {
                self.draw_drawable(&*drawable, frame);
                true
            }
            None => false,
        }
    }

    /// Draw a drawable into `frame` with the node's opacity and scale.
    pub fn draw_drawable(&mut self, drawable: &dyn Drawable, frame: Rect) {
        let style = &self.node_state.style;
        drawable.render(
            &mut *self.global_state.renderer,
            frame,
            style.opacity,
            style.scale,
        );
    }
}
