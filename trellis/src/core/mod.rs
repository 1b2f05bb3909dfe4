// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Basic types and traits Trellis is built on.

mod contexts;
mod error;
mod events;
mod identity;
mod new_node;
mod node;
mod node_pod;
mod node_ref;
mod node_state;

pub use contexts::{BuildCtx, EventCtx, LayoutCtx, LifecycleCtx, PaintCtx, PlaceCtx, UpdateCtx};
pub use error::BuildError;
pub use events::{
    Handled, InputEvent, KeyEvent, Lifecycle, PointerButton, PointerEvent, TextEvent, Update,
    WindowEvent,
};
pub use identity::{IdPath, PathSegment};
pub use new_node::{Content, ForEach, NewNode, NodeExt, NodeOptions, expand_contents};
pub use node::{CloneNode, Node, NodeId};
pub use node_ref::NodeRef;

pub use keyboard_types::{Key, KeyState, Modifiers};

pub(crate) use node_pod::NodePod;
pub(crate) use node_state::NodeState;
