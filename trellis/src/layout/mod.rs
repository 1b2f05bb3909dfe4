// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Layout algorithms shared by container nodes.
//!
//! Layout runs in two passes. The *resize* pass walks the tree top-down offering each node
//! an available size, and each node answers bottom-up with the size it takes. The
//! *reposition* pass then walks the tree again with the rectangle each node was assigned,
//! and each node returns its origin after placing its children.
//!
//! Nodes reach their children through [`LayoutCtx`](crate::core::LayoutCtx) and
//! [`PlaceCtx`](crate::core::PlaceCtx) by index, so the functions of this module can be
//! called from any node type's [`resize`](crate::core::Node::resize) and
//! [`reposition`](crate::core::Node::reposition).

pub mod grid;
pub mod overlay;
pub mod scroll;
pub mod stack;

pub use grid::GridLayout;
pub use scroll::ScrollLayout;
