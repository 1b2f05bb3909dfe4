// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Trellis is a declarative, retained-mode UI runtime.
//!
//! Applications describe a tree of node descriptors whose shape depends on
//! observable application state. The runtime:
//!
//! - reconciles each new description against the previous frame's tree by *identity path*,
//!   keeping node instances (and their [state cells](state::StateCell)) alive when they can be reused;
//! - lays the tree out with a two-pass algorithm, serving stack children by [priority](geometry::Priority);
//! - animates the geometry of reused nodes whose frame changed;
//! - routes pointer, keyboard and text input into the tree, tracking the pressed, hovered
//!   and focused nodes by path so that rebuilds never leave dangling references.
//!
//! The windowing layer, the rasterizer and the asset loader are collaborators behind the
//! traits of the [`backend`] module.
//!
//! ```
//! use trellis::app::{RenderRoot, RenderRootOptions};
//! use trellis::core::NodeExt;
//! use trellis::geometry::Priority;
//! use trellis::nodes::{Stack, Text};
//! use trellis::style::StyleExt;
//! use trellis::testing::HeadlessRenderer;
//!
//! let tree = Stack::horizontal()
//!     .with_child(Text::new("A"))
//!     .with_child(Text::new("B").priority(Priority::High))
//!     .spacing(5.0);
//! let options = RenderRootOptions::default();
//! let mut root = RenderRoot::new(tree, HeadlessRenderer::new(), |_| {}, options).unwrap();
//! root.tick(std::time::Duration::ZERO).unwrap();
//! assert_eq!(root.root_ref().layout_rect().width(), 25.0);
//! ```
//!
//! # Tracing
//!
//! Every pass opens a [`tracing`] span. Use [`app::try_init_tracing`] to install a default
//! subscriber, and the `TRELLIS_TRACE_PASSES` environment variable to control per-node spans.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![expect(clippy::cast_possible_truncation, reason = "Deferred: Noisy")]

pub use {kurbo, peniko};

#[macro_use]
pub mod util;

mod passes;

pub mod anim;
pub mod app;
pub mod backend;
pub mod core;
pub mod geometry;
pub mod layout;
pub mod nodes;
pub mod state;
pub mod style;
pub mod testing;

#[cfg(test)]
mod tests;
