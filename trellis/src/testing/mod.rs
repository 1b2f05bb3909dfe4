// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Helper tools for writing tests: a headless backend, a test harness and helper nodes.

mod harness;
mod headless;
mod helper_nodes;

pub use harness::{HARNESS_DEFAULT_SIZE, TestHarness};
pub use headless::{
    DrawCommand, DrawLog, GLYPH_ADVANCE, HeadlessRenderer, LINE_HEIGHT, TextureDrawable,
};
pub use helper_nodes::{ModularNode, Record, Recorder, Recording, TestNodeExt};
