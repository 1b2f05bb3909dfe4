// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Types needed for running a Trellis tree.

mod render_root;
mod tracing_backend;

pub use render_root::{LifecycleRecord, RenderRoot, RenderRootOptions, RenderRootSignal};
pub use tracing_backend::{
    TracingSubscriberHasBeenSetError, try_init_test_tracing, try_init_tracing,
};

pub(crate) use render_root::RenderRootState;
