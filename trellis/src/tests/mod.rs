// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Tests of the passes and their interplay, written against the node library.

mod event;
mod rebuild;
mod state;
