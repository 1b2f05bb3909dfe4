// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Common node types.
//!
//! Containers ([`Group`], [`Stack`], [`Grid`], [`ScrollView`]) lay out whatever contents
//! they are given; the other types are leaves or synthesize their own children. A
//! [`Picker`] shows its options in a [`Menu`] above the tree.

mod button;
mod grid;
mod group;
mod image;
mod list;
mod picker;
mod progress_bar;
mod rectangle;
mod scroll_view;
mod slider;
mod spacer;
mod spinner;
mod stack;
mod tab_view;
mod text;
mod text_field;

pub use button::Button;
pub use grid::Grid;
pub use group::Group;
pub use image::{Image, ImageSizing};
pub use list::{List, ListItem};
pub use picker::{Menu, MenuItem, Picker};
pub use progress_bar::ProgressBar;
pub use rectangle::{Length, Rectangle};
pub use scroll_view::ScrollView;
pub use slider::Slider;
pub use spacer::Spacer;
pub use spinner::Spinner;
pub use stack::Stack;
pub use tab_view::TabView;
pub use text::Text;
pub use text_field::TextField;
