// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Events.

use keyboard_types::{Key, KeyState, Modifiers};
use kurbo::{Point, Size, Vec2};

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Usually the left button.
    #[default]
    Primary,
    /// Usually the right button.
    Secondary,
    /// Usually the wheel button.
    Auxiliary,
}

/// A pointer event, in window coordinates already scaled to backend pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// A button was pressed.
    Down {
        /// Pointer position.
        pos: Point,
        /// The pressed button.
        button: PointerButton,
    },
    /// A button was released.
    Up {
        /// Pointer position.
        pos: Point,
        /// The released button.
        button: PointerButton,
    },
    /// The pointer moved.
    Move {
        /// Pointer position.
        pos: Point,
    },
    /// A press and release on the same node.
    ///
    /// Synthesized by the router, never delivered by the platform.
    Click {
        /// Position of the release.
        pos: Point,
    },
    /// The wheel was turned.
    Wheel {
        /// Pointer position.
        pos: Point,
        /// Wheel movement in notches, positive downwards.
        delta: Vec2,
    },
}

impl PointerEvent {
    /// The position attached to the event.
    pub fn position(&self) -> Point {
        match self {
            Self::Down { pos, .. }
            | Self::Up { pos, .. }
            | Self::Move { pos }
            | Self::Click { pos }
            | Self::Wheel { pos, .. } => *pos,
        }
    }

    /// Short name for logs.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Down { .. } => "Down",
            Self::Up { .. } => "Up",
            Self::Move { .. } => "Move",
            Self::Click { .. } => "Click",
            Self::Wheel { .. } => "Wheel",
        }
    }
}

/// A key press or release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The logical key.
    pub key: Key,
    /// Modifiers held during the event.
    pub modifiers: Modifiers,
    /// Press or release.
    pub state: KeyState,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub fn down(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            state: KeyState::Down,
        }
    }

    /// A key release without modifiers.
    pub fn up(key: Key) -> Self {
        Self {
            state: KeyState::Up,
            ..Self::down(key)
        }
    }

    /// Builder-style method to set the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this is a press of the Tab key.
    pub fn is_tab(&self) -> bool {
        self.state == KeyState::Down && self.key == Key::Tab
    }

    /// Whether Shift was held.
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Whether this is a press of the space bar.
    pub fn is_space(&self) -> bool {
        self.state == KeyState::Down && matches!(&self.key, Key::Character(c) if c == " ")
    }
}

/// Keyboard and text input, routed to the focused node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEvent {
    /// A key press or release.
    Keyboard(KeyEvent),
    /// Text typed or pasted by the user.
    Insert(String),
}

impl TextEvent {
    /// Short name for logs.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Keyboard(_) => "Keyboard",
            Self::Insert(_) => "Insert",
        }
    }
}

/// Changes to the status of a node, generated by the router and the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// The node gained or lost focus.
    FocusChanged(bool),
    /// The pointer entered or left the node.
    HoveredChanged(bool),
    /// The node became disabled or enabled.
    DisabledChanged(bool),
}

/// Reconciliation notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// A fresh node entered the tree.
    Mounted,
    /// An existing node was reused by a rebuild.
    Updated,
    /// A node left the tree.
    Removed,
}

/// Whether an event was consumed by the node it was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handled {
    /// The event was consumed.
    Yes,
    /// The event was ignored.
    #[default]
    No,
}

impl Handled {
    /// Returns `true` for [`Handled::Yes`].
    pub fn is_handled(self) -> bool {
        self == Self::Yes
    }
}

impl From<bool> for Handled {
    fn from(handled: bool) -> Self {
        if handled { Self::Yes } else { Self::No }
    }
}

/// Changes to the window hosting the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    /// The window's drawable area changed, in backend pixels.
    Resize(Size),
    /// The scale factor changed.
    Rescale(f64),
}

/// Any input accepted by the event queue of a [`RenderRoot`](crate::app::RenderRoot).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer input.
    Pointer(PointerEvent),
    /// Keyboard or text input.
    Text(TextEvent),
    /// Window changes.
    Window(WindowEvent),
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

impl From<TextEvent> for InputEvent {
    fn from(event: TextEvent) -> Self {
        Self::Text(event)
    }
}

impl From<WindowEvent> for InputEvent {
    fn from(event: WindowEvent) -> Self {
        Self::Window(event)
    }
}
