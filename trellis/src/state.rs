// Copyright 2024 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Reactive state cells.
//!
//! A state cell is a named, typed slot attached to one node instance. The first access
//! materializes the default value; every write that changes the value invokes the cell's
//! dirty callbacks, which only mark the owning node as needing a rebuild. Nothing is
//! rebuilt or rendered synchronously: the next [tick](crate::app::RenderRoot::tick) does it.
//!
//! Cells are cheap handles (`Rc`), so they can be captured by action callbacks and by tasks
//! spawned from lifecycle notifications. When reconciliation discards the owning node,
//! its cells are detached: later writes still store the value but reach no tree.

use std::any::{Any, type_name};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;
use tracing::trace;

use crate::core::NodeId;

/// Errors raised by state cell access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A cell was accessed or assigned with a kind different from the one it holds.
    TypeMismatch {
        /// Name of the cell.
        name: &'static str,
        /// Type the cell was created with.
        expected: &'static str,
        /// Type of the access or assignment.
        found: &'static str,
    },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch {
                name,
                expected,
                found,
            } => write!(f, "state `{name}` must be of type {expected} (got {found})"),
        }
    }
}

impl std::error::Error for StateError {}

/// Callback invoked with the cell name when a cell's value changes.
pub(crate) type DirtyCallback = Rc<dyn Fn(&'static str)>;

struct Slot<T> {
    name: &'static str,
    value: RefCell<T>,
    attached: Cell<bool>,
    observers: RefCell<Vec<DirtyCallback>>,
}

impl<T> Slot<T> {
    fn notify(&self) {
        // Cloned so that a callback may register or read cells without a borrow conflict.
        let observers = self.observers.borrow().clone();
        for observer in observers {
            observer(self.name);
        }
    }
}

trait ErasedSlot {
    fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
    fn value_type_name(&self) -> &'static str;
    fn detach(&self);
    fn set_boxed(&self, value: Box<dyn Any>) -> Result<(), StateError>;
}

impl<T: Clone + PartialEq + 'static> ErasedSlot for Slot<T> {
    fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn detach(&self) {
        self.attached.set(false);
        self.observers.borrow_mut().clear();
    }

    fn set_boxed(&self, value: Box<dyn Any>) -> Result<(), StateError> {
        match value.downcast::<T>() {
            Ok(value) => {
                store(self, *value);
                Ok(())
            }
            Err(_) => Err(StateError::TypeMismatch {
                name: self.name,
                expected: type_name::<T>(),
                found: "a value of another type",
            }),
        }
    }
}

fn store<T: PartialEq>(slot: &Slot<T>, value: T) {
    let changed = {
        let mut current = slot.value.borrow_mut();
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    };
    if changed {
        slot.notify();
    }
}

/// A typed handle to a node's state slot.
///
/// Obtained from [`BuildCtx::state`](crate::core::BuildCtx::state) (or the same method on
/// the other contexts). Cloning the handle does not clone the value.
pub struct StateCell<T> {
    slot: Rc<Slot<T>>,
    marker: PhantomData<fn() -> T>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            marker: PhantomData,
        }
    }
}

impl<T: Clone + PartialEq + 'static> StateCell<T> {
    /// A detached cell holding `value`.
    ///
    /// Writes to it notify nobody. Useful as a default binding and in tests.
    pub fn detached(value: T) -> Self {
        Self {
            slot: Rc::new(Slot {
                name: "detached",
                value: RefCell::new(value),
                attached: Cell::new(false),
                observers: RefCell::default(),
            }),
            marker: PhantomData,
        }
    }

    /// The cell's name.
    pub fn name(&self) -> &'static str {
        self.slot.name
    }

    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.slot.value.borrow().clone()
    }

    /// Run `f` with a reference to the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.value.borrow())
    }

    /// Replace the value.
    ///
    /// Writing a value equal to the current one is a no-op and notifies nobody.
    pub fn set(&self, value: T) {
        store(&self.slot, value);
    }

    /// Modify a copy of the value with `f` and write it back.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// Whether the owning node is still part of a tree.
    pub fn is_attached(&self) -> bool {
        self.slot.attached.get()
    }

    /// Register an additional dirty callback.
    pub fn subscribe(&self, callback: impl Fn(&'static str) + 'static) {
        self.slot.observers.borrow_mut().push(Rc::new(callback));
    }

    /// Whether both handles point to the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<T: fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("name", &self.slot.name)
            .field("value", &self.slot.value.borrow())
            .field("attached", &self.slot.attached.get())
            .finish()
    }
}

/// An untyped handle to a state slot, for callers that only know the cell's name.
///
/// Assignments are type-checked at runtime.
#[derive(Clone)]
pub struct UntypedCell {
    name: &'static str,
    slot: Rc<dyn ErasedSlot>,
}

impl UntypedCell {
    /// The cell's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type the cell was created with.
    pub fn value_type_name(&self) -> &'static str {
        self.slot.value_type_name()
    }

    /// Assign a value, failing with [`StateError::TypeMismatch`] if its type is wrong.
    pub fn set<T: Any>(&self, value: T) -> Result<(), StateError> {
        self.slot
            .set_boxed(Box::new(value))
            .map_err(|_| StateError::TypeMismatch {
                name: self.name,
                expected: self.slot.value_type_name(),
                found: type_name::<T>(),
            })
    }

    /// Recover the typed handle.
    pub fn typed<T: Clone + PartialEq + 'static>(&self) -> Result<StateCell<T>, StateError> {
        downcast_slot(self.name, self.slot.clone())
    }
}

impl fmt::Debug for UntypedCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UntypedCell")
            .field("name", &self.name)
            .field("type", &self.slot.value_type_name())
            .finish()
    }
}

fn downcast_slot<T: Clone + PartialEq + 'static>(
    name: &'static str,
    slot: Rc<dyn ErasedSlot>,
) -> Result<StateCell<T>, StateError> {
    let expected = slot.value_type_name();
    match slot.as_any_rc().downcast::<Slot<T>>() {
        Ok(slot) => Ok(StateCell {
            slot,
            marker: PhantomData,
        }),
        Err(_) => Err(StateError::TypeMismatch {
            name,
            expected,
            found: type_name::<T>(),
        }),
    }
}

/// The state slots of one node instance.
#[derive(Default)]
pub(crate) struct StateCells {
    slots: HashMap<&'static str, Rc<dyn ErasedSlot>>,
}

impl StateCells {
    /// Get the cell called `name`, creating it with `default` on first access.
    ///
    /// `observer` is only called, and its callback only registered, when the cell is created.
    pub(crate) fn get_or_create<T: Clone + PartialEq + 'static>(
        &mut self,
        name: &'static str,
        default: impl FnOnce() -> T,
        observer: impl FnOnce() -> DirtyCallback,
    ) -> Result<StateCell<T>, StateError> {
        if let Some(slot) = self.slots.get(name) {
            return downcast_slot(name, slot.clone());
        }
        let slot = Rc::new(Slot {
            name,
            value: RefCell::new(default()),
            attached: Cell::new(true),
            observers: RefCell::new(vec![observer()]),
        });
        self.slots.insert(name, slot.clone());
        Ok(StateCell {
            slot,
            marker: PhantomData,
        })
    }

    /// The existing cell called `name`, if any.
    pub(crate) fn get<T: Clone + PartialEq + 'static>(
        &self,
        name: &'static str,
    ) -> Option<Result<StateCell<T>, StateError>> {
        let slot = self.slots.get(name)?;
        Some(downcast_slot(name, slot.clone()))
    }

    pub(crate) fn untyped(&self, name: &'static str) -> Option<UntypedCell> {
        self.slots.get(name).map(|slot| UntypedCell {
            name,
            slot: slot.clone(),
        })
    }

    /// Cut every cell off from its owner.
    pub(crate) fn detach(&mut self) {
        for slot in self.slots.values() {
            slot.detach();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}

impl fmt::Debug for StateCells {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.slots
                    .iter()
                    .map(|(name, slot)| (name, slot.value_type_name())),
            )
            .finish()
    }
}

/// Nodes whose state changed since the last rebuild.
#[derive(Debug, Default)]
pub(crate) struct DirtyQueue {
    nodes: RefCell<Vec<NodeId>>,
}

impl DirtyQueue {
    pub(crate) fn mark(&self, id: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if !nodes.contains(&id) {
            nodes.push(id);
        }
    }

    pub(crate) fn take(&self) -> Vec<NodeId> {
        std::mem::take(&mut *self.nodes.borrow_mut())
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }
}

/// The callback a node registers on the cells it owns.
pub(crate) fn dirty_callback(queue: &Rc<DirtyQueue>, id: NodeId) -> DirtyCallback {
    let queue: Weak<DirtyQueue> = Rc::downgrade(queue);
    Rc::new(move |name| {
        if let Some(queue) = queue.upgrade() {
            trace!("state `{name}` of {id} changed");
            queue.mark(id);
        }
    })
}
