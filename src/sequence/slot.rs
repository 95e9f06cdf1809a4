//! Scan-scoped capture cells correlating non-adjacent tokens.
//!
//! A pattern that needs "the label jumped to here must reappear there"
//! allocates a slot, hands the write half to the earlier predicate and the
//! read half to the later one. The cell's value lives in the scan's
//! [`Context`](super::Context), so one slot can be shared by a compiled
//! pattern across any number of concurrent scans.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::bytecode::LabelId;

/// Values a slot can hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotValue {
    Flag(bool),
    Index(usize),
    Label(LabelId),
}

/// Types storable in a capture slot.
pub trait SlotType: Copy {
    fn into_value(self) -> SlotValue;
    fn from_value(value: SlotValue) -> Option<Self>;
}

impl SlotType for bool {
    fn into_value(self) -> SlotValue {
        SlotValue::Flag(self)
    }

    fn from_value(value: SlotValue) -> Option<Self> {
        match value {
            SlotValue::Flag(flag) => Some(flag),
            _ => None,
        }
    }
}

impl SlotType for usize {
    fn into_value(self) -> SlotValue {
        SlotValue::Index(self)
    }

    fn from_value(value: SlotValue) -> Option<Self> {
        match value {
            SlotValue::Index(index) => Some(index),
            _ => None,
        }
    }
}

impl SlotType for LabelId {
    fn into_value(self) -> SlotValue {
        SlotValue::Label(self)
    }

    fn from_value(value: SlotValue) -> Option<Self> {
        match value {
            SlotValue::Label(label) => Some(label),
            _ => None,
        }
    }
}

static NEXT_KEY: AtomicU32 = AtomicU32::new(0);

/// A typed capture cell with a process-unique key.
///
/// The slot itself stores nothing; bindings live in the per-scan context.
pub struct Slot<T> {
    key: u32,
    _type: PhantomData<fn() -> T>,
}

impl<T: SlotType> Slot<T> {
    /// Allocate a slot distinct from every other slot in the process.
    pub fn create() -> Self {
        Self {
            key: NEXT_KEY.fetch_add(1, Ordering::Relaxed),
            _type: PhantomData,
        }
    }

    /// The read capability for this slot.
    pub fn read(&self) -> SlotRead<T> {
        SlotRead {
            key: self.key,
            _type: PhantomData,
        }
    }

    /// The write capability for this slot.
    pub fn write(&self) -> SlotWrite<T> {
        SlotWrite {
            key: self.key,
            _type: PhantomData,
        }
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({})", self.key)
    }
}

/// Read half of a [`Slot`].
pub struct SlotRead<T> {
    key: u32,
    _type: PhantomData<fn() -> T>,
}

impl<T> SlotRead<T> {
    pub(crate) fn key(&self) -> u32 {
        self.key
    }
}

impl<T> Clone for SlotRead<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SlotRead<T> {}

impl<T> fmt::Debug for SlotRead<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotRead({})", self.key)
    }
}

/// Write half of a [`Slot`].
pub struct SlotWrite<T> {
    key: u32,
    _type: PhantomData<fn() -> T>,
}

impl<T> SlotWrite<T> {
    pub(crate) fn key(&self) -> u32 {
        self.key
    }
}

impl<T> Clone for SlotWrite<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SlotWrite<T> {}

impl<T> fmt::Debug for SlotWrite<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotWrite({})", self.key)
    }
}
