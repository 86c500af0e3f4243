//! Slot handles.
//!
//! A [`SlotHandle`] names one allocation: the slot index plus the
//! generation the slot had when the allocation was made. The generation
//! makes staleness checks O(1) without any lookup table.

use std::fmt;

use tether_core::{Generation, SlotIndex};

/// Identifies one allocation inside a [`SlotArena`](crate::SlotArena).
///
/// Handles are plain values: copying one never touches the slot's
/// reference count. The empty handle ([`SlotHandle::EMPTY`]) has
/// generation [`Generation::EMPTY`] and never resolves to a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    /// Generation of the slot at allocation time.
    pub(crate) generation: Generation,
    /// Position in the slot table.
    pub(crate) index: SlotIndex,
}

impl SlotHandle {
    /// The handle that refers to nothing.
    pub const EMPTY: SlotHandle = SlotHandle {
        generation: Generation::EMPTY,
        index: SlotIndex(0),
    };

    pub(crate) fn new(generation: Generation, index: SlotIndex) -> Self {
        Self { generation, index }
    }

    /// The generation this handle was minted with.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The slot this handle points into.
    pub fn index(&self) -> SlotIndex {
        self.index
    }

    /// Whether this is the empty handle.
    pub fn is_empty(&self) -> bool {
        self.generation.is_empty()
    }
}

impl Default for SlotHandle {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for SlotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "SlotHandle(empty)")
        } else {
            write!(f, "SlotHandle(gen={}, idx={})", self.generation, self.index)
        }
    }
}
