//! Strongly-typed slot identifiers.

use std::fmt;

/// Per-slot allocation counter used to detect stale handles.
///
/// Every allocation into a slot bumps its generation, so a handle minted
/// for an earlier occupant never matches the current one. Generation `0`
/// is reserved as [`Generation::EMPTY`] and marks a handle that refers to
/// no slot at all.
///
/// The counter is 64 bits wide. Reusing a single slot once per nanosecond
/// would take roughly 584 years to exhaust it; [`Generation::next`] panics
/// rather than wrap back into `EMPTY`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// Sentinel for "no callable". Never assigned to a live slot.
    pub const EMPTY: Generation = Generation(0);

    /// Whether this is the empty sentinel.
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// The generation following this one.
    ///
    /// # Panics
    ///
    /// Panics if the counter would overflow.
    pub fn next(self) -> Self {
        match self.0.checked_add(1) {
            Some(v) => Self(v),
            None => panic!("slot generation counter overflowed"),
        }
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Position of a slot within an arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    /// The index as a `usize`, for indexing the slot table.
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SlotIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
