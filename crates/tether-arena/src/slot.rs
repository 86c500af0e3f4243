//! Generation-counted slot arena.
//!
//! [`SlotArena`] is an append-only table of slots plus a free list of
//! indices available for reuse. Each slot carries a generation and a
//! reference count; the arena knows nothing about what it stores beyond
//! moving values in and out.
//!
//! Slot lifecycle:
//!
//! ```text
//! allocate(v):  free_list.pop() or push new slot
//!               generation += 1, ref_count = 1, value = Some(v)
//! add_one(h):   ref_count += 1
//! release_one:  ref_count -= 1
//!               at 0: value.take(), free_list.push(index)
//! ```

use tether_core::{Generation, SlotIndex};

use crate::config::ArenaConfig;
use crate::handle::SlotHandle;
use crate::stats::ArenaStats;

/// One storage unit in the arena.
#[derive(Debug)]
struct Slot<T> {
    /// The stored value. `None` while the slot is on the free list.
    value: Option<T>,
    /// Generation of the current (or most recent) occupant.
    generation: Generation,
    /// Number of owning references sharing this slot.
    ref_count: u32,
}

impl<T> Slot<T> {
    fn vacant() -> Self {
        Self {
            value: None,
            generation: Generation::EMPTY,
            ref_count: 0,
        }
    }
}

/// Growable slot table with free-list reuse and generation tagging.
///
/// A handle is live iff it is non-empty, its index is in range, its
/// generation equals the slot's, and the slot's count is non-zero.
/// Generations only ever increase per slot, so a handle that goes stale
/// never becomes live again.
#[derive(Debug)]
pub struct SlotArena<T> {
    /// All slots, live and free. Never shrinks.
    slots: Vec<Slot<T>>,
    /// Indices of slots whose count reached zero.
    free_list: Vec<SlotIndex>,
    allocations: u64,
    reused: u64,
    destroyed: u64,
}

impl<T> SlotArena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::with_config(&ArenaConfig::new(0))
    }

    /// Create an empty arena with the configured slots reserved.
    pub fn with_config(config: &ArenaConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.initial_capacity),
            free_list: Vec::new(),
            allocations: 0,
            reused: 0,
            destroyed: 0,
        }
    }

    /// Store `value` in a slot and return its handle with a count of one.
    ///
    /// Reuses the most recently freed slot if there is one, otherwise
    /// appends a new slot.
    ///
    /// # Panics
    ///
    /// Panics if the table would exceed [`ArenaConfig::MAX_SLOTS`].
    pub fn allocate(&mut self, value: T) -> SlotHandle {
        let index = match self.free_list.pop() {
            Some(index) => {
                self.reused += 1;
                index
            }
            None => self.push_vacant(),
        };

        let slot = &mut self.slots[index.get()];
        debug_assert!(
            slot.ref_count == 0 && slot.value.is_none(),
            "free list yielded occupied slot {index}"
        );
        slot.generation = slot.generation.next();
        slot.ref_count = 1;
        slot.value = Some(value);
        self.allocations += 1;

        SlotHandle::new(slot.generation, index)
    }

    fn push_vacant(&mut self) -> SlotIndex {
        let len = self.slots.len();
        assert!(len < ArenaConfig::MAX_SLOTS, "slot arena exhausted");
        let before = self.slots.capacity();
        self.slots.push(Slot::vacant());
        if self.slots.capacity() != before {
            tracing::trace!(
                slots = self.slots.len(),
                capacity = self.slots.capacity(),
                "slot arena grew"
            );
        }
        SlotIndex(len as u32)
    }

    fn live_slot(&self, handle: SlotHandle) -> Option<&Slot<T>> {
        if handle.is_empty() {
            return None;
        }
        self.slots
            .get(handle.index.get())
            .filter(|slot| slot.generation == handle.generation && slot.ref_count > 0)
    }

    fn live_slot_mut(&mut self, handle: SlotHandle) -> Option<&mut Slot<T>> {
        if handle.is_empty() {
            return None;
        }
        self.slots
            .get_mut(handle.index.get())
            .filter(|slot| slot.generation == handle.generation && slot.ref_count > 0)
    }

    /// Resolve a handle to its value, or `None` if the handle is not live.
    pub fn grab(&self, handle: SlotHandle) -> Option<&T> {
        self.live_slot(handle)?.value.as_ref()
    }

    /// Whether `handle` currently resolves to a value.
    pub fn is_live(&self, handle: SlotHandle) -> bool {
        self.live_slot(handle).is_some()
    }

    /// Reference count of the slot `handle` names, or 0 if it is not live.
    pub fn ref_count(&self, handle: SlotHandle) -> u32 {
        self.live_slot(handle).map_or(0, |slot| slot.ref_count)
    }

    /// Take one more count on a live slot. No-op on the empty handle.
    ///
    /// Only owners call this, and an owner's slot is live by construction,
    /// so a stale handle here is a contract violation: it trips a debug
    /// assertion and is otherwise ignored.
    pub fn add_one(&mut self, handle: SlotHandle) {
        if handle.is_empty() {
            return;
        }
        let added = self.try_add_one(handle);
        debug_assert!(added, "add_one on stale {handle}");
    }

    /// Take one more count if `handle` is live. Returns whether it was.
    pub fn try_add_one(&mut self, handle: SlotHandle) -> bool {
        match self.live_slot_mut(handle) {
            Some(slot) => {
                slot.ref_count = match slot.ref_count.checked_add(1) {
                    Some(n) => n,
                    None => panic!("slot reference count overflowed"),
                };
                true
            }
            None => false,
        }
    }

    /// Give back one count. No-op on the empty handle.
    ///
    /// When the count reaches zero the slot goes onto the free list and
    /// its value is handed back; the caller decides where to drop it.
    /// Releasing through a stale handle trips a debug assertion and is
    /// otherwise ignored, so the free list can never hold an index twice.
    pub fn release_one(&mut self, handle: SlotHandle) -> Option<T> {
        if handle.is_empty() {
            return None;
        }
        let slot = self.live_slot_mut(handle);
        debug_assert!(slot.is_some(), "release_one on stale {handle}");
        let slot = slot?;

        slot.ref_count -= 1;
        if slot.ref_count > 0 {
            return None;
        }
        let value = slot.value.take();
        self.free_list.push(handle.index);
        self.destroyed += 1;
        value
    }

    /// Total slots in the table (live + free).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots currently holding a value.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Number of slots available for reuse.
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Occupancy and allocation counters. Call counters are left at zero;
    /// dispatch is counted by the allocator layer.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            slots: self.len(),
            live: self.live_count(),
            free: self.free_count(),
            allocations: self.allocations,
            reused: self.reused,
            destroyed: self.destroyed,
            ..ArenaStats::default()
        }
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
