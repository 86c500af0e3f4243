//! The [`Allocator`] contract and its thread-confined implementation.
//!
//! [`CallableAllocator`] layers dispatch over a [`SlotArena`] of erased
//! callables. Every operation takes `&self`: the arena lives in a
//! `RefCell` whose borrows are scoped to bookkeeping only, so user code
//! (a callable being invoked, or a callable's destructor) always runs with
//! the arena unborrowed and may re-enter the allocator freely.

use std::cell::{Cell, RefCell};

use crate::config::ArenaConfig;
use crate::erased::ErasedCallable;
use crate::handle::SlotHandle;
use crate::slot::SlotArena;
use crate::stats::ArenaStats;

/// Operations shared by every allocator backend.
///
/// Typed references drive an allocator exclusively through this trait, so
/// the thread-confined and synchronized backends are interchangeable.
pub trait Allocator {
    /// The erased callable type stored in slots.
    type Callable: ErasedCallable;

    /// Store a callable in a fresh slot with a count of one.
    fn allocate(&self, callable: Self::Callable) -> SlotHandle;

    /// Invoke the callable behind a handle the caller owns a count on.
    ///
    /// The caller's count guarantees the slot is live; an invalid handle
    /// here trips a debug assertion and is otherwise a no-op.
    fn call<Args: 'static>(&self, handle: SlotHandle, args: Args);

    /// Invoke the callable behind `handle` if it is still live.
    ///
    /// Returns whether a callable was reached. Stale, reused and empty
    /// handles are silent no-ops.
    fn safe_call<Args: 'static>(&self, handle: SlotHandle, args: Args) -> bool;

    /// Give back one count, destroying the callable if it was the last.
    fn release_one(&self, handle: SlotHandle);

    /// Take one more count on a live slot. No-op on the empty handle.
    fn add_one(&self, handle: SlotHandle);

    /// Take one more count if `handle` is still live.
    fn try_add_one(&self, handle: SlotHandle) -> bool;

    /// Current count of the slot `handle` names, or 0 if it is not live.
    fn ref_count(&self, handle: SlotHandle) -> u32;

    /// Occupancy and activity counters.
    fn stats(&self) -> ArenaStats;
}

/// Unsynchronized allocator over a slot arena of erased callables.
///
/// `!Sync`: one instance must only be used from one thread at a time.
/// The thread-local domain keeps one per thread; [`SyncAllocator`]
/// serializes access to one behind a reentrant lock.
///
/// [`SyncAllocator`]: crate::SyncAllocator
#[derive(Debug)]
pub struct CallableAllocator<C> {
    arena: RefCell<SlotArena<C>>,
    calls: Cell<u64>,
    expired_calls: Cell<u64>,
}

impl<C: ErasedCallable> CallableAllocator<C> {
    /// Create an allocator with the default config.
    pub fn new() -> Self {
        Self::with_config(&ArenaConfig::default())
    }

    /// Create an allocator from a validated config.
    pub fn with_config(config: &ArenaConfig) -> Self {
        Self {
            arena: RefCell::new(SlotArena::with_config(config)),
            calls: Cell::new(0),
            expired_calls: Cell::new(0),
        }
    }

    /// Clone the callable out so no borrow is held while it runs.
    fn grab(&self, handle: SlotHandle) -> Option<C> {
        self.arena.borrow().grab(handle).cloned()
    }

    fn invoke<Args: 'static>(&self, callable: C, args: Args) {
        self.calls.set(self.calls.get() + 1);
        callable.invoke(args);
    }
}

impl<C: ErasedCallable> Default for CallableAllocator<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ErasedCallable> Allocator for CallableAllocator<C> {
    type Callable = C;

    fn allocate(&self, callable: C) -> SlotHandle {
        self.arena.borrow_mut().allocate(callable)
    }

    fn call<Args: 'static>(&self, handle: SlotHandle, args: Args) {
        let callable = self.grab(handle);
        debug_assert!(callable.is_some(), "owning call through dead {handle}");
        if let Some(callable) = callable {
            self.invoke(callable, args);
        }
    }

    fn safe_call<Args: 'static>(&self, handle: SlotHandle, args: Args) -> bool {
        match self.grab(handle) {
            Some(callable) => {
                self.invoke(callable, args);
                true
            }
            None => {
                self.expired_calls.set(self.expired_calls.get() + 1);
                false
            }
        }
    }

    fn release_one(&self, handle: SlotHandle) {
        let released = self.arena.borrow_mut().release_one(handle);
        // The destructor may drop references into this allocator.
        drop(released);
    }

    fn add_one(&self, handle: SlotHandle) {
        self.arena.borrow_mut().add_one(handle);
    }

    fn try_add_one(&self, handle: SlotHandle) -> bool {
        self.arena.borrow_mut().try_add_one(handle)
    }

    fn ref_count(&self, handle: SlotHandle) -> u32 {
        self.arena.borrow().ref_count(handle)
    }

    fn stats(&self) -> ArenaStats {
        ArenaStats {
            calls: self.calls.get(),
            expired_calls: self.expired_calls.get(),
            ..self.arena.borrow().stats()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erased::LocalCallable;
    use std::cell::Cell;
    use std::rc::Rc;

    type Local = CallableAllocator<LocalCallable>;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        (hits, move || h.set(h.get() + 1))
    }

    #[test]
    fn call_reaches_callable() {
        let alloc = Local::new();
        let (hits, f) = counter();
        let h = alloc.allocate(LocalCallable::new(f));
        alloc.call(h, ());
        assert_eq!(hits.get(), 1);
        assert_eq!(alloc.stats().calls, 1);
    }

    #[test]
    fn safe_call_after_release_is_silent() {
        let alloc = Local::new();
        let (hits, f) = counter();
        let h = alloc.allocate(LocalCallable::new(f));
        assert!(alloc.safe_call(h, ()));
        alloc.release_one(h);
        assert!(!alloc.safe_call(h, ()));
        assert!(!alloc.safe_call(SlotHandle::EMPTY, ()));
        assert_eq!(hits.get(), 1);

        let s = alloc.stats();
        assert_eq!(s.calls, 1);
        assert_eq!(s.expired_calls, 2);
        assert_eq!(s.destroyed, 1);
    }

    #[test]
    fn stale_handle_does_not_reach_new_occupant() {
        let alloc = Local::new();
        let (first, f) = counter();
        let old = alloc.allocate(LocalCallable::new(f));
        alloc.release_one(old);

        let (second, g) = counter();
        let new = alloc.allocate(LocalCallable::new(g));
        assert_eq!(new.index(), old.index());

        assert!(!alloc.safe_call(old, ()));
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 0);
        alloc.call(new, ());
        assert_eq!(second.get(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "owning call through dead")]
    fn owning_call_on_released_handle_asserts() {
        let alloc = Local::new();
        let (_, f) = counter();
        let h = alloc.allocate(LocalCallable::new(f));
        alloc.release_one(h);
        alloc.call(h, ());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "owning call through dead")]
    fn owning_call_on_empty_handle_asserts() {
        let alloc = Local::new();
        alloc.call(SlotHandle::EMPTY, ());
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn owning_call_on_released_handle_is_noop_in_release_builds() {
        let alloc = Local::new();
        let (hits, f) = counter();
        let h = alloc.allocate(LocalCallable::new(f));
        alloc.release_one(h);
        alloc.call(h, ());
        alloc.call(SlotHandle::EMPTY, ());
        assert_eq!(hits.get(), 0);
        assert_eq!(alloc.stats().calls, 0);
    }

    #[test]
    fn callable_dropped_when_last_count_released() {
        struct Sentinel(Rc<Cell<bool>>);
        impl Drop for Sentinel {
            fn drop(&mut self) {
                self.0.set(true);
            }
        }
        let dropped = Rc::new(Cell::new(false));
        let sentinel = Sentinel(Rc::clone(&dropped));

        let alloc = Local::new();
        let h = alloc.allocate(LocalCallable::new(move || {
            let _ = &sentinel;
        }));
        alloc.add_one(h);
        assert_eq!(alloc.ref_count(h), 2);
        alloc.release_one(h);
        assert!(!dropped.get());
        alloc.release_one(h);
        assert!(dropped.get());
        assert_eq!(alloc.ref_count(h), 0);
    }

    #[test]
    fn callable_may_release_its_own_slot_while_running() {
        let alloc = Rc::new(Local::new());
        let own = Rc::new(Cell::new(SlotHandle::EMPTY));
        let ran = Rc::new(Cell::new(0));

        let weak_alloc = Rc::downgrade(&alloc);
        let own_in = Rc::clone(&own);
        let ran_in = Rc::clone(&ran);
        let h = alloc.allocate(LocalCallable::new(move || {
            if let Some(a) = weak_alloc.upgrade() {
                a.release_one(own_in.get());
            }
            ran_in.set(ran_in.get() + 1);
        }));
        own.set(h);

        assert!(alloc.safe_call(h, ()));
        assert_eq!(ran.get(), 1);
        assert!(!alloc.safe_call(h, ()));
        assert_eq!(ran.get(), 1);
        assert_eq!(alloc.stats().live, 0);
    }

    #[test]
    fn destructor_may_reenter_allocator() {
        struct ReleaseOnDrop {
            alloc: std::rc::Weak<Local>,
            inner: SlotHandle,
        }
        impl Drop for ReleaseOnDrop {
            fn drop(&mut self) {
                if let Some(a) = self.alloc.upgrade() {
                    a.release_one(self.inner);
                }
            }
        }

        let alloc = Rc::new(Local::new());
        let (_, f) = counter();
        let inner = alloc.allocate(LocalCallable::new(f));
        let guard = ReleaseOnDrop {
            alloc: Rc::downgrade(&alloc),
            inner,
        };
        let outer = alloc.allocate(LocalCallable::new(move || {
            let _ = &guard;
        }));

        alloc.release_one(outer);
        assert_eq!(alloc.ref_count(inner), 0);
        assert_eq!(alloc.stats().live, 0);
    }
}
