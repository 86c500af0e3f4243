//! Reentrant-lock wrapper over [`CallableAllocator`].
//!
//! [`SyncAllocator`] serializes every allocator operation behind a single
//! `parking_lot::ReentrantMutex`. The lock is held for the whole operation,
//! including the user callable during `call`/`safe_call` and the callable's
//! destructor during `release_one`. Because the lock is reentrant and the
//! inner allocator never holds an arena borrow across user code, a callable
//! running under the lock may construct, clone, reset, or drop references
//! into the same allocator, including its own owning reference.
//!
//! Operations on one slot are totally ordered by lock acquisition. Nothing
//! is promised about ordering across slots beyond that.

use parking_lot::ReentrantMutex;

use crate::allocator::{Allocator, CallableAllocator};
use crate::config::ArenaConfig;
use crate::erased::ErasedCallable;
use crate::handle::SlotHandle;
use crate::stats::ArenaStats;

/// Thread-safe allocator: one [`CallableAllocator`] behind a reentrant lock.
///
/// `Sync` whenever the erased callable type is `Send`.
#[derive(Debug)]
pub struct SyncAllocator<C> {
    inner: ReentrantMutex<CallableAllocator<C>>,
}

impl<C: ErasedCallable> SyncAllocator<C> {
    /// Create an allocator with the default config.
    pub fn new() -> Self {
        Self::with_config(&ArenaConfig::default())
    }

    /// Create an allocator from a validated config.
    pub fn with_config(config: &ArenaConfig) -> Self {
        Self {
            inner: ReentrantMutex::new(CallableAllocator::with_config(config)),
        }
    }
}

impl<C: ErasedCallable> Default for SyncAllocator<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ErasedCallable> Allocator for SyncAllocator<C> {
    type Callable = C;

    fn allocate(&self, callable: C) -> SlotHandle {
        self.inner.lock().allocate(callable)
    }

    fn call<Args: 'static>(&self, handle: SlotHandle, args: Args) {
        self.inner.lock().call(handle, args);
    }

    fn safe_call<Args: 'static>(&self, handle: SlotHandle, args: Args) -> bool {
        self.inner.lock().safe_call(handle, args)
    }

    fn release_one(&self, handle: SlotHandle) {
        self.inner.lock().release_one(handle);
    }

    fn add_one(&self, handle: SlotHandle) {
        self.inner.lock().add_one(handle);
    }

    fn try_add_one(&self, handle: SlotHandle) -> bool {
        self.inner.lock().try_add_one(handle)
    }

    fn ref_count(&self, handle: SlotHandle) -> u32 {
        self.inner.lock().ref_count(handle)
    }

    fn stats(&self) -> ArenaStats {
        self.inner.lock().stats()
    }
}
