//! Non-owning callback references.

use std::fmt;
use std::marker::PhantomData;

use tether_arena::{Allocator, SlotHandle};
use tether_core::CallError;

use crate::domain::{Domain, Local};
use crate::strong::StrongFn;

/// A non-owning reference to a callback.
///
/// A plain `(generation, index)` handle: copying, assigning and dropping it
/// never touch the slot. Calling it reaches the callable only while at
/// least one [`StrongFn`] for the same allocation is alive; otherwise the
/// call is a silent no-op, even if the slot has since been reused by an
/// unrelated callback.
pub struct WeakFn<Args = (), D: Domain = Local> {
    handle: SlotHandle,
    _marker: PhantomData<(fn(Args), D::Affinity)>,
}

impl<Args: 'static, D: Domain> WeakFn<Args, D> {
    /// A reference to nothing. Calling it is a no-op.
    pub fn new() -> Self {
        Self::from_handle(SlotHandle::EMPTY)
    }

    /// Wrap a handle without touching its count.
    pub(crate) fn from_handle(handle: SlotHandle) -> Self {
        Self {
            handle,
            _marker: PhantomData,
        }
    }

    /// Invoke the callable if it is still alive.
    ///
    /// The call runs to completion even if the callable drops the last
    /// strong reference to itself part way through.
    pub fn call(&self, args: Args) {
        if !self.handle.is_empty() {
            D::with_allocator(|a| a.safe_call(self.handle, args));
        }
    }

    /// Invoke the callable, reporting why it could not be reached.
    pub fn try_call(&self, args: Args) -> Result<(), CallError> {
        if self.handle.is_empty() {
            return Err(CallError::Empty);
        }
        match D::with_allocator(|a| a.safe_call(self.handle, args)) {
            Some(true) => Ok(()),
            _ => Err(CallError::Expired {
                generation: self.handle.generation(),
            }),
        }
    }

    /// Point at `strong`'s slot.
    pub fn assign(&mut self, strong: &StrongFn<Args, D>) {
        self.handle = strong.handle;
    }

    /// Forget the slot and become empty.
    pub fn reset(&mut self) {
        self.handle = SlotHandle::EMPTY;
    }

    /// A new owning reference, if the callable is still alive.
    pub fn upgrade(&self) -> Option<StrongFn<Args, D>> {
        if self.handle.is_empty() {
            return None;
        }
        D::with_allocator(|a| a.try_add_one(self.handle))
            .unwrap_or(false)
            .then(|| StrongFn::from_handle(self.handle))
    }

    /// Whether calling this reference would be a no-op.
    pub fn is_expired(&self) -> bool {
        self.strong_count() == 0
    }

    /// Number of strong references keeping the callable alive.
    pub fn strong_count(&self) -> u32 {
        if self.handle.is_empty() {
            return 0;
        }
        D::with_allocator(|a| a.ref_count(self.handle)).unwrap_or(0)
    }

    /// Whether both references name one allocation.
    pub fn same_slot(&self, other: &Self) -> bool {
        self.handle == other.handle
    }

    /// The slot handle this reference names.
    pub fn handle(&self) -> SlotHandle {
        self.handle
    }

    /// Convert into a plain closure that calls through this reference.
    pub fn into_fn(self) -> impl Fn(Args) + 'static {
        move |args| self.call(args)
    }
}

impl<Args, D: Domain> Clone for WeakFn<Args, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Args, D: Domain> Copy for WeakFn<Args, D> {}

impl<Args: 'static, D: Domain> Default for WeakFn<Args, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static, D: Domain> From<&StrongFn<Args, D>> for WeakFn<Args, D> {
    fn from(strong: &StrongFn<Args, D>) -> Self {
        strong.downgrade()
    }
}

impl<Args, D: Domain> fmt::Debug for WeakFn<Args, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakFn")
            .field("domain", &D::NAME)
            .field("handle", &format_args!("{}", self.handle))
            .finish()
    }
}
