//! Owning callback references.

use std::fmt;
use std::marker::PhantomData;
use std::mem;

use tether_arena::{Allocator, SlotHandle};
use tether_core::CallError;

use crate::domain::{Accepts, Domain, Local};
use crate::weak::WeakFn;

/// An owning, shareable reference to a callback.
///
/// Holds one unit of its slot's reference count. Cloning shares the slot
/// (no new allocation); the callable is destroyed when the last clone is
/// dropped or reset. While any clone is alive, every [`WeakFn`] made from
/// it reaches the callable.
///
/// `Args` is the argument tuple (`()` for no arguments, `(T,)` for one).
/// `D` selects the allocator domain; see [`crate::domain`].
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use tether::{StrongFn, WeakFn};
///
/// let hits = Rc::new(Cell::new(0));
/// let h = Rc::clone(&hits);
/// let strong: StrongFn<(u32,)> = StrongFn::new(move |n: u32| h.set(h.get() + n));
/// let weak: WeakFn<(u32,)> = strong.downgrade();
///
/// weak.call((2,));
/// drop(strong);
/// weak.call((5,)); // no-op: the callable is gone
/// assert_eq!(hits.get(), 2);
/// ```
pub struct StrongFn<Args = (), D: Domain = Local> {
    pub(crate) handle: SlotHandle,
    _marker: PhantomData<(fn(Args), D::Affinity)>,
}

impl<Args: 'static, D: Domain> StrongFn<Args, D> {
    /// Store `callable` in a fresh slot and own it.
    ///
    /// If the domain's allocator is gone (a local reference built while its
    /// thread is being torn down), the callable is dropped and the result
    /// is empty.
    pub fn new<F>(callable: F) -> Self
    where
        D: Accepts<F, Args>,
    {
        Self::from_handle(Self::allocate(callable))
    }

    /// A reference that owns nothing. Calling it is a contract violation.
    pub fn empty() -> Self {
        Self::from_handle(SlotHandle::EMPTY)
    }

    /// Wrap a handle whose count the caller has already taken.
    pub(crate) fn from_handle(handle: SlotHandle) -> Self {
        Self {
            handle,
            _marker: PhantomData,
        }
    }

    fn allocate<F>(callable: F) -> SlotHandle
    where
        D: Accepts<F, Args>,
    {
        let erased = D::erase(callable);
        D::with_allocator(move |a| a.allocate(erased)).unwrap_or(SlotHandle::EMPTY)
    }

    /// Invoke the callable.
    ///
    /// This reference's own count keeps the slot alive for the whole call,
    /// even if the callable resets or drops other references to it. Calling
    /// an empty reference trips a debug assertion and is otherwise a no-op.
    pub fn call(&self, args: Args) {
        D::with_allocator(|a| a.call(self.handle, args));
    }

    /// Invoke the callable, reporting whether it was reached.
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

    /// Release this reference's count and become empty.
    pub fn reset(&mut self) {
        let old = mem::replace(&mut self.handle, SlotHandle::EMPTY);
        release::<D>(old);
    }

    /// Release this reference's count, then own `callable` in a new slot.
    ///
    /// Weak references made from the old slot are not carried over: they
    /// see the old callable as expired once its last owner lets go.
    pub fn reset_with<F>(&mut self, callable: F)
    where
        D: Accepts<F, Args>,
    {
        self.reset();
        self.handle = Self::allocate(callable);
    }

    /// A weak reference to the same slot.
    pub fn downgrade(&self) -> WeakFn<Args, D> {
        WeakFn::from_handle(self.handle)
    }

    /// Whether this reference owns nothing.
    pub fn is_empty(&self) -> bool {
        self.handle.is_empty()
    }

    /// Number of strong references sharing this slot (0 when empty).
    pub fn strong_count(&self) -> u32 {
        D::with_allocator(|a| a.ref_count(self.handle)).unwrap_or(0)
    }

    /// Whether both references share one slot.
    ///
    /// Two empty references compare equal.
    pub fn same_slot(&self, other: &Self) -> bool {
        self.handle == other.handle
    }

    /// The slot handle this reference owns.
    pub fn handle(&self) -> SlotHandle {
        self.handle
    }

    /// Convert into a plain closure that owns this reference.
    ///
    /// The closure is `Send + Sync` exactly when this reference is.
    pub fn into_fn(self) -> impl Fn(Args) + 'static {
        move |args| self.call(args)
    }
}

fn release<D: Domain>(handle: SlotHandle) {
    if !handle.is_empty() {
        D::with_allocator(|a| a.release_one(handle));
    }
}

impl<Args: 'static, D: Domain> Clone for StrongFn<Args, D> {
    fn clone(&self) -> Self {
        if !self.handle.is_empty() {
            D::with_allocator(|a| a.add_one(self.handle));
        }
        Self::from_handle(self.handle)
    }

    fn clone_from(&mut self, source: &Self) {
        if self.handle == source.handle {
            return;
        }
        let old = mem::replace(&mut self.handle, source.handle);
        if !source.handle.is_empty() {
            D::with_allocator(|a| a.add_one(source.handle));
        }
        release::<D>(old);
    }
}

impl<Args, D: Domain> Drop for StrongFn<Args, D> {
    fn drop(&mut self) {
        release::<D>(mem::replace(&mut self.handle, SlotHandle::EMPTY));
    }
}

impl<Args: 'static, D: Domain> Default for StrongFn<Args, D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<Args, D: Domain> fmt::Debug for StrongFn<Args, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrongFn")
            .field("domain", &D::NAME)
            .field("handle", &format_args!("{}", self.handle))
            .finish()
    }
}
