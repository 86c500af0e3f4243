//! Type-erased callables.
//!
//! A slot table shared by every callback signature cannot be generic over
//! the closure type, so each callable is stored behind a reference-counted
//! `dyn Any` next to a dispatch function monomorphized for its concrete
//! closure and argument tuple. Dispatch downcasts back to the concrete type;
//! there is one heap allocation per callable and none per call.
//!
//! The reference count on the erased pointer is what lets a callable outlive
//! its slot for the duration of one invocation: dispatch clones the pointer
//! out of the arena, so releasing the slot from inside the callable only
//! drops the arena's copy.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use tether_core::Callback;

/// Dispatch entry point for one concrete callable type.
///
/// Arguments travel as `&mut Option<Args>` so they can be moved out
/// through the erased reference.
type Dispatch = fn(&dyn Any, &mut dyn Any);

fn dispatch<F, Args>(target: &dyn Any, args: &mut dyn Any)
where
    F: Callback<Args>,
    Args: 'static,
{
    let callable = target.downcast_ref::<F>();
    let args = args.downcast_mut::<Option<Args>>().and_then(Option::take);
    debug_assert!(
        callable.is_some() && args.is_some(),
        "callback invoked with a mismatched signature"
    );
    if let (Some(callable), Some(args)) = (callable, args) {
        callable.invoke(args);
    }
}

/// A callable stored in a slot, invocable without knowing its concrete type.
///
/// Cloning is cheap (a reference-count bump) and shares the callable.
pub trait ErasedCallable: Clone + 'static {
    /// Invoke with `args`.
    ///
    /// `Args` must be the tuple the callable was erased with. Typed wrappers
    /// guarantee this; a mismatch trips a debug assertion and is otherwise
    /// a no-op.
    fn invoke<Args: 'static>(&self, args: Args);
}

/// Erased callable for thread-confined allocators.
#[derive(Clone)]
pub struct LocalCallable {
    target: Rc<dyn Any>,
    dispatch: Dispatch,
}

impl LocalCallable {
    /// Erase `callable`, remembering how to call it with `Args`.
    pub fn new<F, Args>(callable: F) -> Self
    where
        F: Callback<Args>,
        Args: 'static,
    {
        Self {
            target: Rc::new(callable),
            dispatch: dispatch::<F, Args>,
        }
    }
}

impl ErasedCallable for LocalCallable {
    fn invoke<Args: 'static>(&self, args: Args) {
        let mut args = Some(args);
        (self.dispatch)(&*self.target, &mut args);
    }
}

impl fmt::Debug for LocalCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalCallable")
            .field("sharers", &Rc::strong_count(&self.target))
            .finish_non_exhaustive()
    }
}

/// Erased callable for the synchronized allocator.
///
/// The closure must be `Send + Sync`: it may be invoked from, and dropped
/// on, any thread.
#[derive(Clone)]
pub struct SharedCallable {
    target: Arc<dyn Any + Send + Sync>,
    dispatch: Dispatch,
}

impl SharedCallable {
    /// Erase `callable`, remembering how to call it with `Args`.
    pub fn new<F, Args>(callable: F) -> Self
    where
        F: Callback<Args> + Send + Sync,
        Args: 'static,
    {
        Self {
            target: Arc::new(callable),
            dispatch: dispatch::<F, Args>,
        }
    }
}

impl ErasedCallable for SharedCallable {
    fn invoke<Args: 'static>(&self, args: Args) {
        let mut args = Some(args);
        (self.dispatch)(&*self.target, &mut args);
    }
}

impl fmt::Debug for SharedCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCallable")
            .field("sharers", &Arc::strong_count(&self.target))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn local_invokes_concrete_closure() {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let erased = LocalCallable::new(move |n: u32| h.set(h.get() + n));
        erased.invoke((3u32,));
        erased.invoke((4u32,));
        assert_eq!(hits.get(), 7);
    }

    #[test]
    fn clones_share_one_callable() {
        let dropped = Rc::new(Cell::new(false));
        struct Flag(Rc<Cell<bool>>);
        impl Drop for Flag {
            fn drop(&mut self) {
                self.0.set(true);
            }
        }
        let flag = Flag(Rc::clone(&dropped));
        let erased = LocalCallable::new(move || {
            let _ = &flag;
        });
        let copy = erased.clone();
        drop(erased);
        assert!(!dropped.get());
        copy.invoke(());
        drop(copy);
        assert!(dropped.get());
    }

    #[test]
    fn shared_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedCallable>();

        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let erased = SharedCallable::new(move |a: usize, b: usize| {
            h.fetch_add(a * b, Ordering::Relaxed);
        });
        let moved = erased.clone();
        std::thread::spawn(move || moved.invoke((2usize, 5usize)))
            .join()
            .unwrap();
        assert_eq!(hits.load(Ordering::Relaxed), 10);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "mismatched signature")]
    fn mismatched_signature_asserts() {
        let erased = LocalCallable::new(|_: u8| {});
        erased.invoke(("wrong",));
    }
}
