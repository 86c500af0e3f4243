//! Reusable callback fixtures.
//!
//! - [`CallCounter`]: thread-safe hit counter, usable in either domain.
//! - [`LocalCounter`]: single-threaded hit counter for the local domain.
//! - [`DropSentinel`]: records when the callable that owns it is destroyed.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts invocations across threads.
///
/// Clones share one counter. [`hook`](CallCounter::hook) hands out a
/// `Send + Sync` closure that bumps it.
#[derive(Clone, Debug, Default)]
pub struct CallCounter {
    hits: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A closure that counts one hit per call.
    pub fn hook(&self) -> impl Fn() + Send + Sync + 'static {
        let hits = Arc::clone(&self.hits);
        move || {
            hits.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// A closure that adds its argument to the count.
    pub fn adder(&self) -> impl Fn(usize) + Send + Sync + 'static {
        let hits = Arc::clone(&self.hits);
        move |n: usize| {
            hits.fetch_add(n, Ordering::SeqCst);
        }
    }

    pub fn get(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Counts invocations on one thread.
#[derive(Clone, Debug, Default)]
pub struct LocalCounter {
    hits: Rc<Cell<usize>>,
}

impl LocalCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A closure that counts one hit per call.
    pub fn hook(&self) -> impl Fn() + 'static {
        let hits = Rc::clone(&self.hits);
        move || hits.set(hits.get() + 1)
    }

    /// A closure that adds its argument to the count.
    pub fn adder(&self) -> impl Fn(usize) + 'static {
        let hits = Rc::clone(&self.hits);
        move |n: usize| hits.set(hits.get() + n)
    }

    pub fn get(&self) -> usize {
        self.hits.get()
    }
}

/// Flags when dropped.
///
/// Move one into a callable and check [`DropFlag::is_set`] to observe
/// exactly when the allocator destroys that callable.
#[derive(Debug)]
pub struct DropSentinel {
    dropped: Arc<AtomicBool>,
}

/// Observer half of a [`DropSentinel`].
#[derive(Clone, Debug)]
pub struct DropFlag {
    dropped: Arc<AtomicBool>,
}

impl DropSentinel {
    pub fn pair() -> (Self, DropFlag) {
        let dropped = Arc::new(AtomicBool::new(false));
        (
            Self {
                dropped: Arc::clone(&dropped),
            },
            DropFlag { dropped },
        )
    }
}

impl Drop for DropSentinel {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

impl DropFlag {
    pub fn is_set(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}
