//! Tether: strong and weak shared callbacks.
//!
//! A [`StrongFn`] owns a callback and keeps it alive; a [`WeakFn`] made
//! from it calls the callback only while some owner still exists, and is a
//! silent no-op afterwards. Components that produce events can hold weak
//! callbacks into their consumers without any de-registration protocol.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use tether::sync;
//!
//! let done = Arc::new(AtomicUsize::new(0));
//! let d = Arc::clone(&done);
//! let on_done: sync::StrongFn<(usize,)> =
//!     sync::StrongFn::new(move |n: usize| { d.fetch_add(n, Ordering::SeqCst); });
//!
//! let notify = on_done.downgrade();
//! std::thread::spawn(move || notify.call((3,))).join().unwrap();
//! assert_eq!(done.load(Ordering::SeqCst), 3);
//!
//! drop(on_done);
//! notify.call((3,)); // the consumer is gone: nothing happens
//! assert_eq!(done.load(Ordering::SeqCst), 3);
//! ```
//!
//! # Domains
//!
//! Every reference belongs to one allocator domain, fixed by its type:
//!
//! | Module | Domain | Thread model |
//! |--------|--------|--------------|
//! | [`local`] | [`domain::Local`] | one allocator per thread, references are `!Send` |
//! | [`sync`] | [`domain::Shared`] | one process-wide allocator behind a reentrant lock |
//!
//! The top-level [`StrongFn`] and [`WeakFn`] default to the local domain.
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `tether-arena` | Slot arena, allocators, config, stats |
//! | [`types`] | `tether-core` | Generations, the `Callback` trait, errors |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod domain;
pub mod strong;
pub mod weak;

/// Slot arena and allocator backends (`tether-arena`).
///
/// Only needed to inspect [`arena::ArenaStats`] or to build
/// [`arena::ArenaConfig`] for [`local::configure`] / [`sync::configure`].
pub use tether_arena as arena;

/// Core vocabulary (`tether-core`): [`types::Generation`],
/// [`types::Callback`], and the error types.
pub use tether_core as types;

pub use domain::{Domain, Local, Shared};
pub use strong::StrongFn;
pub use tether_core::{CallError, Callback, ConfigError};
pub use weak::WeakFn;

/// Thread-confined callbacks.
pub mod local {
    use tether_arena::{ArenaConfig, ArenaStats};
    use tether_core::ConfigError;

    use crate::domain::{Domain, Local};

    /// Owning reference in the current thread's allocator.
    pub type StrongFn<Args = ()> = crate::StrongFn<Args, Local>;

    /// Non-owning reference in the current thread's allocator.
    pub type WeakFn<Args = ()> = crate::WeakFn<Args, Local>;

    /// Configure the current thread's allocator before its first use.
    pub fn configure(config: ArenaConfig) -> Result<(), ConfigError> {
        Local::configure(config)
    }

    /// Counters for the current thread's allocator.
    pub fn stats() -> ArenaStats {
        Local::stats()
    }
}

/// Thread-safe callbacks in the process-wide synchronized allocator.
pub mod sync {
    use tether_arena::{ArenaConfig, ArenaStats};
    use tether_core::ConfigError;

    use crate::domain::{Domain, Shared};

    /// Owning reference in the shared allocator.
    pub type StrongFn<Args = ()> = crate::StrongFn<Args, Shared>;

    /// Non-owning reference in the shared allocator.
    pub type WeakFn<Args = ()> = crate::WeakFn<Args, Shared>;

    /// Configure the shared allocator before its first use anywhere in the
    /// process.
    pub fn configure(config: ArenaConfig) -> Result<(), ConfigError> {
        Shared::configure(config)
    }

    /// Counters for the shared allocator.
    pub fn stats() -> ArenaStats {
        Shared::stats()
    }
}

/// Common imports.
///
/// ```rust
/// use tether::prelude::*;
/// ```
pub mod prelude {
    pub use crate::domain::{Local, Shared};
    pub use crate::strong::StrongFn;
    pub use crate::weak::WeakFn;
    pub use tether_core::{CallError, Callback};
}
