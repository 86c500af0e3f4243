//! Allocator domains.
//!
//! A domain names which process-wide allocator a reference lives in. There
//! are two, with identical contracts:
//!
//! - [`Local`]: one unsynchronized allocator per thread. References are
//!   `!Send + !Sync`, so they can never leave the thread whose allocator
//!   holds their slot.
//! - [`Shared`]: one allocator for the whole process behind a reentrant
//!   lock. References are `Send + Sync`; callables must be too.
//!
//! Both singletons are created on first use and never torn down in order.
//! A local allocator is destroyed with its thread; references that outlive
//! it (e.g. held by other thread-locals) silently skip their cleanup.

use std::cell::OnceCell;
use std::sync::OnceLock;

use tether_arena::{
    Allocator, ArenaConfig, ArenaStats, CallableAllocator, LocalCallable, SharedCallable,
    SyncAllocator,
};
use tether_core::{Callback, ConfigError};

/// An allocator singleton that references can be parameterized by.
pub trait Domain: Sized + 'static {
    /// The allocator backing this domain.
    type Allocator: Allocator;

    /// Auto-trait marker carried by references of this domain.
    ///
    /// A raw pointer for [`Local`] (making references `!Send + !Sync`),
    /// `()` for [`Shared`].
    type Affinity: 'static;

    /// Human-readable name, for diagnostics.
    const NAME: &'static str;

    /// Run `f` against this domain's allocator, creating it on first use.
    ///
    /// Returns `None` when the allocator is no longer reachable (the
    /// current thread's local allocator has already been destroyed).
    fn with_allocator<R>(f: impl FnOnce(&Self::Allocator) -> R) -> Option<R>;

    /// Occupancy and activity counters for this domain's allocator.
    fn stats() -> ArenaStats {
        Self::with_allocator(|a| a.stats()).unwrap_or_default()
    }
}

/// Domains that can store a callable of type `F` taking `Args`.
///
/// [`Local`] accepts any `'static` callable; [`Shared`] additionally
/// requires `Send + Sync`.
pub trait Accepts<F, Args>: Domain {
    /// Erase `callable` into this domain's slot representation.
    fn erase(callable: F) -> <Self::Allocator as Allocator>::Callable;
}

/// The thread-confined domain: one allocator per thread, no locking.
#[derive(Debug)]
pub enum Local {}

thread_local! {
    static LOCAL: OnceCell<CallableAllocator<LocalCallable>> = const { OnceCell::new() };
}

impl Local {
    /// Configure the current thread's allocator.
    ///
    /// Must run before the first local callback is constructed on this
    /// thread; afterwards the allocator exists and this returns
    /// [`ConfigError::AlreadyInitialized`].
    pub fn configure(config: ArenaConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let rejected = ConfigError::AlreadyInitialized { domain: Self::NAME };
        LOCAL
            .try_with(|cell| {
                cell.set(CallableAllocator::with_config(&config))
                    .map_err(|_| rejected.clone())
            })
            .unwrap_or(Err(rejected))
            .inspect_err(|_| tracing::debug!(domain = Self::NAME, "configuration rejected"))
    }
}

impl Domain for Local {
    type Allocator = CallableAllocator<LocalCallable>;
    type Affinity = *const ();
    const NAME: &'static str = "local";

    fn with_allocator<R>(f: impl FnOnce(&Self::Allocator) -> R) -> Option<R> {
        LOCAL
            .try_with(|cell| {
                f(cell.get_or_init(|| {
                    tracing::debug!(domain = Self::NAME, "creating allocator");
                    CallableAllocator::new()
                }))
            })
            .ok()
    }
}

impl<F, Args> Accepts<F, Args> for Local
where
    F: Callback<Args>,
    Args: 'static,
{
    fn erase(callable: F) -> LocalCallable {
        LocalCallable::new::<F, Args>(callable)
    }
}

/// The synchronized domain: one process-wide allocator behind a
/// reentrant lock.
#[derive(Debug)]
pub enum Shared {}

static SHARED: OnceLock<SyncAllocator<SharedCallable>> = OnceLock::new();

impl Shared {
    /// Configure the process-wide allocator.
    ///
    /// Must run before the first shared callback is constructed anywhere in
    /// the process; afterwards this returns
    /// [`ConfigError::AlreadyInitialized`].
    pub fn configure(config: ArenaConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let mut installed = false;
        SHARED.get_or_init(|| {
            installed = true;
            SyncAllocator::with_config(&config)
        });
        if installed {
            Ok(())
        } else {
            tracing::debug!(domain = Self::NAME, "configuration rejected");
            Err(ConfigError::AlreadyInitialized { domain: Self::NAME })
        }
    }

    fn allocator() -> &'static SyncAllocator<SharedCallable> {
        SHARED.get_or_init(|| {
            tracing::debug!(domain = Self::NAME, "creating allocator");
            SyncAllocator::new()
        })
    }
}

impl Domain for Shared {
    type Allocator = SyncAllocator<SharedCallable>;
    type Affinity = ();
    const NAME: &'static str = "shared";

    fn with_allocator<R>(f: impl FnOnce(&Self::Allocator) -> R) -> Option<R> {
        Some(f(Self::allocator()))
    }
}

impl<F, Args> Accepts<F, Args> for Shared
where
    F: Callback<Args> + Send + Sync,
    Args: 'static,
{
    fn erase(callable: F) -> SharedCallable {
        SharedCallable::new::<F, Args>(callable)
    }
}
