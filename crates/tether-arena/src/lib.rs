//! Generation-counted slot arena and callable allocators.
//!
//! Stores type-erased callables in reference-counted slots addressed by
//! `(generation, index)` handles. A handle whose generation no longer
//! matches its slot is stale and resolves to nothing, so a freed-and-reused
//! slot can never be reached through an old handle.
//!
//! # Architecture
//!
//! ```text
//! SyncAllocator (one ReentrantMutex around everything below)
//! └── CallableAllocator (borrow-scoped dispatch, drop outside borrows)
//!     └── SlotArena<C> (slots + free list, type-agnostic)
//!         └── Slot { value: Option<C>, generation, ref_count }
//! ```
//!
//! `C` is an [`ErasedCallable`]: [`LocalCallable`] for thread-confined
//! allocators, [`SharedCallable`] for the synchronized one.
//!
//! # Reentrancy
//!
//! No arena borrow is ever held while user code runs. Dispatch clones the
//! erased callable out of its slot and invokes the clone; releases take the
//! callable out of its slot and drop it after the borrow ends. A callable
//! may therefore allocate, release, or re-point references from inside its
//! own invocation, including releasing the slot it is running from.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod config;
pub mod erased;
pub mod handle;
pub mod slot;
pub mod stats;
pub mod sync;

// Public re-exports for the primary API surface.
pub use allocator::{Allocator, CallableAllocator};
pub use config::ArenaConfig;
pub use erased::{ErasedCallable, LocalCallable, SharedCallable};
pub use handle::SlotHandle;
pub use slot::SlotArena;
pub use stats::ArenaStats;
pub use sync::SyncAllocator;
