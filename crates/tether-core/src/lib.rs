//! Core types and traits for tether callbacks.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: the slot
//! [`Generation`] counter, the [`Callback`] signature trait, and the
//! error types surfaced by the public API.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod callback;
pub mod error;
pub mod id;

pub use callback::Callback;
pub use error::{CallError, ConfigError};
pub use id::{Generation, SlotIndex};
