//! Test fixtures for tether development.
//!
//! Counting callables and drop sentinels shared by the integration tests and
//! benchmarks. See [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{CallCounter, DropFlag, DropSentinel, LocalCounter};
