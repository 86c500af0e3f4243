//! Benchmark fixtures for tether callbacks.
//!
//! - [`local_population`]: many live local callbacks plus weak handles,
//!   half of them expired.
//! - [`shared_population`]: the same shape in the shared domain.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tether::{local, sync};

/// `n` live local callbacks and `2 * n` weak handles.
///
/// Every even-indexed callback is dropped again, so half of the weak
/// handles are expired and their slots sit on the free list.
pub fn local_population(n: usize) -> (Vec<local::StrongFn>, Vec<local::WeakFn>) {
    let all: Vec<local::StrongFn> = (0..n).map(|_| local::StrongFn::new(|| {})).collect();
    let weaks = all.iter().flat_map(|s| [s.downgrade(), s.downgrade()]).collect();
    let live = all
        .into_iter()
        .enumerate()
        .filter_map(|(i, s)| (i % 2 == 1).then_some(s))
        .collect();
    (live, weaks)
}

/// Shared-domain counterpart of [`local_population`].
pub fn shared_population(n: usize) -> (Vec<sync::StrongFn>, Vec<sync::WeakFn>) {
    let all: Vec<sync::StrongFn> = (0..n).map(|_| sync::StrongFn::new(|| {})).collect();
    let weaks = all.iter().flat_map(|s| [s.downgrade(), s.downgrade()]).collect();
    let live = all
        .into_iter()
        .enumerate()
        .filter_map(|(i, s)| (i % 2 == 1).then_some(s))
        .collect();
    (live, weaks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_the_weaks_are_expired() {
        std::thread::spawn(|| {
            let (live, weaks) = local_population(10);
            assert_eq!(live.len(), 5);
            assert_eq!(weaks.len(), 20);
            assert_eq!(weaks.iter().filter(|w| w.is_expired()).count(), 10);
        })
        .join()
        .unwrap();
    }
}
