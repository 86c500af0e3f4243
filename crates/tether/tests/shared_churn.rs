//! Integration test: shared allocator bookkeeping after heavy churn.
//!
//! Lives in its own test binary so nothing else touches the process-wide
//! allocator while its counters are compared before and after.

use std::thread;

use tether::sync;
use tether_test_utils::CallCounter;

#[test]
fn allocation_churn_leaves_free_list_sound() {
    const CHURNERS: usize = 8;
    const CALLERS: usize = 8;
    const ROUNDS: usize = 2_000;

    let before = sync::stats();
    let hits = CallCounter::new();
    let anchor: sync::StrongFn = sync::StrongFn::new(hits.hook());
    let weak = anchor.downgrade();

    thread::scope(|scope| {
        for _ in 0..CHURNERS {
            scope.spawn(|| {
                for _ in 0..ROUNDS {
                    let mut own: sync::StrongFn = sync::StrongFn::new(|| {});
                    own.clone_from(&anchor);
                    let copy = own.clone();
                    drop(own);
                    drop(copy);
                }
            });
        }
        for _ in 0..CALLERS {
            scope.spawn(|| {
                for _ in 0..ROUNDS {
                    assert!(weak.try_call(()).is_ok());
                }
            });
        }
    });

    assert_eq!(hits.get(), CALLERS * ROUNDS);
    assert_eq!(weak.strong_count(), 1);

    let during = sync::stats();
    assert_eq!(during.live, before.live + 1);
    assert_eq!(during.slots, during.live + during.free);
    // Each churner holds at most one fresh slot at a time; everything else
    // must have come off the free list.
    assert!(during.slots <= before.slots + CHURNERS + 1, "{during:?}");

    drop(anchor);
    assert!(weak.is_expired());

    let after = sync::stats();
    let allocated = after.allocations - before.allocations;
    assert_eq!(after.live, before.live);
    assert_eq!(after.slots, after.live + after.free);
    assert_eq!(allocated, (CHURNERS * ROUNDS + 1) as u64);
    assert_eq!(after.destroyed - before.destroyed, allocated);
}
