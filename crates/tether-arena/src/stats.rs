//! Allocator counters.
//!
//! [`ArenaStats`] is a point-in-time copy of an allocator's occupancy and
//! cumulative activity counters, for telemetry and leak checks in tests.

/// Occupancy and cumulative counters for one allocator.
///
/// Occupancy fields describe the arena at the moment the stats were taken.
/// Cumulative fields count events since the allocator was created.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Total slots in the table (live + free).
    pub slots: usize,
    /// Slots currently holding a callable.
    pub live: usize,
    /// Slots on the free list, available for reuse.
    pub free: usize,
    /// Cumulative number of allocations.
    pub allocations: u64,
    /// Cumulative number of allocations served from the free list.
    pub reused: u64,
    /// Cumulative number of slots whose count reached zero.
    pub destroyed: u64,
    /// Cumulative number of dispatches that reached a callable.
    pub calls: u64,
    /// Cumulative number of safe calls that found no live callable.
    pub expired_calls: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let s = ArenaStats::default();
        assert_eq!(s.slots, 0);
        assert_eq!(s.live, 0);
        assert_eq!(s.free, 0);
        assert_eq!(s.allocations, 0);
        assert_eq!(s.reused, 0);
        assert_eq!(s.destroyed, 0);
        assert_eq!(s.calls, 0);
        assert_eq!(s.expired_calls, 0);
    }
}
