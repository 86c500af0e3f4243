//! Arena configuration parameters.

use tether_core::ConfigError;

/// Configuration for a callable allocator's slot arena.
///
/// Validated before an allocator is built from it; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Number of slots reserved up front.
    ///
    /// The arena grows past this on demand and never shrinks, so this only
    /// moves the first reallocations out of the hot path. Default: 64.
    pub initial_capacity: usize,
}

impl ArenaConfig {
    /// Default number of slots reserved at construction.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

    /// Largest slot count addressable by a 32-bit slot index.
    pub const MAX_SLOTS: usize = u32::MAX as usize;

    /// Create a config reserving `initial_capacity` slots.
    pub fn new(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }

    /// Check that the config can be honoured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity > Self::MAX_SLOTS {
            return Err(ConfigError::CapacityOverflow {
                requested: self.initial_capacity,
                max: Self::MAX_SLOTS,
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}
