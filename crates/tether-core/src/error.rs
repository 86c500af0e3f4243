//! Error types for tether callbacks.
//!
//! Neither type is produced on the plain `call()` paths: an expired weak
//! callback is a silent no-op there. [`CallError`] only exists for callers
//! that opt into `try_call()` to learn whether a dispatch happened.

use std::error::Error;
use std::fmt;

use crate::id::Generation;

/// Why a `try_call()` did not reach a callable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallError {
    /// The reference was never bound to a callable, or has been reset.
    Empty,
    /// The slot this reference points at has been released (and possibly
    /// reused by an unrelated allocation).
    Expired {
        /// The generation encoded in the reference's handle.
        generation: Generation,
    },
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "callback reference is empty"),
            Self::Expired { generation } => {
                write!(f, "callback expired: generation {generation} no longer live")
            }
        }
    }
}

impl Error for CallError {}

/// Errors detected while configuring an allocator domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested slot capacity cannot be addressed by a slot index.
    CapacityOverflow {
        /// The configured capacity.
        requested: usize,
        /// The largest addressable slot count.
        max: usize,
    },
    /// The domain's allocator was already created; configuration must
    /// happen before the first callback of that domain is constructed.
    AlreadyInitialized {
        /// Name of the domain that rejected the configuration.
        domain: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested, max } => {
                write!(f, "initial capacity {requested} exceeds maximum slot count {max}")
            }
            Self::AlreadyInitialized { domain } => {
                write!(f, "{domain} allocator already initialized")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_error_display() {
        assert_eq!(CallError::Empty.to_string(), "callback reference is empty");
        let e = CallError::Expired {
            generation: Generation(4),
        };
        assert_eq!(
            e.to_string(),
            "callback expired: generation 4 no longer live"
        );
    }

    #[test]
    fn config_error_display() {
        let e = ConfigError::AlreadyInitialized { domain: "shared" };
        assert_eq!(e.to_string(), "shared allocator already initialized");
        let e = ConfigError::CapacityOverflow {
            requested: 10,
            max: 5,
        };
        assert!(e.to_string().contains("exceeds maximum slot count 5"));
    }

    #[test]
    fn errors_are_std_errors() {
        fn assert_error<E: Error + Send + Sync + 'static>() {}
        assert_error::<CallError>();
        assert_error::<ConfigError>();
    }
}
