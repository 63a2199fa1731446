//! Error types of the crate.

use thiserror::Error;

use crate::SlotState;

/// Errors raised by the validated entry points.
///
/// Everything except [`Error::AllocationFailure`] is a contract violation on the caller side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Index is not below the capacity.
    #[error("index {index} out of range for capacity {capacity}")]
    OutOfRange { index: usize, capacity: usize },

    /// Dereferenced a slot that is not on the active list.
    #[error("invalid reference to slot {index} ({state:?})")]
    InvalidReference { index: usize, state: SlotState },

    /// The global allocator refused the arena.
    #[error("failed to allocate {bytes} bytes")]
    AllocationFailure { bytes: usize },

    /// Requested capacity does not fit the index width.
    #[error("capacity {requested} exceeds the maximum of {max} slots")]
    CapacityOverflow { requested: usize, max: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),

    /// Link structure is broken. Reported by the integrity check.
    #[error("corrupted links: {0}")]
    Corrupted(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
