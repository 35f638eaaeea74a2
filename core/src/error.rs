use thiserror::Error;

use crate::memory::OwnerId;

pub type MemResult<T> = Result<T, MemError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown allocation strategy: {0}")]
    UnknownStrategy(String),

    #[error("Out of memory: requested {requested} units, largest free block is {largest_free}")]
    OutOfMemory { requested: usize, largest_free: usize },

    #[error("No memory allocated to P{0}")]
    UnknownOwner(OwnerId),

    /// Block list invariant broken. Always a bug, never a user error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MemError {
    /// True for errors the caller caused and can recover from.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, MemError::Internal(_))
    }
}
