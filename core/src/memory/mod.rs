//! Memory management module
//!
//! Block-list bookkeeping for the simulated address space.

pub mod block;
pub mod manager;
pub mod stats;
pub mod strategy;

pub use block::{Block, BlockStatus, OwnerId};
pub use manager::{MemoryManager, SharedMemoryManager};
pub use stats::{BlockSnapshot, FreeBlockInfo, MemoryUtilization};
pub use strategy::AllocationStrategy;
