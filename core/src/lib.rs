//! memsim - main memory allocation simulator
//!
//! Models a fixed-size address space as an ordered list of blocks and places
//! requests with first-fit or best-fit, splitting and coalescing as it goes.

pub mod error;
pub mod memory;

pub use error::{MemError, MemResult};
pub use memory::{
	AllocationStrategy, Block, BlockSnapshot, BlockStatus, FreeBlockInfo, MemoryManager,
	MemoryUtilization, OwnerId, SharedMemoryManager,
};
