use serde::Serialize;

/// Identifier of the simulated process holding a block.
pub type OwnerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockStatus {
	Free,
	Occupied(OwnerId),
}

/// A contiguous range of the address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
	pub start: usize,
	pub size: usize,
	pub status: BlockStatus,
}

impl Block {
	pub fn free(start: usize, size: usize) -> Self {
		Self {
			start,
			size,
			status: BlockStatus::Free,
		}
	}

	pub fn occupied(start: usize, size: usize, owner: OwnerId) -> Self {
		Self {
			start,
			size,
			status: BlockStatus::Occupied(owner),
		}
	}

	pub fn is_free(&self) -> bool {
		self.status == BlockStatus::Free
	}

	pub fn owner(&self) -> Option<OwnerId> {
		match self.status {
			BlockStatus::Occupied(owner) => Some(owner),
			BlockStatus::Free => None,
		}
	}

	/// One past the last address covered by this block.
	pub fn end_exclusive(&self) -> usize {
		self.start + self.size
	}

	/// Last address covered by this block.
	pub fn end(&self) -> usize {
		self.start + self.size - 1
	}
}
