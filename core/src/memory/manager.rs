//! Memory manager implementation
//!
//! Tracks the simulated address space as an ordered, gapless list of blocks.
//! Allocation picks a free block with the requested strategy and splits off
//! the remainder; deallocation frees the owner's block and coalesces runs of
//! adjacent free blocks.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use super::block::{Block, BlockStatus, OwnerId};
use super::stats::{BlockSnapshot, FreeBlockInfo, MemoryUtilization};
use super::strategy::AllocationStrategy;
use crate::{MemError, MemResult};

/// Memory manager
#[derive(Debug, Clone)]
pub struct MemoryManager {
	blocks: Vec<Block>,
	total_memory_size: usize,
}

impl MemoryManager {
	/// Create a manager whose address space is a single free block of `total_memory_size` units
	pub fn new(total_memory_size: usize) -> MemResult<Self> {
		if total_memory_size == 0 {
			return Err(MemError::InvalidConfiguration(
				"Total memory size must be positive".to_string(),
			));
		}

		info!(total_memory_size, "Memory manager initialized");

		Ok(Self {
			blocks: vec![Block::free(0, total_memory_size)],
			total_memory_size,
		})
	}

	/// Build a manager over an arbitrary block list, bypassing the invariants
	#[cfg(test)]
	pub(crate) fn from_blocks(total_memory_size: usize, blocks: Vec<Block>) -> Self {
		Self {
			blocks,
			total_memory_size,
		}
	}

	pub fn total_memory_size(&self) -> usize {
		self.total_memory_size
	}

	/// The block list in address order
	pub fn blocks(&self) -> &[Block] {
		&self.blocks
	}

	/// The block currently held by `owner`, if any
	pub fn block_of(&self, owner: OwnerId) -> Option<&Block> {
		self.blocks.iter().find(|b| b.owner() == Some(owner))
	}

	/// Allocate `size_required` units for `owner` and return the start address
	pub fn allocate(
		&mut self,
		owner: OwnerId,
		size_required: usize,
		strategy: AllocationStrategy,
	) -> MemResult<usize> {
		if size_required == 0 {
			warn!(owner, "Allocation rejected: requested size must be positive");
			return Err(MemError::InvalidRequest(
				"Requested size must be positive".to_string(),
			));
		}

		if let Some(held) = self.block_of(owner) {
			warn!(owner, start = held.start, "Allocation rejected: owner already holds a block");
			return Err(MemError::InvalidRequest(format!(
				"P{} already holds memory at {}",
				owner, held.start
			)));
		}

		let index = match strategy {
			AllocationStrategy::FirstFit => self.find_first_fit(size_required),
			AllocationStrategy::BestFit => self.find_best_fit(size_required),
		};

		let Some(index) = index else {
			let largest_free = self.free_block_info().largest;
			warn!(
				owner,
				size_required,
				%strategy,
				largest_free,
				"Allocation failed: no suitable free block"
			);
			return Err(MemError::OutOfMemory {
				requested: size_required,
				largest_free,
			});
		};

		let candidate = self.blocks[index];
		if candidate.size == size_required {
			self.blocks[index].status = BlockStatus::Occupied(owner);
			info!(owner, size_required, start = candidate.start, %strategy, "Allocated (exact fit)");
		} else {
			let occupied = Block::occupied(candidate.start, size_required, owner);
			let remainder = Block::free(
				candidate.start + size_required,
				candidate.size - size_required,
			);
			self.blocks[index] = occupied;
			self.blocks.insert(index + 1, remainder);
			info!(owner, size_required, start = candidate.start, %strategy, "Allocated (split)");
		}

		debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());
		Ok(candidate.start)
	}

	/// Release the block held by `owner` and merge it with free neighbours
	pub fn deallocate(&mut self, owner: OwnerId) -> MemResult<()> {
		let Some(block) = self.blocks.iter_mut().find(|b| b.owner() == Some(owner)) else {
			warn!(owner, "Deallocation failed: owner holds no memory");
			return Err(MemError::UnknownOwner(owner));
		};

		block.status = BlockStatus::Free;
		info!(owner, start = block.start, size = block.size, "Deallocated");

		self.coalesce();

		debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());
		Ok(())
	}

	/// Get occupied and free totals with percentages
	pub fn utilization(&self) -> MemoryUtilization {
		MemoryUtilization::from_blocks(&self.blocks, self.total_memory_size)
	}

	/// Get count, largest and smallest of the free blocks
	pub fn free_block_info(&self) -> FreeBlockInfo {
		FreeBlockInfo::from_blocks(&self.blocks)
	}

	/// Snapshot of the memory map in address order
	pub fn snapshot(&self) -> Vec<BlockSnapshot> {
		self.blocks.iter().map(BlockSnapshot::from).collect()
	}

	/// Verify the block list invariants.
	///
	/// Returns `MemError::Internal` describing the first violation found.
	pub fn check_invariants(&self) -> MemResult<()> {
		let Some(first) = self.blocks.first() else {
			return Err(MemError::Internal("block list is empty".to_string()));
		};
		if first.start != 0 {
			return Err(MemError::Internal(format!(
				"first block starts at {} instead of 0",
				first.start
			)));
		}

		let mut owners = Vec::new();
		for block in &self.blocks {
			if block.size == 0 {
				return Err(MemError::Internal(format!(
					"zero-sized block at {}",
					block.start
				)));
			}
			if let Some(owner) = block.owner() {
				if owners.contains(&owner) {
					return Err(MemError::Internal(format!("P{} owns two blocks", owner)));
				}
				owners.push(owner);
			}
		}

		for pair in self.blocks.windows(2) {
			let (prev, next) = (&pair[0], &pair[1]);
			if prev.end_exclusive() != next.start {
				return Err(MemError::Internal(format!(
					"gap or overlap between block at {} and block at {}",
					prev.start, next.start
				)));
			}
			if prev.is_free() && next.is_free() {
				return Err(MemError::Internal(format!(
					"adjacent free blocks at {} and {}",
					prev.start, next.start
				)));
			}
		}

		let covered: usize = self.blocks.iter().map(|b| b.size).sum();
		if covered != self.total_memory_size {
			return Err(MemError::Internal(format!(
				"blocks cover {} units but total is {}",
				covered, self.total_memory_size
			)));
		}

		Ok(())
	}

	fn find_first_fit(&self, size_required: usize) -> Option<usize> {
		self.blocks
			.iter()
			.position(|b| b.is_free() && b.size >= size_required)
	}

	fn find_best_fit(&self, size_required: usize) -> Option<usize> {
		let mut best: Option<(usize, usize)> = None;

		for (index, block) in self.blocks.iter().enumerate() {
			if !block.is_free() || block.size < size_required {
				continue;
			}
			let leftover = block.size - size_required;
			// Strictly smaller only, so the leftmost block wins ties
			if best.is_none_or(|(_, min)| leftover < min) {
				best = Some((index, leftover));
			}
		}

		best.map(|(index, _)| index)
	}

	/// Merge every run of consecutive free blocks into one
	pub(crate) fn coalesce(&mut self) {
		let before = self.blocks.len();
		let mut merged: Vec<Block> = Vec::with_capacity(before);

		for block in self.blocks.drain(..) {
			match merged.last_mut() {
				Some(prev) if prev.is_free() && block.is_free() => prev.size += block.size,
				_ => merged.push(block),
			}
		}

		merged.sort_by_key(|b| b.start);
		self.blocks = merged;

		if self.blocks.len() != before {
			debug!(
				merged = before - self.blocks.len(),
				blocks = self.blocks.len(),
				"Coalesced free blocks"
			);
		}
	}
}

/// Thread-safe wrapper around MemoryManager
pub type SharedMemoryManager = Arc<Mutex<MemoryManager>>;
