//! Read-only views over the block list

use serde::Serialize;

use super::block::{Block, OwnerId};

/// Occupied versus free totals for the whole address space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemoryUtilization {
	pub total: usize,
	pub occupied: usize,
	pub occupied_percent: f64,
	pub free: usize,
	pub free_percent: f64,
}

impl MemoryUtilization {
	pub(crate) fn from_blocks(blocks: &[Block], total: usize) -> Self {
		let occupied: usize = blocks.iter().filter(|b| !b.is_free()).map(|b| b.size).sum();
		let free = total - occupied;

		Self {
			total,
			occupied,
			occupied_percent: percent_of(occupied, total),
			free,
			free_percent: percent_of(free, total),
		}
	}
}

fn percent_of(part: usize, total: usize) -> f64 {
	if total == 0 {
		0.0
	} else {
		(part as f64 / total as f64) * 100.0
	}
}

/// Free block statistics. `largest` and `smallest` are 0 when nothing is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FreeBlockInfo {
	pub count: usize,
	pub largest: usize,
	pub smallest: usize,
}

impl FreeBlockInfo {
	pub(crate) fn from_blocks(blocks: &[Block]) -> Self {
		blocks
			.iter()
			.filter(|b| b.is_free())
			.fold(None, |acc: Option<FreeBlockInfo>, b| {
				Some(match acc {
					None => FreeBlockInfo {
						count: 1,
						largest: b.size,
						smallest: b.size,
					},
					Some(info) => FreeBlockInfo {
						count: info.count + 1,
						largest: info.largest.max(b.size),
						smallest: info.smallest.min(b.size),
					},
				})
			})
			.unwrap_or_default()
	}
}

/// One row of the memory map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockSnapshot {
	pub start: usize,
	/// Inclusive
	pub end: usize,
	pub size: usize,
	pub owner: Option<OwnerId>,
}

impl BlockSnapshot {
	pub fn is_free(&self) -> bool {
		self.owner.is_none()
	}
}

impl From<&Block> for BlockSnapshot {
	fn from(block: &Block) -> Self {
		Self {
			start: block.start,
			end: block.end(),
			size: block.size,
			owner: block.owner(),
		}
	}
}
