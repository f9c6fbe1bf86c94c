use crate::block::{Block, BlockId, BlockManager};
use crate::chunk::{Chunk, LightChannel};
use crate::position::{BlockPos, ChunkPos};
use log::warn;
use rustc_hash::FxHashMap;
use std::collections::hash_map::{Values, ValuesMut};
use std::sync::Arc;

/// The set of loaded chunks, addressed in world block coordinates.
pub struct World {
	chunks: FxHashMap<ChunkPos, Chunk>,
	blocks: Arc<BlockManager>
}

impl World {
	pub fn new(blocks: Arc<BlockManager>) -> Self {
		World { chunks: FxHashMap::default(), blocks }
	}

	pub fn blocks(&self) -> &BlockManager {
		&self.blocks
	}

	pub fn block_manager(&self) -> Arc<BlockManager> {
		self.blocks.clone()
	}

	/// Loads a chunk, returning the chunk previously loaded at the same position.
	pub fn add_chunk(&mut self, chunk: Chunk) -> Option<Chunk> {
		self.chunks.insert(chunk.position(), chunk)
	}

	pub fn remove_chunk(&mut self, position: ChunkPos) -> Option<Chunk> {
		self.chunks.remove(&position)
	}

	pub fn chunk(&self, position: ChunkPos) -> Option<&Chunk> {
		self.chunks.get(&position)
	}

	pub fn chunk_mut(&mut self, position: ChunkPos) -> Option<&mut Chunk> {
		self.chunks.get_mut(&position)
	}

	pub fn is_loaded(&self, position: ChunkPos) -> bool {
		self.chunks.contains_key(&position)
	}

	pub fn len(&self) -> usize {
		self.chunks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chunks.is_empty()
	}

	pub fn chunks(&self) -> Values<ChunkPos, Chunk> {
		self.chunks.values()
	}

	pub fn chunks_mut(&mut self) -> ValuesMut<ChunkPos, Chunk> {
		self.chunks.values_mut()
	}

	/// Splits the world into the block table and the chunks, so that both can be borrowed at once.
	pub fn split_mut(&mut self) -> (&BlockManager, &mut FxHashMap<ChunkPos, Chunk>) {
		(&self.blocks, &mut self.chunks)
	}

	pub fn block_id_at(&self, position: BlockPos) -> Option<BlockId> {
		let (x, y, z) = position.local()?;

		self.chunks.get(&position.chunk())?.block(x, y, z).ok()
	}

	/// Returns the block at the position, or None if the position is not loaded.
	pub fn block_at(&self, position: BlockPos) -> Option<Block> {
		let id = self.block_id_at(position)?;

		let block = self.blocks.get(id);

		if block.is_none() {
			warn!("unknown block id {} at {}", id, position);
		}

		block
	}

	/// Replaces the block at the position, returning the previous block id. Returns None and
	/// leaves the world untouched if the position is not loaded.
	pub fn set_block_at(&mut self, position: BlockPos, block: BlockId) -> Option<BlockId> {
		let (x, y, z) = position.local()?;

		match self.chunks.get_mut(&position.chunk()) {
			Some(chunk) => chunk.set_block(x, y, z, block).ok(),
			None => {
				warn!("ignoring block change at {}: chunk {} is not loaded", position, position.chunk());
				None
			}
		}
	}

	pub fn luminance_at(&self, channel: LightChannel, position: BlockPos) -> Option<u8> {
		let (x, y, z) = position.local()?;

		self.chunks.get(&position.chunk())?.luminance(channel, x, y, z).ok()
	}

	/// Sets a light value. Returns false if the position is not loaded.
	pub fn set_luminance_at(&mut self, channel: LightChannel, position: BlockPos, value: u8) -> bool {
		let (x, y, z) = match position.local() {
			Some(local) => local,
			None => return false
		};

		match self.chunks.get_mut(&position.chunk()) {
			Some(chunk) => chunk.set_luminance(channel, x, y, z, value).is_ok(),
			None => false
		}
	}
}
