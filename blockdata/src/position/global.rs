use crate::chunk::Chunk;
use crate::position::Side;
use std::fmt::{Debug, Display, Formatter, Result};

/// A block position in world coordinates.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct BlockPos {
	x: i32,
	y: i32,
	z: i32
}

impl BlockPos {
	pub fn new(x: i32, y: i32, z: i32) -> Self {
		BlockPos { x, y, z }
	}

	pub fn x(&self) -> i32 {
		self.x
	}

	pub fn y(&self) -> i32 {
		self.y
	}

	pub fn z(&self) -> i32 {
		self.z
	}

	pub fn offset(self, side: Side) -> Self {
		let (x, y, z) = side.offset();

		BlockPos::new(self.x + x, self.y + y, self.z + z)
	}

	pub fn manhattan_distance(self, other: BlockPos) -> u32 {
		(self.x - other.x).abs() as u32 + (self.y - other.y).abs() as u32 + (self.z - other.z).abs() as u32
	}

	/// Returns true if the Y component lies inside the world's vertical extent.
	pub fn in_world_height(&self) -> bool {
		self.y >= 0 && self.y < Chunk::SIZE_Y as i32
	}

	/// Returns the chunk containing this block. The Y component is ignored, since the world is
	/// a single chunk tall.
	pub fn chunk(&self) -> ChunkPos {
		ChunkPos::new(
			self.x.div_euclid(Chunk::SIZE_X as i32),
			self.z.div_euclid(Chunk::SIZE_Z as i32)
		)
	}

	/// Returns the position relative to the containing chunk, or None if the Y component is
	/// outside of the world.
	pub fn local(&self) -> Option<(usize, usize, usize)> {
		if !self.in_world_height() {
			return None;
		}

		Some((
			self.x.rem_euclid(Chunk::SIZE_X as i32) as usize,
			self.y as usize,
			self.z.rem_euclid(Chunk::SIZE_Z as i32) as usize
		))
	}
}

impl Display for BlockPos {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "({}, {}, {})", self.x, self.y, self.z)
	}
}

impl Debug for BlockPos {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "BlockPos {{ x: {}, y: {}, z: {} }}", self.x, self.y, self.z)
	}
}

/// The position of a chunk column in chunk coordinates.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct ChunkPos {
	x: i32,
	z: i32
}

impl ChunkPos {
	pub fn new(x: i32, z: i32) -> Self {
		ChunkPos { x, z }
	}

	pub fn x(&self) -> i32 {
		self.x
	}

	pub fn z(&self) -> i32 {
		self.z
	}

	/// Returns the neighboring chunk across the given face, or None for the vertical faces.
	pub fn adjacent(self, side: Side) -> Option<ChunkPos> {
		if side.vertical() {
			return None;
		}

		let (x, _, z) = side.offset();

		Some(ChunkPos::new(self.x + x, self.z + z))
	}

	/// The world position of the block at local (0, 0, 0).
	pub fn origin(&self) -> BlockPos {
		BlockPos::new(self.x * Chunk::SIZE_X as i32, 0, self.z * Chunk::SIZE_Z as i32)
	}

	/// Converts a chunk-local position into world coordinates.
	pub fn block(&self, x: usize, y: usize, z: usize) -> BlockPos {
		let origin = self.origin();

		BlockPos::new(origin.x + x as i32, y as i32, origin.z + z as i32)
	}
}

impl Display for ChunkPos {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "({}, {})", self.x, self.z)
	}
}

impl Debug for ChunkPos {
	fn fmt(&self, f: &mut Formatter) -> Result {
		write!(f, "ChunkPos {{ x: {}, z: {} }}", self.x, self.z)
	}
}
