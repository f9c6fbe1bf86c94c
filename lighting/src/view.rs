use rustc_hash::FxHashMap;
use tera_blockdata::{Block, BlockManager, BlockPos, Chunk, ChunkPos, LightChannel, Region3i, World};

/// Block and light access for the propagators, in world block coordinates. Positions that are out
/// of bounds read as None and ignore writes, so light never travels into or out of them.
pub trait LightingWorldView {
	fn get_block_at(&self, position: BlockPos) -> Option<Block>;
	fn get_luminance_at(&self, channel: LightChannel, position: BlockPos) -> Option<u8>;

	/// Sets a light value, returning false if the position is out of bounds.
	fn set_luminance_at(&mut self, channel: LightChannel, position: BlockPos, value: u8) -> bool;

	fn is_in_bounds(&self, position: BlockPos) -> bool;
}

impl<'v, V> LightingWorldView for &'v mut V where V: LightingWorldView + ?Sized {
	fn get_block_at(&self, position: BlockPos) -> Option<Block> {
		(**self).get_block_at(position)
	}

	fn get_luminance_at(&self, channel: LightChannel, position: BlockPos) -> Option<u8> {
		(**self).get_luminance_at(channel, position)
	}

	fn set_luminance_at(&mut self, channel: LightChannel, position: BlockPos, value: u8) -> bool {
		(**self).set_luminance_at(channel, position, value)
	}

	fn is_in_bounds(&self, position: BlockPos) -> bool {
		(**self).is_in_bounds(position)
	}
}

/// A view of a single chunk.
pub struct ChunkView<'a> {
	chunk: &'a mut Chunk,
	blocks: &'a BlockManager
}

impl<'a> ChunkView<'a> {
	pub fn new(chunk: &'a mut Chunk, blocks: &'a BlockManager) -> Self {
		ChunkView { chunk, blocks }
	}

	pub fn chunk(&self) -> &Chunk {
		&*self.chunk
	}

	fn local(&self, position: BlockPos) -> Option<(usize, usize, usize)> {
		if position.chunk() == self.chunk.position() {
			position.local()
		} else {
			None
		}
	}
}

impl<'a> LightingWorldView for ChunkView<'a> {
	fn get_block_at(&self, position: BlockPos) -> Option<Block> {
		let (x, y, z) = self.local(position)?;

		self.blocks.get(self.chunk.block(x, y, z).ok()?)
	}

	fn get_luminance_at(&self, channel: LightChannel, position: BlockPos) -> Option<u8> {
		let (x, y, z) = self.local(position)?;

		self.chunk.luminance(channel, x, y, z).ok()
	}

	fn set_luminance_at(&mut self, channel: LightChannel, position: BlockPos, value: u8) -> bool {
		match self.local(position) {
			Some((x, y, z)) => self.chunk.set_luminance(channel, x, y, z, value).is_ok(),
			None => false
		}
	}

	fn is_in_bounds(&self, position: BlockPos) -> bool {
		self.local(position).is_some()
	}
}

/// A view of the loaded chunks of a world, optionally limited to a rectangle of chunks.
pub struct WorldView<'a> {
	world: &'a mut World,
	/// Inclusive chunk bounds, or None for every loaded chunk.
	bounds: Option<(ChunkPos, ChunkPos)>
}

impl<'a> WorldView<'a> {
	/// Every loaded chunk.
	pub fn whole(world: &'a mut World) -> Self {
		WorldView { world, bounds: None }
	}

	/// The chunk and its 8 surrounding chunks. A single light update never reaches further than
	/// that.
	pub fn around(world: &'a mut World, center: ChunkPos) -> Self {
		WorldView::between(
			world,
			ChunkPos::new(center.x() - 1, center.z() - 1),
			ChunkPos::new(center.x() + 1, center.z() + 1)
		)
	}

	/// The chunks between both corners, inclusive.
	pub fn between(world: &'a mut World, a: ChunkPos, b: ChunkPos) -> Self {
		let min = ChunkPos::new(a.x().min(b.x()), a.z().min(b.z()));
		let max = ChunkPos::new(a.x().max(b.x()), a.z().max(b.z()));

		WorldView { world, bounds: Some((min, max)) }
	}

	pub fn world(&self) -> &World {
		&*self.world
	}

	fn contains_chunk(&self, chunk: ChunkPos) -> bool {
		match self.bounds {
			Some((min, max)) => chunk.x() >= min.x() && chunk.x() <= max.x() && chunk.z() >= min.z() && chunk.z() <= max.z(),
			None => true
		}
	}
}

impl<'a> LightingWorldView for WorldView<'a> {
	fn get_block_at(&self, position: BlockPos) -> Option<Block> {
		if self.contains_chunk(position.chunk()) {
			self.world.block_at(position)
		} else {
			None
		}
	}

	fn get_luminance_at(&self, channel: LightChannel, position: BlockPos) -> Option<u8> {
		if self.contains_chunk(position.chunk()) {
			self.world.luminance_at(channel, position)
		} else {
			None
		}
	}

	fn set_luminance_at(&mut self, channel: LightChannel, position: BlockPos, value: u8) -> bool {
		self.contains_chunk(position.chunk()) && self.world.set_luminance_at(channel, position, value)
	}

	fn is_in_bounds(&self, position: BlockPos) -> bool {
		position.in_world_height() && self.contains_chunk(position.chunk()) && self.world.is_loaded(position.chunk())
	}
}

/// Records the original value of every light cell written through it, so that the exact region
/// of changed cells can be reported afterwards.
pub struct TrackingView<V> {
	inner: V,
	original: FxHashMap<(LightChannel, BlockPos), u8>
}

impl<V> TrackingView<V> where V: LightingWorldView {
	pub fn new(inner: V) -> Self {
		TrackingView { inner, original: FxHashMap::default() }
	}

	/// The smallest region holding every cell whose value differs from its value before the
	/// first write.
	pub fn changed_region(&self) -> Region3i {
		self.changed().fold(Region3i::EMPTY, |region, (_, position)| region.encompass(position))
	}

	/// Like `changed_region`, limited to a single channel.
	pub fn changed_region_of(&self, channel: LightChannel) -> Region3i {
		self.changed()
			.filter(|&(changed, _)| changed == channel)
			.fold(Region3i::EMPTY, |region, (_, position)| region.encompass(position))
	}

	pub fn changed_count(&self) -> usize {
		self.changed().count()
	}

	fn changed(&self) -> impl Iterator<Item = (LightChannel, BlockPos)> + '_ {
		self.original.iter()
			.filter(move |&(&(channel, position), &value)| self.inner.get_luminance_at(channel, position) != Some(value))
			.map(|(&key, _)| key)
	}

	/// Forgets every recorded value, making the current state the new baseline.
	pub fn reset(&mut self) {
		self.original.clear();
	}

	pub fn into_inner(self) -> V {
		self.inner
	}
}

impl<V> LightingWorldView for TrackingView<V> where V: LightingWorldView {
	fn get_block_at(&self, position: BlockPos) -> Option<Block> {
		self.inner.get_block_at(position)
	}

	fn get_luminance_at(&self, channel: LightChannel, position: BlockPos) -> Option<u8> {
		self.inner.get_luminance_at(channel, position)
	}

	fn set_luminance_at(&mut self, channel: LightChannel, position: BlockPos, value: u8) -> bool {
		if let Some(current) = self.inner.get_luminance_at(channel, position) {
			self.original.entry((channel, position)).or_insert(current);
		}

		self.inner.set_luminance_at(channel, position, value)
	}

	fn is_in_bounds(&self, position: BlockPos) -> bool {
		self.inner.is_in_bounds(position)
	}
}

#[cfg(test)]
mod test {
	use crate::testkit;
	use crate::view::{ChunkView, LightingWorldView, TrackingView, WorldView};
	use tera_blockdata::{BlockPos, ChunkPos, LightChannel, Region3i};

	#[test]
	fn test_world_view_bounds() {
		let mut world = testkit::dark_world(&[(0, 0), (1, 0), (3, 0)]);
		let view = WorldView::around(&mut world, ChunkPos::new(0, 0));

		assert!(view.is_in_bounds(BlockPos::new(17, 3, 0)));
		assert!(view.get_block_at(BlockPos::new(17, 3, 0)).is_some());

		// not loaded
		assert!(!view.is_in_bounds(BlockPos::new(-1, 3, 0)));
		// loaded, but out of the view
		assert!(!view.is_in_bounds(BlockPos::new(50, 3, 0)));
		assert_eq!(view.get_block_at(BlockPos::new(50, 3, 0)), None);
		assert!(!view.is_in_bounds(BlockPos::new(0, 256, 0)));
	}

	#[test]
	fn test_world_view_writes() {
		let mut world = testkit::dark_world(&[(0, 0), (3, 0)]);

		{
			let mut view = WorldView::around(&mut world, ChunkPos::new(0, 0));

			assert!(view.set_luminance_at(LightChannel::Light, BlockPos::new(4, 10, 4), 7));
			assert!(!view.set_luminance_at(LightChannel::Light, BlockPos::new(50, 10, 4), 7));
			assert_eq!(view.get_luminance_at(LightChannel::Light, BlockPos::new(4, 10, 4)), Some(7));
		}

		assert_eq!(world.luminance_at(LightChannel::Light, BlockPos::new(50, 10, 4)), Some(0));
	}

	#[test]
	fn test_chunk_view() {
		let mut world = testkit::dark_world(&[(-1, 2)]);
		let blocks = world.block_manager();
		let chunk = world.chunk_mut(ChunkPos::new(-1, 2)).unwrap();
		let mut view = ChunkView::new(chunk, &blocks);

		assert!(view.is_in_bounds(BlockPos::new(-16, 0, 32)));
		assert!(!view.is_in_bounds(BlockPos::new(0, 0, 32)));
		assert!(view.set_luminance_at(LightChannel::Sunlight, BlockPos::new(-1, 255, 47), 15));
		assert_eq!(view.chunk().luminance(LightChannel::Sunlight, 15, 255, 15).unwrap(), 15);
	}

	#[test]
	fn test_tracking_view() {
		let mut world = testkit::dark_world(&[(0, 0)]);
		let mut view = TrackingView::new(WorldView::whole(&mut world));

		view.set_luminance_at(LightChannel::Light, BlockPos::new(1, 1, 1), 5);
		view.set_luminance_at(LightChannel::Light, BlockPos::new(3, 2, 1), 5);
		view.set_luminance_at(LightChannel::Sunlight, BlockPos::new(9, 9, 9), 4);

		// written, then restored
		view.set_luminance_at(LightChannel::Light, BlockPos::new(9, 9, 9), 5);
		view.set_luminance_at(LightChannel::Light, BlockPos::new(9, 9, 9), 0);

		assert_eq!(view.changed_count(), 3);
		assert_eq!(view.changed_region_of(LightChannel::Light), Region3i::from_corners(BlockPos::new(1, 1, 1), BlockPos::new(3, 2, 1)));
		assert_eq!(view.changed_region(), Region3i::from_corners(BlockPos::new(1, 1, 1), BlockPos::new(9, 9, 9)));

		view.reset();
		assert!(view.changed_region().is_empty());
	}
}
