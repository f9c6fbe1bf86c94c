use crate::array::{Deflator, Shape, SharedArray, TeraArray};
use crate::block::BlockId;
use crate::config::ChunkConfig;
use crate::error::Result;
use crate::position::ChunkPos;
use crate::registry::{ArrayRegistry, EncodedArray};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// One of the two light channels stored in every chunk.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LightChannel {
	/// Light coming from the sky.
	Sunlight,
	/// Light emitted by luminous blocks.
	Light
}

impl LightChannel {
	pub fn all() -> [LightChannel; 2] {
		[LightChannel::Sunlight, LightChannel::Light]
	}
}

/// A 16x256x16 column of blocks. Each chunk owns one array for block ids, one per light channel,
/// and one per configured extra data channel.
#[derive(Debug, Clone)]
pub struct Chunk {
	position: ChunkPos,
	blocks: SharedArray,
	sunlight: SharedArray,
	light: SharedArray,
	extra: Vec<(String, SharedArray)>
}

impl Chunk {
	pub const SIZE_X: usize = 16;
	pub const SIZE_Y: usize = 256;
	pub const SIZE_Z: usize = 16;

	pub fn shape() -> Result<Shape> {
		Shape::new(Chunk::SIZE_X, Chunk::SIZE_Y, Chunk::SIZE_Z)
	}

	/// Creates an empty chunk: every block is air and every light channel is dark.
	pub fn new(position: ChunkPos, config: &ChunkConfig, registry: &ArrayRegistry) -> Result<Self> {
		let shape = Chunk::shape()?;

		let mut extra = Vec::with_capacity(config.extra_data.len());

		for channel in &config.extra_data {
			extra.push((channel.name.clone(), registry.create(&channel.kind, shape)?));
		}

		Chunk::from_arrays(
			position,
			registry.create(&config.blocks, shape)?,
			registry.create(&config.sunlight, shape)?,
			registry.create(&config.light, shape)?,
			extra
		)
	}

	/// Assembles a chunk from existing arrays, which must all have the chunk shape.
	pub fn from_arrays(position: ChunkPos, blocks: TeraArray, sunlight: TeraArray, light: TeraArray, extra: Vec<(String, TeraArray)>) -> Result<Self> {
		let shape = Chunk::shape()?;

		let check = |array: &TeraArray| if array.shape() == shape {
			Ok(())
		} else {
			Err(array.shape().invalid("chunk arrays must be 16x256x16"))
		};

		check(&blocks)?;
		check(&sunlight)?;
		check(&light)?;

		for (_, array) in &extra {
			check(array)?;
		}

		Ok(Chunk {
			position,
			blocks: blocks.into(),
			sunlight: sunlight.into(),
			light: light.into(),
			extra: extra.into_iter().map(|(name, array)| (name, array.into())).collect()
		})
	}

	pub fn position(&self) -> ChunkPos {
		self.position
	}

	pub fn blocks(&self) -> &SharedArray {
		&self.blocks
	}

	pub fn blocks_mut(&mut self) -> &mut TeraArray {
		self.blocks.get_mut()
	}

	pub fn light_array(&self, channel: LightChannel) -> &SharedArray {
		match channel {
			LightChannel::Sunlight => &self.sunlight,
			LightChannel::Light => &self.light
		}
	}

	pub fn light_array_mut(&mut self, channel: LightChannel) -> &mut TeraArray {
		match channel {
			LightChannel::Sunlight => self.sunlight.get_mut(),
			LightChannel::Light => self.light.get_mut()
		}
	}

	pub fn extra_data(&self, name: &str) -> Option<&SharedArray> {
		self.extra.iter().find(|(channel, _)| channel == name).map(|(_, array)| array)
	}

	pub fn extra_data_mut(&mut self, name: &str) -> Option<&mut TeraArray> {
		self.extra.iter_mut().find(|(channel, _)| channel == name).map(|(_, array)| array.get_mut())
	}

	pub fn extra_data_names(&self) -> impl Iterator<Item = &str> {
		self.extra.iter().map(|(name, _)| name.as_str())
	}

	pub fn block(&self, x: usize, y: usize, z: usize) -> Result<BlockId> {
		Ok(BlockId(self.blocks.get(x, y, z)?))
	}

	/// Sets the block at the position, returning the previous block.
	pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: BlockId) -> Result<BlockId> {
		Ok(BlockId(self.blocks.get_mut().set(x, y, z, block.0)?))
	}

	/// Replaces the block only if the current block is `expected`. Safe to call from several
	/// threads sharing the chunk.
	pub fn compare_and_set_block(&self, x: usize, y: usize, z: usize, block: BlockId, expected: BlockId) -> Result<bool> {
		self.blocks.compare_and_set(x, y, z, block.0, expected.0)
	}

	pub fn luminance(&self, channel: LightChannel, x: usize, y: usize, z: usize) -> Result<u8> {
		Ok(self.light_array(channel).get(x, y, z)? as u8)
	}

	/// Sets a light value, returning the previous value.
	pub fn set_luminance(&mut self, channel: LightChannel, x: usize, y: usize, z: usize, value: u8) -> Result<u8> {
		Ok(self.light_array_mut(channel).set(x, y, z, value as u16)? as u8)
	}

	/// Converts every array into the representation chosen by the deflator.
	pub fn deflate<D>(&mut self, deflator: &D) where D: Deflator {
		let before = self.estimated_memory_consumption_in_bytes();

		for array in self.arrays_mut() {
			let deflated = array.get_mut().deflate(deflator);
			array.replace(deflated);
		}

		debug!("deflated chunk {}: {} bytes -> {} bytes", self.position, before, self.estimated_memory_consumption_in_bytes());
	}

	fn arrays(&self) -> impl Iterator<Item = &SharedArray> {
		vec![&self.blocks, &self.sunlight, &self.light].into_iter().chain(self.extra.iter().map(|(_, array)| array))
	}

	fn arrays_mut(&mut self) -> impl Iterator<Item = &mut SharedArray> {
		vec![&mut self.blocks, &mut self.sunlight, &mut self.light].into_iter().chain(self.extra.iter_mut().map(|(_, array)| array))
	}

	pub fn estimated_memory_consumption_in_bytes(&self) -> usize {
		self.arrays().map(|array| array.read().estimated_memory_consumption_in_bytes()).sum()
	}

	/// Serializes every array of the chunk with the handlers of the registry.
	pub fn encode(&self, registry: &ArrayRegistry) -> Result<EncodedChunk> {
		let mut extra = Vec::with_capacity(self.extra.len());

		for (name, array) in &self.extra {
			extra.push((name.clone(), registry.encode(&array.read())?));
		}

		Ok(EncodedChunk {
			x: self.position.x(),
			z: self.position.z(),
			blocks: registry.encode(&self.blocks.read())?,
			sunlight: registry.encode(&self.sunlight.read())?,
			light: registry.encode(&self.light.read())?,
			extra
		})
	}

	/// Rebuilds a chunk from its serialized arrays. Failures are logged before being returned, as
	/// the caller usually just skips the chunk.
	pub fn decode(encoded: &EncodedChunk, registry: &ArrayRegistry) -> Result<Self> {
		let decoded = Chunk::decode_arrays(encoded, registry);

		if let Err(ref error) = decoded {
			warn!("failed to decode chunk ({}, {}): {}", encoded.x, encoded.z, error);
		}

		decoded
	}

	fn decode_arrays(encoded: &EncodedChunk, registry: &ArrayRegistry) -> Result<Self> {
		let mut extra = Vec::with_capacity(encoded.extra.len());

		for (name, array) in &encoded.extra {
			extra.push((name.clone(), registry.decode(array)?));
		}

		Chunk::from_arrays(
			ChunkPos::new(encoded.x, encoded.z),
			registry.decode(&encoded.blocks)?,
			registry.decode(&encoded.sunlight)?,
			registry.decode(&encoded.light)?,
			extra
		)
	}
}

/// The serialized arrays of a chunk. Framing and compression are left to the storage layer.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct EncodedChunk {
	pub x: i32,
	pub z: i32,
	pub blocks: EncodedArray,
	pub sunlight: EncodedArray,
	pub light: EncodedArray,
	pub extra: Vec<(String, EncodedArray)>
}

impl EncodedChunk {
	pub fn to_json(&self) -> ::std::result::Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	pub fn from_json(json: &str) -> ::std::result::Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

#[cfg(test)]
mod test {
	use crate::array::{ArrayKind, Shape, StandardDeflator};
	use crate::block::BlockId;
	use crate::chunk::{Chunk, EncodedChunk, LightChannel};
	use crate::config::{ChunkConfig, ExtraDataConfig};
	use crate::error::ArrayError;
	use crate::position::ChunkPos;
	use crate::registry::ArrayRegistry;

	fn config() -> ChunkConfig {
		ChunkConfig {
			extra_data: vec![ExtraDataConfig { name: "fluid".to_string(), kind: "sparse8".to_string() }],
			..ChunkConfig::default()
		}
	}

	#[test]
	fn test_new_chunk() {
		let registry = ArrayRegistry::new();
		let chunk = Chunk::new(ChunkPos::new(3, -4), &config(), &registry).unwrap();

		assert_eq!(chunk.position(), ChunkPos::new(3, -4));
		assert_eq!(chunk.blocks().read().kind(), ArrayKind::Dense16);
		assert_eq!(chunk.light_array(LightChannel::Sunlight).read().kind(), ArrayKind::Dense4);
		assert_eq!(chunk.block(15, 255, 15).unwrap(), BlockId(0));
		assert_eq!(chunk.extra_data_names().collect::<Vec<_>>(), vec!["fluid"]);
		assert!(chunk.block(16, 0, 0).is_err());
	}

	#[test]
	fn test_channels() {
		let registry = ArrayRegistry::new();
		let mut chunk = Chunk::new(ChunkPos::new(0, 0), &config(), &registry).unwrap();

		chunk.set_block(1, 2, 3, BlockId(700)).unwrap();
		chunk.set_luminance(LightChannel::Light, 1, 2, 3, 14).unwrap();
		chunk.extra_data_mut("fluid").unwrap().set(1, 2, 3, 9).unwrap();

		assert_eq!(chunk.block(1, 2, 3).unwrap(), BlockId(700));
		assert_eq!(chunk.luminance(LightChannel::Light, 1, 2, 3).unwrap(), 14);
		assert_eq!(chunk.luminance(LightChannel::Sunlight, 1, 2, 3).unwrap(), 0);
		assert_eq!(chunk.extra_data("fluid").unwrap().get(1, 2, 3).unwrap(), 9);
		assert!(chunk.extra_data("missing").is_none());

		assert!(!chunk.compare_and_set_block(1, 2, 3, BlockId(5), BlockId(4)).unwrap());
		assert!(chunk.compare_and_set_block(1, 2, 3, BlockId(5), BlockId(700)).unwrap());
		assert_eq!(chunk.block(1, 2, 3).unwrap(), BlockId(5));
	}

	#[test]
	fn test_wrong_shape() {
		let shape = Shape::new(16, 16, 16).unwrap();
		let array = || ArrayKind::Dense8.create(shape).unwrap();

		assert!(Chunk::from_arrays(ChunkPos::new(0, 0), array(), array(), array(), Vec::new()).is_err());
	}

	#[test]
	fn test_deflate_keeps_contents() {
		let registry = ArrayRegistry::new();
		let mut chunk = Chunk::new(ChunkPos::new(0, 0), &config(), &registry).unwrap();

		chunk.set_block(8, 64, 8, BlockId(2)).unwrap();
		chunk.set_luminance(LightChannel::Sunlight, 0, 255, 0, 15).unwrap();

		let before = chunk.estimated_memory_consumption_in_bytes();
		chunk.deflate(&StandardDeflator);

		assert!(chunk.estimated_memory_consumption_in_bytes() < before);
		assert_eq!(chunk.blocks().read().kind(), ArrayKind::Sparse16);
		assert_eq!(chunk.block(8, 64, 8).unwrap(), BlockId(2));
		assert_eq!(chunk.luminance(LightChannel::Sunlight, 0, 255, 0).unwrap(), 15);
	}

	#[test]
	fn test_encode_decode() {
		let registry = ArrayRegistry::new();
		let mut chunk = Chunk::new(ChunkPos::new(-1, 2), &config(), &registry).unwrap();

		chunk.set_block(4, 100, 4, BlockId(3)).unwrap();
		chunk.set_luminance(LightChannel::Light, 4, 101, 4, 13).unwrap();
		chunk.extra_data_mut("fluid").unwrap().set(0, 0, 0, 200).unwrap();
		chunk.deflate(&StandardDeflator);

		let encoded = chunk.encode(&registry).unwrap();
		let json = encoded.to_json().unwrap();
		let decoded = Chunk::decode(&EncodedChunk::from_json(&json).unwrap(), &registry).unwrap();

		assert_eq!(decoded.position(), ChunkPos::new(-1, 2));
		assert_eq!(decoded.block(4, 100, 4).unwrap(), BlockId(3));
		assert_eq!(decoded.luminance(LightChannel::Light, 4, 101, 4).unwrap(), 13);
		assert_eq!(decoded.extra_data("fluid").unwrap().get(0, 0, 0).unwrap(), 200);
		assert_eq!(*decoded.blocks().read(), *chunk.blocks().read());
	}

	#[test]
	fn test_decode_failure() {
		let _ = env_logger::builder().is_test(true).try_init();

		let registry = ArrayRegistry::new();
		let chunk = Chunk::new(ChunkPos::new(0, 0), &ChunkConfig::default(), &registry).unwrap();

		let mut encoded = chunk.encode(&registry).unwrap();
		encoded.light.data.truncate(10);

		assert!(matches!(Chunk::decode(&encoded, &registry), Err(ArrayError::TruncatedData { .. })));

		encoded.light.kind = "lightmap".to_string();

		assert!(matches!(Chunk::decode(&encoded, &registry), Err(ArrayError::UnknownKind(_))));
	}
}
