use crate::config::{BlockConfig, ConfigError};
use crate::position::{Side, SideSet};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The numeric id of a block type, as stored in the block channel of a chunk.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BlockId(pub u16);

impl Display for BlockId {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// The lighting properties of a block type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Block {
	id: BlockId,
	luminance: u8,
	translucent: bool,
	liquid: bool,
	full_sides: SideSet
}

impl Block {
	pub const MAX_LUMINANCE: u8 = 15;

	pub fn new(id: BlockId, luminance: u8, translucent: bool, liquid: bool, full_sides: SideSet) -> Self {
		Block { id, luminance: luminance.min(Block::MAX_LUMINANCE), translucent, liquid, full_sides }
	}

	/// Air: translucent, with no full faces and no light of its own.
	pub fn air() -> Self {
		Block::new(BlockId(0), 0, true, false, SideSet::empty())
	}

	pub fn id(&self) -> BlockId {
		self.id
	}

	/// The light level this block emits, 0 to 15.
	pub fn luminance(&self) -> u8 {
		self.luminance
	}

	pub fn translucent(&self) -> bool {
		self.translucent
	}

	pub fn liquid(&self) -> bool {
		self.liquid
	}

	pub fn full_sides(&self) -> SideSet {
		self.full_sides
	}

	/// Returns true if the face on this side completely covers the cell.
	pub fn is_full_side(&self, side: Side) -> bool {
		self.full_sides.contains(side)
	}
}

/// The table of known block types, indexed by id. Id 0 is always air.
#[derive(Debug, Clone)]
pub struct BlockManager {
	blocks: Vec<Block>,
	names: Vec<String>,
	by_name: FxHashMap<String, BlockId>
}

impl BlockManager {
	pub const AIR: BlockId = BlockId(0);

	pub fn new() -> Self {
		let mut by_name = FxHashMap::default();
		by_name.insert("air".to_string(), BlockManager::AIR);

		BlockManager {
			blocks: vec![Block::air()],
			names: vec!["air".to_string()],
			by_name
		}
	}

	pub fn from_configs(configs: &[BlockConfig]) -> Result<Self, ConfigError> {
		let mut manager = BlockManager::new();

		for config in configs {
			manager.register(config)?;
		}

		Ok(manager)
	}

	/// Adds a block type, assigning it the next free id.
	pub fn register(&mut self, config: &BlockConfig) -> Result<BlockId, ConfigError> {
		if self.by_name.contains_key(&config.name) {
			return Err(ConfigError::DuplicateBlock(config.name.clone()));
		}

		if self.blocks.len() > u16::max_value() as usize {
			return Err(ConfigError::TooManyBlocks);
		}

		let id = BlockId(self.blocks.len() as u16);

		self.blocks.push(config.to_block(id)?);
		self.names.push(config.name.clone());
		self.by_name.insert(config.name.clone(), id);

		Ok(id)
	}

	pub fn get(&self, id: BlockId) -> Option<Block> {
		self.blocks.get(id.0 as usize).cloned()
	}

	pub fn id(&self, name: &str) -> Option<BlockId> {
		self.by_name.get(name).cloned()
	}

	pub fn by_name(&self, name: &str) -> Option<Block> {
		self.id(name).and_then(|id| self.get(id))
	}

	pub fn name(&self, id: BlockId) -> Option<&str> {
		self.names.get(id.0 as usize).map(|name| name.as_str())
	}

	pub fn len(&self) -> usize {
		self.blocks.len()
	}

	pub fn is_empty(&self) -> bool {
		// air is always present
		false
	}

	pub fn iter(&self) -> impl Iterator<Item = Block> + '_ {
		self.blocks.iter().cloned()
	}
}

impl Default for BlockManager {
	fn default() -> Self {
		BlockManager::new()
	}
}
