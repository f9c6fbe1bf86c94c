use crate::array::ArrayKind;
use crate::block::{Block, BlockId, BlockManager};
use crate::error::ArrayError;
use crate::position::{Side, SideSet};
use crate::registry::ArrayRegistry;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("malformed configuration: {0}")]
	Json(#[from] serde_json::Error),
	#[error(transparent)]
	Array(#[from] ArrayError),
	#[error("array kind {kind:?} for channel {channel} is not registered")]
	UnregisteredKind { channel: String, kind: String },
	#[error("data channel {0:?} is declared more than once")]
	DuplicateChannel(String),
	#[error("block {0:?} is declared more than once")]
	DuplicateBlock(String),
	#[error("light level {luminance} of block {name:?} is above the maximum of 15")]
	LuminanceTooHigh { name: String, luminance: u8 },
	#[error("too many blocks, ids are limited to 16 bits")]
	TooManyBlocks
}

/// Array kinds used for the channels of every chunk.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
	pub blocks: String,
	pub sunlight: String,
	pub light: String,
	pub extra_data: Vec<ExtraDataConfig>
}

impl ChunkConfig {
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Checks that every channel names a registered kind and that extra channels are unique.
	pub fn validate(&self, registry: &ArrayRegistry) -> Result<(), ConfigError> {
		let channels = [("blocks", &self.blocks), ("sunlight", &self.sunlight), ("light", &self.light)];

		for &(channel, kind) in channels.iter() {
			if !registry.contains(kind) {
				return Err(ConfigError::UnregisteredKind { channel: channel.to_string(), kind: kind.clone() });
			}
		}

		for (index, extra) in self.extra_data.iter().enumerate() {
			if !registry.contains(&extra.kind) {
				return Err(ConfigError::UnregisteredKind { channel: extra.name.clone(), kind: extra.kind.clone() });
			}

			if self.extra_data[..index].iter().any(|other| other.name == extra.name) {
				return Err(ConfigError::DuplicateChannel(extra.name.clone()));
			}
		}

		Ok(())
	}
}

impl Default for ChunkConfig {
	fn default() -> Self {
		ChunkConfig {
			blocks: ArrayKind::Dense16.name().to_string(),
			sunlight: ArrayKind::Dense4.name().to_string(),
			light: ArrayKind::Dense4.name().to_string(),
			extra_data: Vec::new()
		}
	}
}

/// An additional per-block data channel stored in every chunk.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExtraDataConfig {
	pub name: String,
	pub kind: String
}

fn all_sides() -> Vec<Side> {
	Side::all().to_vec()
}

/// The lighting-relevant description of a block type.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BlockConfig {
	pub name: String,
	#[serde(default)]
	pub luminance: u8,
	#[serde(default)]
	pub translucent: bool,
	#[serde(default)]
	pub liquid: bool,
	/// Faces that completely cover the cell. Defaults to every face.
	#[serde(default = "all_sides")]
	pub full_sides: Vec<Side>
}

impl BlockConfig {
	pub fn to_block(&self, id: BlockId) -> Result<Block, ConfigError> {
		if self.luminance > Block::MAX_LUMINANCE {
			return Err(ConfigError::LuminanceTooHigh { name: self.name.clone(), luminance: self.luminance });
		}

		Ok(Block::new(id, self.luminance, self.translucent, self.liquid, SideSet::of(&self.full_sides)))
	}
}

/// Parses a JSON list of block definitions into a block manager. Air is always id 0, and the
/// definitions receive ids in order starting at 1.
pub fn blocks_from_json(json: &str) -> Result<BlockManager, ConfigError> {
	let configs: Vec<BlockConfig> = serde_json::from_str(json)?;

	BlockManager::from_configs(&configs)
}
