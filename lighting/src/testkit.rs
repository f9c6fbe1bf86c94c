//! Worlds for the lighting tests, and a slow but simple reference lighting to check them against.

use crate::rules::{LightRules, PropagationRules, SunlightRules};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use tera_blockdata::config::blocks_from_json;
use tera_blockdata::{Block, BlockId, BlockPos, Chunk, ChunkConfig, ChunkPos, ArrayRegistry, LightChannel, Region3i, Side, World};

const BLOCKS: &str = r#"[
	{ "name": "stone" },
	{ "name": "glass", "translucent": true },
	{ "name": "water", "translucent": true, "liquid": true, "full_sides": [] },
	{ "name": "torch", "luminance": 14, "translucent": true, "full_sides": [] },
	{ "name": "lamp", "luminance": 15 },
	{ "name": "dim_lamp", "luminance": 8, "translucent": true, "full_sides": [] },
	{ "name": "slab", "full_sides": ["down"] }
]"#;

/// Every block type, air included.
pub const BLOCK_NAMES: [&str; 8] = ["air", "stone", "glass", "water", "torch", "lamp", "dim_lamp", "slab"];

pub fn init_logging() {
	let _ = env_logger::builder().is_test(true).try_init();
}

/// A world of air with the given chunks loaded, and no light at all.
pub fn dark_world(chunks: &[(i32, i32)]) -> World {
	let registry = ArrayRegistry::new();
	let blocks = blocks_from_json(BLOCKS).expect("test blocks are valid");

	let mut world = World::new(Arc::new(blocks));

	for &(x, z) in chunks {
		world.add_chunk(Chunk::new(ChunkPos::new(x, z), &ChunkConfig::default(), &registry).unwrap());
	}

	world
}

/// A world of air with the given chunks loaded and fully lit.
pub fn lit_world(chunks: &[(i32, i32)]) -> World {
	let mut world = dark_world(chunks);
	relight(&mut world);

	world
}

pub fn id(world: &World, name: &str) -> BlockId {
	world.blocks().id(name).unwrap_or_else(|| panic!("unknown test block {}", name))
}

/// Replaces a block without touching the light, returning the old and the new block.
pub fn place(world: &mut World, position: BlockPos, name: &str) -> (Block, Block) {
	let id = id(world, name);

	let old = world.block_at(position).expect("placing a block in an unloaded chunk");
	world.set_block_at(position, id);

	(old, world.blocks().get(id).unwrap())
}

/// Every position of every loaded chunk, chunk by chunk in position order.
pub fn cells(world: &World) -> Vec<BlockPos> {
	let mut chunks: Vec<ChunkPos> = world.chunks().map(Chunk::position).collect();
	chunks.sort();

	chunks.into_iter()
		.flat_map(|chunk| {
			Region3i::from_corners(
				chunk.block(0, 0, 0),
				chunk.block(Chunk::SIZE_X - 1, Chunk::SIZE_Y - 1, Chunk::SIZE_Z - 1)
			).iter()
		})
		.collect()
}

/// The light of a channel as it should be, computed from scratch by raising every cell from
/// the light sources until nothing changes.
pub fn reference(world: &World, channel: LightChannel) -> FxHashMap<BlockPos, u8> {
	match channel {
		LightChannel::Sunlight => reference_with(world, &SunlightRules),
		LightChannel::Light => reference_with(world, &LightRules)
	}
}

fn reference_with<R>(world: &World, rules: &R) -> FxHashMap<BlockPos, u8> where R: PropagationRules {
	let mut values = FxHashMap::default();
	let mut pending = VecDeque::new();

	for position in cells(world) {
		let block = world.block_at(position).unwrap();
		let fixed = rules.fixed_value(&block, position);

		values.insert(position, fixed);

		if fixed > 0 {
			pending.push_back(position);
		}
	}

	while let Some(position) = pending.pop_front() {
		let value = values[&position];
		let block = world.block_at(position).unwrap();

		for &side in Side::all().iter() {
			let adjacent = position.offset(side);

			let adjacent_block = match world.block_at(adjacent) {
				Some(block) => block,
				None => continue
			};

			if !rules.can_spread_out_of(&block, side) || !rules.can_spread_into(&adjacent_block, side.reverse()) {
				continue;
			}

			let spread = rules.propagate_value(value, side, &adjacent_block);

			if let Some(current) = values.get_mut(&adjacent) {
				if *current < spread {
					*current = spread;
					pending.push_back(adjacent);
				}
			}
		}
	}

	values
}

/// Overwrites both channels with the reference lighting.
pub fn relight(world: &mut World) {
	for &channel in LightChannel::all().iter() {
		for (position, value) in reference(world, channel) {
			world.set_luminance_at(channel, position, value);
		}
	}
}

pub fn assert_matches_reference(world: &World, channel: LightChannel) {
	let expected = reference(world, channel);

	let mut mismatches: Vec<(BlockPos, Option<u8>, u8)> = expected.iter()
		.map(|(&position, &value)| (position, world.luminance_at(channel, position), value))
		.filter(|&(_, actual, value)| actual != Some(value))
		.collect();

	mismatches.sort();

	assert!(
		mismatches.is_empty(),
		"{} cells of {:?} differ from the reference, the first being (position, actual, expected): {:?}",
		mismatches.len(),
		channel,
		&mismatches[..mismatches.len().min(8)]
	);
}

/// Both light values of every loaded cell, in the order of `cells`.
pub fn snapshot(world: &World) -> Vec<(BlockPos, u8, u8)> {
	cells(world).into_iter()
		.map(|position| (
			position,
			world.luminance_at(LightChannel::Sunlight, position).unwrap_or(0),
			world.luminance_at(LightChannel::Light, position).unwrap_or(0)
		))
		.collect()
}

/// The smallest region holding every cell that differs between two snapshots of the same chunks.
pub fn changed_region(before: &[(BlockPos, u8, u8)], after: &[(BlockPos, u8, u8)]) -> Region3i {
	assert_eq!(before.len(), after.len());

	before.iter()
		.zip(after.iter())
		.filter(|(a, b)| a != b)
		.fold(Region3i::EMPTY, |region, (a, _)| region.encompass(a.0))
}
