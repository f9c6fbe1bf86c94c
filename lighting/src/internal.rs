use crate::propagator::LightPropagator;
use crate::queue::LevelQueue;
use crate::rules::{LightRules, PropagationRules, SunlightRules};
use crate::spread;
use crate::view::{ChunkView, LightingWorldView, WorldView};
use log::debug;
use rayon::prelude::*;
use tera_blockdata::{BlockManager, BlockPos, Chunk, LightChannel, Side, World};

/// Lights a freshly generated or loaded chunk on its own, without looking at its neighbours.
/// Light crossing the chunk borders is spread afterwards with
/// `LightPropagator::propagate_out_of_target_chunk`.
pub struct InternalLightProcessor;

impl InternalLightProcessor {
	/// Recomputes both light channels of the chunk from its blocks alone. Returns the number of
	/// lit cells.
	pub fn generate_internal_lighting(chunk: &mut Chunk, blocks: &BlockManager) -> usize {
		chunk.light_array_mut(LightChannel::Sunlight).fill(0);
		chunk.light_array_mut(LightChannel::Light).fill(0);

		let chunk_position = chunk.position();
		let mut view = ChunkView::new(chunk, blocks);
		let mut queue = LevelQueue::new();

		let sunlit = InternalLightProcessor::tunnel_sunlight(&mut view, &mut queue, chunk_position.origin());
		let sunlit = sunlit + spread::flood(&mut view, &SunlightRules, &mut queue);

		let mut lit = 0;

		for y in 0..Chunk::SIZE_Y {
			for z in 0..Chunk::SIZE_Z {
				for x in 0..Chunk::SIZE_X {
					let position = chunk_position.block(x, y, z);

					let luminance = match view.get_block_at(position) {
						Some(block) => LightRules.fixed_value(&block, position),
						None => 0
					};

					if luminance > 0 {
						view.set_luminance_at(LightChannel::Light, position, luminance);
						queue.push(position, luminance);

						lit += 1;
					}
				}
			}
		}

		let lit = lit + spread::flood(&mut view, &LightRules, &mut queue);

		debug!("generated internal lighting for chunk {}: {} sunlit and {} lit cells", chunk_position, sunlit, lit);

		sunlit + lit
	}

	/// Lights every chunk of the batch in parallel.
	pub fn generate_internal_lighting_batch(chunks: &mut [Chunk], blocks: &BlockManager) -> usize {
		chunks.par_iter_mut()
			.map(|chunk| InternalLightProcessor::generate_internal_lighting(chunk, blocks))
			.sum()
	}

	/// Lights every loaded chunk of the world in parallel, then spreads light between them.
	pub fn generate_world_lighting(world: &mut World) -> usize {
		let lit = {
			let (blocks, chunks) = world.split_mut();

			chunks.values_mut()
				.par_bridge()
				.map(|chunk| InternalLightProcessor::generate_internal_lighting(chunk, blocks))
				.sum::<usize>()
		};

		let positions: Vec<_> = world.chunks().map(Chunk::position).collect();
		let mut propagator = LightPropagator::new();

		for position in positions {
			propagator.propagate_out_of_target_chunk(&mut WorldView::around(world, position), position);
		}

		lit
	}

	/// Lets sunlight fall down every column from the top of the chunk, queueing every cell it
	/// reaches. Returns the number of sunlit cells.
	fn tunnel_sunlight<V>(view: &mut V, queue: &mut LevelQueue, origin: BlockPos) -> usize where V: LightingWorldView {
		let rules = SunlightRules;
		let top = Chunk::SIZE_Y as i32 - 1;
		let mut sunlit = 0;

		for z in 0..Chunk::SIZE_Z as i32 {
			for x in 0..Chunk::SIZE_X as i32 {
				let mut position = BlockPos::new(origin.x() + x, top, origin.z() + z);

				let mut block = match view.get_block_at(position) {
					Some(block) => block,
					None => continue
				};

				let mut value = rules.fixed_value(&block, position);

				while value > 0 {
					view.set_luminance_at(LightChannel::Sunlight, position, value);
					queue.push(position, value);
					sunlit += 1;

					let below = position.offset(Side::Down);

					let below_block = match view.get_block_at(below) {
						Some(below_block) => below_block,
						None => break
					};

					value = if rules.can_spread_out_of(&block, Side::Down) && rules.can_spread_into(&below_block, Side::Up) {
						rules.propagate_value(value, Side::Down, &below_block)
					} else {
						0
					};

					position = below;
					block = below_block;
				}
			}
		}

		sunlit
	}
}

#[cfg(test)]
mod test {
	use crate::internal::InternalLightProcessor;
	use crate::testkit;
	use tera_blockdata::{BlockPos, ChunkPos, LightChannel};

	#[test]
	fn test_open_sky() {
		testkit::init_logging();

		let mut world = testkit::dark_world(&[(0, 0)]);
		let blocks = world.block_manager();

		let lit = InternalLightProcessor::generate_internal_lighting(world.chunk_mut(ChunkPos::new(0, 0)).unwrap(), &blocks);

		assert_eq!(lit, 16 * 256 * 16);
		assert_eq!(world.luminance_at(LightChannel::Sunlight, BlockPos::new(3, 0, 9)), Some(15));
		assert_eq!(world.luminance_at(LightChannel::Light, BlockPos::new(3, 0, 9)), Some(0));
	}

	#[test]
	fn test_matches_reference() {
		let mut world = testkit::dark_world(&[(2, -1)]);
		let origin = ChunkPos::new(2, -1).origin();

		for x in 0..16 {
			for z in 0..16 {
				testkit::place(&mut world, BlockPos::new(origin.x() + x, 180, origin.z() + z), if (x + z) % 5 == 0 { "water" } else { "stone" });
			}
		}

		testkit::place(&mut world, BlockPos::new(origin.x() + 4, 120, origin.z() + 4), "lamp");
		testkit::place(&mut world, BlockPos::new(origin.x() + 8, 181, origin.z() + 8), "torch");

		let blocks = world.block_manager();
		InternalLightProcessor::generate_internal_lighting(world.chunk_mut(ChunkPos::new(2, -1)).unwrap(), &blocks);

		assert_eq!(world.luminance_at(LightChannel::Sunlight, BlockPos::new(origin.x(), 180, origin.z())), Some(14));
		assert_eq!(world.luminance_at(LightChannel::Light, BlockPos::new(origin.x() + 4, 120, origin.z() + 4)), Some(15));

		testkit::assert_matches_reference(&world, LightChannel::Sunlight);
		testkit::assert_matches_reference(&world, LightChannel::Light);
	}

	#[test]
	fn test_sealed_columns() {
		let mut world = testkit::dark_world(&[(0, 0)]);

		for y in 239..256 {
			for z in 0..16 {
				for x in 0..16 {
					testkit::place(&mut world, BlockPos::new(x, y, z), "stone");
				}
			}
		}

		// water at the top, then air
		for y in 240..256 {
			testkit::place(&mut world, BlockPos::new(4, y, 4), if y >= 250 { "water" } else { "air" });
		}

		// glass at the top, then air with a layer of water in the middle
		for y in 240..256 {
			testkit::place(&mut world, BlockPos::new(8, y, 8), if y == 255 { "glass" } else if y >= 248 && y <= 250 { "water" } else { "air" });
		}

		// glass at the top, then air with a slab in the middle
		for y in 240..256 {
			testkit::place(&mut world, BlockPos::new(12, y, 12), if y == 255 { "glass" } else if y == 249 { "slab" } else { "air" });
		}

		let blocks = world.block_manager();
		InternalLightProcessor::generate_internal_lighting(world.chunk_mut(ChunkPos::new(0, 0)).unwrap(), &blocks);

		let sunlight = |x, y, z| world.luminance_at(LightChannel::Sunlight, BlockPos::new(x, y, z)).unwrap();

		let water_top: Vec<u8> = (240..256).rev().map(|y| sunlight(4, y, 4)).collect();
		assert_eq!(water_top, vec![14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0, 0]);

		let water_layer: Vec<u8> = (240..256).rev().map(|y| sunlight(8, y, 8)).collect();
		assert_eq!(water_layer, vec![15, 15, 15, 15, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4]);

		let slab: Vec<u8> = (240..256).rev().map(|y| sunlight(12, y, 12)).collect();
		assert_eq!(slab, vec![15, 15, 15, 15, 15, 15, 14, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

		// nothing leaks into the stone or the sealed cave below
		assert_eq!(sunlight(5, 250, 4), 0);
		assert_eq!(sunlight(8, 200, 8), 0);
	}

	#[test]
	fn test_world_lighting() {
		let mut world = testkit::dark_world(&[(0, 0), (1, 0), (0, 1)]);

		for x in 0..16 {
			for z in 0..16 {
				testkit::place(&mut world, BlockPos::new(x, 100, z), "stone");
			}
		}

		testkit::place(&mut world, BlockPos::new(17, 90, 3), "lamp");

		InternalLightProcessor::generate_world_lighting(&mut world);

		// lit from the neighbouring chunks
		assert_eq!(world.luminance_at(LightChannel::Sunlight, BlockPos::new(15, 99, 3)), Some(14));
		assert_eq!(world.luminance_at(LightChannel::Light, BlockPos::new(14, 90, 3)), Some(12));

		testkit::assert_matches_reference(&world, LightChannel::Sunlight);
		testkit::assert_matches_reference(&world, LightChannel::Light);
	}

	#[test]
	fn test_batch() {
		let world = testkit::dark_world(&[(0, 0), (5, 5)]);
		let blocks = world.block_manager();

		let mut chunks: Vec<_> = world.chunks().cloned().collect();

		assert_eq!(InternalLightProcessor::generate_internal_lighting_batch(&mut chunks, &blocks), 2 * 16 * 256 * 16);
		assert!(chunks.iter().all(|chunk| chunk.luminance(LightChannel::Sunlight, 0, 0, 0).unwrap() == 15));
	}
}
