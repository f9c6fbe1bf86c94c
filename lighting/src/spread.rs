//! Light spreading shared by the propagators.

use crate::queue::LevelQueue;
use crate::rules::PropagationRules;
use crate::view::LightingWorldView;
use tera_blockdata::{BlockPos, Chunk, ChunkPos, Side};

/// Raises every neighbour that light of `value` at `position` reaches beyond its current value,
/// queueing each raised neighbour. Returns the number of raised neighbours.
pub fn push<V, R>(view: &mut V, rules: &R, queue: &mut LevelQueue, position: BlockPos, value: u8) -> usize where V: LightingWorldView, R: PropagationRules {
	if value <= 1 {
		return 0;
	}

	let block = match view.get_block_at(position) {
		Some(block) => block,
		None => return 0
	};

	let channel = rules.channel();
	let mut raised = 0;

	for &side in Side::all().iter() {
		if !rules.can_spread_out_of(&block, side) {
			continue;
		}

		let adjacent = position.offset(side);

		let adjacent_block = match view.get_block_at(adjacent) {
			Some(block) => block,
			None => continue
		};

		if !rules.can_spread_into(&adjacent_block, side.reverse()) {
			continue;
		}

		let spread = rules.propagate_value(value, side, &adjacent_block);

		match view.get_luminance_at(channel, adjacent) {
			Some(current) if current < spread => {
				view.set_luminance_at(channel, adjacent, spread);
				queue.push(adjacent, spread);

				raised += 1;
			},
			_ => ()
		}
	}

	raised
}

/// The value a cell would hold given its block and the current values of its neighbours.
pub fn pull<V, R>(view: &V, rules: &R, position: BlockPos) -> u8 where V: LightingWorldView, R: PropagationRules {
	let block = match view.get_block_at(position) {
		Some(block) => block,
		None => return 0
	};

	let channel = rules.channel();
	let mut best = rules.fixed_value(&block, position);

	for &side in Side::all().iter() {
		if !rules.can_spread_into(&block, side) {
			continue;
		}

		let adjacent = position.offset(side);

		let (adjacent_block, adjacent_value) = match (view.get_block_at(adjacent), view.get_luminance_at(channel, adjacent)) {
			(Some(block), Some(value)) => (block, value),
			_ => continue
		};

		// light travels from the neighbour back towards this cell
		let direction = side.reverse();

		if rules.can_spread_out_of(&adjacent_block, direction) {
			best = best.max(rules.propagate_value(adjacent_value, direction, &block));
		}
	}

	best
}

/// Spreads light from every queued position until no cell can be raised any further. Positions
/// whose value changed since they were queued are skipped, as the queue holds their current
/// value elsewhere. Returns the number of raised cells.
pub fn flood<V, R>(view: &mut V, rules: &R, queue: &mut LevelQueue) -> usize where V: LightingWorldView, R: PropagationRules {
	let channel = rules.channel();
	let mut raised = 0;

	while let Some((level, batch)) = queue.next_batch() {
		for position in batch {
			if view.get_luminance_at(channel, position) != Some(level) {
				continue;
			}

			raised += push(view, rules, queue, position, level);
		}
	}

	raised
}

/// Every pair of adjacent positions across the face of a chunk on the given horizontal side. The
/// first position of each pair lies inside the chunk.
pub fn face_pairs(chunk: ChunkPos, side: Side) -> impl Iterator<Item = (BlockPos, BlockPos)> {
	let last = Chunk::SIZE_X - 1;

	(0..Chunk::SIZE_Y).flat_map(move |y| {
		(0..Chunk::SIZE_Z).filter_map(move |t| {
			let inside = match side {
				Side::PlusX => chunk.block(last, y, t),
				Side::MinusX => chunk.block(0, y, t),
				Side::PlusZ => chunk.block(t, y, last),
				Side::MinusZ => chunk.block(t, y, 0),
				Side::Up | Side::Down => return None
			};

			Some((inside, inside.offset(side)))
		})
	})
}

/// Queues the lit cells on both sides of a chunk face.
pub fn queue_face<V, R>(view: &V, rules: &R, queue: &mut LevelQueue, chunk: ChunkPos, side: Side) where V: LightingWorldView, R: PropagationRules {
	let channel = rules.channel();

	for (inside, outside) in face_pairs(chunk, side) {
		if !view.is_in_bounds(inside) || !view.is_in_bounds(outside) {
			continue;
		}

		for &position in &[inside, outside] {
			if let Some(value) = view.get_luminance_at(channel, position) {
				if value > 1 {
					queue.push(position, value);
				}
			}
		}
	}
}
