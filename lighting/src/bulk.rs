use crate::queue::LevelQueue;
use crate::rules::PropagationRules;
use crate::spread;
use crate::view::{LightingWorldView, TrackingView};
use log::trace;
use tera_blockdata::{Block, BlockPos, ChunkPos, Region3i, Side};

/// A block that was replaced. The world is expected to hold the new block already.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlockChange {
	pub position: BlockPos,
	pub from: Block,
	pub to: Block
}

impl BlockChange {
	pub fn new(position: BlockPos, from: Block, to: Block) -> Self {
		BlockChange { position, from, to }
	}
}

/// Updates the light of one channel after a batch of block changes. Light made obsolete by the
/// changes is dimmed away first, brightest level first, and then every affected cell is
/// brightened again from the light that remains.
pub struct BulkLightPropagator<R> {
	rules: R,
	dim: LevelQueue,
	brighten: LevelQueue
}

impl<R> BulkLightPropagator<R> where R: PropagationRules {
	pub fn new(rules: R) -> Self {
		BulkLightPropagator {
			rules,
			dim: LevelQueue::new(),
			brighten: LevelQueue::new()
		}
	}

	pub fn rules(&self) -> &R {
		&self.rules
	}

	/// Applies the light changes caused by the block changes. Returns the region of every cell
	/// whose light value changed.
	pub fn process<V, I>(&mut self, view: &mut V, changes: I) -> Region3i where V: LightingWorldView, I: IntoIterator<Item = BlockChange> {
		let mut view = TrackingView::new(view);

		let mut reviewed = 0;

		for change in changes {
			self.review_change(&mut view, &change);
			reviewed += 1;
		}

		self.process_dim(&mut view);
		self.process_brighten(&mut view);
		self.clean_up();

		let region = view.changed_region();

		trace!("processed {} block changes for {:?}, changed region {:?}", reviewed, self.rules.channel(), region);

		region
	}

	/// Spreads light across the face between a chunk and its neighbour on the given side, in both
	/// directions. Returns the region of every cell whose light value changed.
	pub fn propagate_between<V>(&mut self, view: &mut V, chunk: ChunkPos, side: Side) -> Region3i where V: LightingWorldView {
		let mut view = TrackingView::new(view);

		spread::queue_face(&view, &self.rules, &mut self.brighten, chunk, side);

		self.process_brighten(&mut view);
		self.clean_up();

		view.changed_region()
	}

	fn review_change<V>(&mut self, view: &mut V, change: &BlockChange) where V: LightingWorldView {
		// The light held by the cell was derived under the old block, which the dependency test in
		// `purge` cannot see anymore. It is dimmed away and rebuilt from the surrounding light.
		if let Some(existing) = view.get_luminance_at(self.rules.channel(), change.position) {
			if existing > 0 {
				self.dim.push(change.position, existing);
			}
		}

		self.review_change_to_traversability(view, change);
		self.review_change_to_fixed_value(view, change);
	}

	fn review_change_to_traversability<V>(&mut self, view: &mut V, change: &BlockChange) where V: LightingWorldView {
		let channel = self.rules.channel();
		let position = change.position;

		let existing = match view.get_luminance_at(channel, position) {
			Some(existing) => existing,
			None => return
		};

		for &side in Side::all().iter() {
			let comparison = self.rules.compare_propagation(&change.to, &change.from, side);
			let adjacent = position.offset(side);

			if comparison.is_restricting() {
				if existing == 0 {
					continue;
				}

				self.dim.push(position, existing);

				if let (Some(adjacent_value), Some(adjacent_block)) = (view.get_luminance_at(channel, adjacent), view.get_block_at(adjacent)) {
					if adjacent_value > 0 && adjacent_value == self.rules.propagate_value(existing, side, &adjacent_block) {
						self.dim.push(adjacent, adjacent_value);
					}
				}
			} else if comparison.is_permitting() {
				if let Some(adjacent_value) = view.get_luminance_at(channel, adjacent) {
					self.queue_spread_value(adjacent, adjacent_value);
				}

				self.queue_spread_value(position, existing);
			}
		}
	}

	fn review_change_to_fixed_value<V>(&mut self, view: &mut V, change: &BlockChange) where V: LightingWorldView {
		let channel = self.rules.channel();
		let position = change.position;

		let existing = match view.get_luminance_at(channel, position) {
			Some(existing) => existing,
			None => return
		};

		let new_value = self.rules.fixed_value(&change.to, position);
		let old_value = self.rules.fixed_value(&change.from, position);

		if new_value > existing {
			self.raise(view, position, new_value);
		}

		if new_value < old_value {
			self.dim.push(position, old_value);
		}
	}

	fn raise<V>(&mut self, view: &mut V, position: BlockPos, value: u8) where V: LightingWorldView {
		view.set_luminance_at(self.rules.channel(), position, value);
		self.queue_spread_value(position, value);
	}

	fn queue_spread_value(&mut self, position: BlockPos, value: u8) {
		if value > 1 {
			self.brighten.push(position, value);
		}
	}

	fn process_dim<V>(&mut self, view: &mut V) where V: LightingWorldView {
		let channel = self.rules.channel();

		while let Some((level, batch)) = self.dim.next_batch() {
			for position in batch {
				// already purged, or raised by a fixed value
				if view.get_luminance_at(channel, position) != Some(level) {
					continue;
				}

				self.purge(view, position, level);
			}
		}
	}

	/// Resets a cell to its fixed value, and queues every neighbour that held exactly the light
	/// this cell gave it to be dimmed in turn. Lit neighbours that did not depend on this cell
	/// are queued to brighten the dimmed area again.
	fn purge<V>(&mut self, view: &mut V, position: BlockPos, old_value: u8) where V: LightingWorldView {
		let channel = self.rules.channel();

		let block = match view.get_block_at(position) {
			Some(block) => block,
			None => return
		};

		let fixed = self.rules.fixed_value(&block, position);

		if fixed > 0 {
			self.raise(view, position, fixed);
		} else {
			view.set_luminance_at(channel, position, 0);
		}

		for &side in Side::all().iter() {
			let adjacent = position.offset(side);

			let (adjacent_block, adjacent_value) = match (view.get_block_at(adjacent), view.get_luminance_at(channel, adjacent)) {
				(Some(block), Some(value)) => (block, value),
				_ => continue
			};

			if adjacent_value == 0 {
				continue;
			}

			let dependent = adjacent_value == self.rules.propagate_value(old_value, side, &adjacent_block)
				&& self.rules.can_spread_into(&adjacent_block, side.reverse());

			if dependent {
				self.dim.push(adjacent, adjacent_value);
			} else {
				self.queue_spread_value(adjacent, adjacent_value);
			}
		}
	}

	fn process_brighten<V>(&mut self, view: &mut V) where V: LightingWorldView {
		spread::flood(view, &self.rules, &mut self.brighten);
	}

	fn clean_up(&mut self) {
		self.dim.clear();
		self.brighten.clear();
	}
}
