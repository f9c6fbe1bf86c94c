use crate::diamond::ColumnDiamond;
use crate::queue::LevelQueue;
use crate::rules::{LightRules, PropagationRules, SunlightRules};
use crate::spread;
use crate::util::{PropagationComparison, MAX_LIGHT};
use crate::view::{LightingWorldView, TrackingView};
use log::{debug, trace};
use tera_blockdata::{Block, BlockPos, ChunkPos, LightChannel, Region3i, Side};

/// Updates both light channels around single block changes.
///
/// Instead of tracking which cell lit which, a change that takes light away clears every cell
/// the old light could have reached and lights that area again from the light still around it.
/// Light that fades by one level per step reaches at most 14 cells away from its source, so the
/// cleared area stays small. Sunlight is the exception, as it falls through transparent blocks
/// without fading: cutting off a shaft of full sunlight clears the area around the whole shaft.
pub struct LightPropagator {
	queue: LevelQueue,
	sunlight: SunlightRules,
	light: LightRules
}

impl LightPropagator {
	pub fn new() -> Self {
		LightPropagator {
			queue: LevelQueue::new(),
			sunlight: SunlightRules,
			light: LightRules
		}
	}

	/// Updates both channels after the block at `position` changed from `old` to `new`. The view
	/// must already hold the new block. Returns the region of every cell whose light changed.
	pub fn update<V>(&mut self, view: &mut V, position: BlockPos, new: Block, old: Block) -> Region3i where V: LightingWorldView {
		let mut view = TrackingView::new(view);

		self.update_sunlight_in(&mut view, position, new, old);
		self.update_light_in(&mut view, position, new, old);

		let region = view.changed_region();

		trace!("block at {} changed from {} to {}, light changed in {:?}", position, old.id(), new.id(), region);

		region
	}

	/// Updates the sunlight channel only.
	pub fn update_sunlight<V>(&mut self, view: &mut V, position: BlockPos, new: Block, old: Block) -> Region3i where V: LightingWorldView {
		let mut view = TrackingView::new(view);

		self.update_sunlight_in(&mut view, position, new, old);

		view.changed_region()
	}

	/// Updates the light channel only.
	pub fn update_light<V>(&mut self, view: &mut V, position: BlockPos, new: Block, old: Block) -> Region3i where V: LightingWorldView {
		let mut view = TrackingView::new(view);

		self.update_light_in(&mut view, position, new, old);

		view.changed_region()
	}

	/// Spreads the light of both channels across the faces between a chunk and its loaded
	/// neighbours, in both directions. Run this once a chunk with internal lighting is loaded.
	pub fn propagate_out_of_target_chunk<V>(&mut self, view: &mut V, chunk: ChunkPos) -> Region3i where V: LightingWorldView {
		let mut view = TrackingView::new(view);

		for &side in Side::horizontal_sides().iter() {
			spread::queue_face(&view, &self.sunlight, &mut self.queue, chunk, side);
		}

		spread::flood(&mut view, &self.sunlight, &mut self.queue);

		for &side in Side::horizontal_sides().iter() {
			spread::queue_face(&view, &self.light, &mut self.queue, chunk, side);
		}

		spread::flood(&mut view, &self.light, &mut self.queue);

		let region = view.changed_region();

		debug!("spread light out of chunk {}, changed region {:?}", chunk, region);

		region
	}

	fn update_light_in<V>(&mut self, view: &mut V, position: BlockPos, new: Block, old: Block) where V: LightingWorldView {
		let current = match view.get_luminance_at(LightChannel::Light, position) {
			Some(current) => current,
			None => return
		};

		let comparison = self.light.compare_block_propagation(&new, &old);

		if comparison.is_restricting() || (new.luminance() < old.luminance() && current == old.luminance()) {
			let rules = self.light;
			self.local_recalculate(view, &rules, position, current);
		} else if comparison.is_permitting() {
			let rules = self.light;
			self.pull_and_push(view, &rules, position, current);
		} else if new.luminance() > current {
			view.set_luminance_at(LightChannel::Light, position, new.luminance());

			let rules = self.light;
			self.push_from(view, &rules, position, new.luminance());
		}
	}

	fn update_sunlight_in<V>(&mut self, view: &mut V, position: BlockPos, new: Block, old: Block) where V: LightingWorldView {
		let current = match view.get_luminance_at(LightChannel::Sunlight, position) {
			Some(current) => current,
			None => return
		};

		let rules = self.sunlight;

		match rules.compare_block_propagation(&new, &old) {
			PropagationComparison::MoreRestricted => if current == MAX_LIGHT {
				self.full_recalculate_sunlight_around(view, position);
			} else {
				self.local_recalculate(view, &rules, position, current);
			},
			PropagationComparison::MorePermissive => self.pull_and_push(view, &rules, position, current),
			PropagationComparison::Identical => ()
		}
	}

	/// Clears the area full sunlight falling through `position` may have lit, which is everything
	/// within 14 cells of the shaft from `position` down to the last cell still at full strength.
	fn full_recalculate_sunlight_around<V>(&mut self, view: &mut V, position: BlockPos) where V: LightingWorldView {
		let mut bottom = position.y();

		while view.get_luminance_at(LightChannel::Sunlight, BlockPos::new(position.x(), bottom - 1, position.z())) == Some(MAX_LIGHT) {
			bottom -= 1;
		}

		trace!("recalculating sunlight around the shaft from {} down to y={}", position, bottom);

		let rules = self.sunlight;
		self.recalculate(view, &rules, ColumnDiamond::new(position, bottom, u32::from(MAX_LIGHT - 1)));
	}

	/// Clears the area the light at `position` may have lit.
	fn local_recalculate<V, R>(&mut self, view: &mut V, rules: &R, position: BlockPos, current: u8) where V: LightingWorldView, R: PropagationRules {
		let radius = u32::from(current.max(1) - 1);

		self.recalculate(view, rules, ColumnDiamond::around(position, radius));
	}

	/// Darkens every cell of the area, then lights it again from the light sources within it and
	/// the lit cells just outside of it. No cell outside the area depends on the light inside.
	fn recalculate<V, R>(&mut self, view: &mut V, rules: &R, area: ColumnDiamond) where V: LightingWorldView, R: PropagationRules {
		let channel = rules.channel();

		for position in area.iter().filter(BlockPos::in_world_height) {
			view.set_luminance_at(channel, position, 0);
		}

		for position in area.iter().filter(BlockPos::in_world_height) {
			if let Some(block) = view.get_block_at(position) {
				let fixed = rules.fixed_value(&block, position);

				if fixed > 0 {
					view.set_luminance_at(channel, position, fixed);
					self.queue.push(position, fixed);
				}
			}
		}

		for position in area.perimeter().filter(BlockPos::in_world_height) {
			if let Some(value) = view.get_luminance_at(channel, position) {
				if value > 1 {
					self.queue.push(position, value);
				}
			}
		}

		spread::flood(view, rules, &mut self.queue);
	}

	/// Brings light in from the neighbours, then spreads whatever the cell holds, as the change
	/// may have opened new paths in both directions.
	fn pull_and_push<V, R>(&mut self, view: &mut V, rules: &R, position: BlockPos, current: u8) where V: LightingWorldView, R: PropagationRules {
		let pulled = spread::pull(view, rules, position);

		let value = if pulled > current {
			view.set_luminance_at(rules.channel(), position, pulled);
			pulled
		} else {
			current
		};

		self.push_from(view, rules, position, value);
	}

	fn push_from<V, R>(&mut self, view: &mut V, rules: &R, position: BlockPos, value: u8) where V: LightingWorldView, R: PropagationRules {
		spread::push(view, rules, &mut self.queue, position, value);
		spread::flood(view, rules, &mut self.queue);
	}
}

impl Default for LightPropagator {
	fn default() -> Self {
		LightPropagator::new()
	}
}
