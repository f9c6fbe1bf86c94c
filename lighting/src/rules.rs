use crate::util::{self, PropagationComparison, MAX_LIGHT};
use tera_blockdata::{Block, BlockPos, Chunk, LightChannel, Side};

/// How the light of one channel enters, leaves and fades across cells.
///
/// Sides passed to `propagate_value` are directions of travel, while sides passed to
/// `can_spread_out_of` and `can_spread_into` name the face of the block itself. Light moving from
/// `a` to its neighbour `b` in direction `side` passes if `can_spread_out_of(a, side)` and
/// `can_spread_into(b, side.reverse())` both hold.
pub trait PropagationRules {
	fn channel(&self) -> LightChannel;

	fn max_value(&self) -> u8 {
		MAX_LIGHT
	}

	/// The value a cell holds on its own, regardless of its neighbours.
	fn fixed_value(&self, block: &Block, position: BlockPos) -> u8;

	/// The value light of `value` has after one step in direction `side` into `to`.
	fn propagate_value(&self, value: u8, side: Side, to: &Block) -> u8;

	fn can_spread_out_of(&self, block: &Block, side: Side) -> bool {
		util::can_spread_light_out_of(block, side)
	}

	fn can_spread_into(&self, block: &Block, side: Side) -> bool {
		util::can_spread_light_into(block, side)
	}

	/// Compares light travel through one face of a cell whose block changed from `old` to `new`.
	fn compare_propagation(&self, new: &Block, old: &Block, side: Side) -> PropagationComparison {
		util::compare_side_propagation(new, old, side)
	}

	/// Compares light travel through every face of the cell. Restriction on any face wins.
	fn compare_block_propagation(&self, new: &Block, old: &Block) -> PropagationComparison {
		Side::all().iter().fold(PropagationComparison::Identical, |comparison, &side| {
			comparison.combine(self.compare_propagation(new, old, side))
		})
	}
}

/// Light emitted by luminous blocks, fading by one level per step in every direction.
#[derive(Debug, Copy, Clone, Default)]
pub struct LightRules;

impl PropagationRules for LightRules {
	fn channel(&self) -> LightChannel {
		LightChannel::Light
	}

	fn fixed_value(&self, block: &Block, _: BlockPos) -> u8 {
		block.luminance()
	}

	fn propagate_value(&self, value: u8, _: Side, _: &Block) -> u8 {
		value.saturating_sub(1)
	}
}

/// Light from the sky. It enters the world through the top face of the highest cells, and travels
/// straight down through blocks that retain its full strength without fading.
#[derive(Debug, Copy, Clone, Default)]
pub struct SunlightRules;

impl SunlightRules {
	const TOP: i32 = Chunk::SIZE_Y as i32 - 1;
}

impl PropagationRules for SunlightRules {
	fn channel(&self) -> LightChannel {
		LightChannel::Sunlight
	}

	fn fixed_value(&self, block: &Block, position: BlockPos) -> u8 {
		if position.y() != SunlightRules::TOP || !self.can_spread_into(block, Side::Up) {
			0
		} else if util::does_sunlight_retain_full_strength_in(block) {
			MAX_LIGHT
		} else {
			MAX_LIGHT - 1
		}
	}

	fn propagate_value(&self, value: u8, side: Side, to: &Block) -> u8 {
		if value == MAX_LIGHT && side == Side::Down && util::does_sunlight_retain_full_strength_in(to) {
			MAX_LIGHT
		} else {
			value.saturating_sub(1)
		}
	}

	// Luminance has no bearing on sunlight.
	fn can_spread_out_of(&self, block: &Block, side: Side) -> bool {
		util::can_spread_light_into(block, side)
	}

	fn compare_propagation(&self, new: &Block, old: &Block, side: Side) -> PropagationComparison {
		let faces = PropagationComparison::of_permission(self.can_spread_into(old, side), self.can_spread_into(new, side));

		if side.vertical() {
			let strength = PropagationComparison::of_permission(
				util::does_sunlight_retain_full_strength_in(old),
				util::does_sunlight_retain_full_strength_in(new)
			);

			faces.combine(strength)
		} else {
			faces
		}
	}
}
