use tera_blockdata::{Block, Side, SideSet};

/// The brightest light level, held by cells open to the sky.
pub const MAX_LIGHT: u8 = 15;

/// How a block change affects the ability of light to travel through a cell.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PropagationComparison {
	Identical,
	MorePermissive,
	MoreRestricted
}

impl PropagationComparison {
	pub fn is_restricting(self) -> bool {
		self == PropagationComparison::MoreRestricted
	}

	pub fn is_permitting(self) -> bool {
		self == PropagationComparison::MorePermissive
	}

	/// Merges two comparisons. Any restriction takes precedence over any new permission.
	pub fn combine(self, other: PropagationComparison) -> PropagationComparison {
		match (self, other) {
			(PropagationComparison::MoreRestricted, _) | (_, PropagationComparison::MoreRestricted) => PropagationComparison::MoreRestricted,
			(PropagationComparison::MorePermissive, _) | (_, PropagationComparison::MorePermissive) => PropagationComparison::MorePermissive,
			_ => PropagationComparison::Identical
		}
	}

	/// Compares a single permission before and after a change.
	pub fn of_permission(old: bool, new: bool) -> PropagationComparison {
		match (old, new) {
			(true, false) => PropagationComparison::MoreRestricted,
			(false, true) => PropagationComparison::MorePermissive,
			_ => PropagationComparison::Identical
		}
	}
}

/// Returns true if sunlight passes through the block without losing any strength. Liquids are
/// translucent but always dim sunlight by one level.
pub fn does_sunlight_retain_full_strength_in(block: &Block) -> bool {
	block.translucent() && !block.liquid()
}

/// Returns true if light inside the block can leave through the given face.
pub fn can_spread_light_out_of(block: &Block, side: Side) -> bool {
	block.luminance() > 0 || block.translucent() || !block.is_full_side(side)
}

/// Returns true if light can enter the block through the given face.
pub fn can_spread_light_into(block: &Block, side: Side) -> bool {
	block.translucent() || !block.is_full_side(side)
}

/// Faces that stop light, ignoring luminance.
fn blocking_sides(block: &Block) -> SideSet {
	if block.translucent() {
		SideSet::empty()
	} else {
		block.full_sides()
	}
}

/// Compares the faces that stop light between the new and the old block. A newly solid face
/// makes the change restrictive even if other faces opened up.
pub fn compare_lighting_propagation(new: &Block, old: &Block) -> PropagationComparison {
	let new_blocking = blocking_sides(new);
	let old_blocking = blocking_sides(old);

	if !new_blocking.difference(old_blocking).is_empty() {
		PropagationComparison::MoreRestricted
	} else if !old_blocking.difference(new_blocking).is_empty() {
		PropagationComparison::MorePermissive
	} else {
		PropagationComparison::Identical
	}
}

/// Compares light travel through one face, in both directions. Unlike
/// `compare_lighting_propagation`, light leaving a luminous block is taken into account.
pub fn compare_side_propagation(new: &Block, old: &Block, side: Side) -> PropagationComparison {
	let out_of = PropagationComparison::of_permission(can_spread_light_out_of(old, side), can_spread_light_out_of(new, side));
	let into = PropagationComparison::of_permission(can_spread_light_into(old, side), can_spread_light_into(new, side));

	out_of.combine(into)
}
