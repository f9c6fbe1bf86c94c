use crate::position::BlockPos;
use std::cmp::{max, min};
use std::fmt::{Debug, Formatter, Result};

/// An axis-aligned box of block positions with inclusive bounds, or the empty region.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Region3i(Option<(BlockPos, BlockPos)>);

impl Region3i {
	pub const EMPTY: Region3i = Region3i(None);

	/// Creates the region spanning both corners. The corners may be given in any order.
	pub fn from_corners(a: BlockPos, b: BlockPos) -> Self {
		let min = BlockPos::new(min(a.x(), b.x()), min(a.y(), b.y()), min(a.z(), b.z()));
		let max = BlockPos::new(max(a.x(), b.x()), max(a.y(), b.y()), max(a.z(), b.z()));

		Region3i(Some((min, max)))
	}

	pub fn single(position: BlockPos) -> Self {
		Region3i(Some((position, position)))
	}

	/// The cube of the given extent around a center position.
	pub fn from_center_extents(center: BlockPos, extent: i32) -> Self {
		Region3i::from_corners(
			BlockPos::new(center.x() - extent, center.y() - extent, center.z() - extent),
			BlockPos::new(center.x() + extent, center.y() + extent, center.z() + extent)
		)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_none()
	}

	pub fn min(&self) -> Option<BlockPos> {
		self.0.map(|(min, _)| min)
	}

	pub fn max(&self) -> Option<BlockPos> {
		self.0.map(|(_, max)| max)
	}

	pub fn contains(&self, position: BlockPos) -> bool {
		match self.0 {
			Some((min, max)) => {
				position.x() >= min.x() && position.x() <= max.x() &&
				position.y() >= min.y() && position.y() <= max.y() &&
				position.z() >= min.z() && position.z() <= max.z()
			},
			None => false
		}
	}

	/// Returns the smallest region containing this region and the position.
	pub fn encompass(self, position: BlockPos) -> Self {
		self.union(Region3i::single(position))
	}

	pub fn union(self, other: Region3i) -> Self {
		match (self.0, other.0) {
			(Some((a_min, a_max)), Some((b_min, b_max))) => Region3i::from_corners(
				BlockPos::new(min(a_min.x(), b_min.x()), min(a_min.y(), b_min.y()), min(a_min.z(), b_min.z())),
				BlockPos::new(max(a_max.x(), b_max.x()), max(a_max.y(), b_max.y()), max(a_max.z(), b_max.z()))
			),
			(Some(_), None) => self,
			(None, _) => other
		}
	}

	pub fn volume(&self) -> u64 {
		match self.0 {
			Some((min, max)) => {
				((max.x() - min.x() + 1) as u64) * ((max.y() - min.y() + 1) as u64) * ((max.z() - min.z() + 1) as u64)
			},
			None => 0
		}
	}

	/// Iterates every position in the region in YZX order.
	pub fn iter(&self) -> impl Iterator<Item = BlockPos> {
		let bounds = self.0;

		bounds.into_iter().flat_map(|(min, max)| {
			(min.y()..=max.y()).flat_map(move |y| {
				(min.z()..=max.z()).flat_map(move |z| {
					(min.x()..=max.x()).map(move |x| BlockPos::new(x, y, z))
				})
			})
		})
	}
}

impl Default for Region3i {
	fn default() -> Self {
		Region3i::EMPTY
	}
}

impl Debug for Region3i {
	fn fmt(&self, f: &mut Formatter) -> Result {
		match self.0 {
			Some((min, max)) => write!(f, "Region3i {{ min: {}, max: {} }}", min, max),
			None => write!(f, "Region3i {{ empty }}")
		}
	}
}

#[cfg(test)]
mod test {
	use crate::position::{BlockPos, Region3i};

	#[test]
	fn test_union_and_contains() {
		let region = Region3i::single(BlockPos::new(1, 1, 1)).encompass(BlockPos::new(-2, 4, 0));

		assert_eq!(region.min(), Some(BlockPos::new(-2, 1, 0)));
		assert_eq!(region.max(), Some(BlockPos::new(1, 4, 1)));
		assert!(region.contains(BlockPos::new(0, 2, 1)));
		assert!(!region.contains(BlockPos::new(0, 5, 1)));
		assert_eq!(region.volume(), 4 * 4 * 2);
		assert_eq!(region.iter().count() as u64, region.volume());
	}

	#[test]
	fn test_empty() {
		let empty = Region3i::EMPTY;

		assert!(empty.is_empty());
		assert!(!empty.contains(BlockPos::new(0, 0, 0)));
		assert_eq!(empty.iter().count(), 0);
		assert_eq!(empty.union(empty), empty);

		let single = Region3i::single(BlockPos::new(3, 3, 3));
		assert_eq!(empty.union(single), single);
		assert_eq!(single.union(empty), single);
	}

	#[test]
	fn test_center_extents() {
		let region = Region3i::from_center_extents(BlockPos::new(0, 10, 0), 2);

		assert_eq!(region.volume(), 125);
		assert!(region.contains(BlockPos::new(-2, 12, 2)));
	}
}
