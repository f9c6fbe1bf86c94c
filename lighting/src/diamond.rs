//! Sets of positions within a Manhattan distance of a cell or of a vertical run of cells. Light
//! fades by one level per step, so these are exactly the cells a light value can reach.

use tera_blockdata::BlockPos;

/// Every position with `|dx| + |dz| == distance` around the column `(x, z)`, at height `y`.
fn ring(x: i32, y: i32, z: i32, distance: i32) -> impl Iterator<Item = BlockPos> {
	(-distance..=distance).flat_map(move |dz| {
		let dx = distance - dz.abs();

		let first = BlockPos::new(x - dx, y, z + dz);
		let second = if dx != 0 { Some(BlockPos::new(x + dx, y, z + dz)) } else { None };

		Some(first).into_iter().chain(second)
	})
}

/// Every position with `|dx| + |dz| <= radius` around the column `(x, z)`, at height `y`.
fn disc(x: i32, y: i32, z: i32, radius: i32) -> impl Iterator<Item = BlockPos> {
	(-radius..=radius).flat_map(move |dz| {
		let extent = radius - dz.abs();

		(-extent..=extent).map(move |dx| BlockPos::new(x + dx, y, z + dz))
	})
}

/// The cells around a vertical run of cells. With a run of a single cell this is an octahedron.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ColumnDiamond {
	x: i32,
	z: i32,
	bottom: i32,
	top: i32,
	radius: i32
}

impl ColumnDiamond {
	/// The cells within `radius` of any of the cells from `bottom` to `top` in the column of
	/// `top`.
	pub fn new(top: BlockPos, bottom: i32, radius: u32) -> Self {
		ColumnDiamond {
			x: top.x(),
			z: top.z(),
			bottom: bottom.min(top.y()),
			top: top.y(),
			radius: radius as i32
		}
	}

	/// The cells within `radius` of the center.
	pub fn around(center: BlockPos, radius: u32) -> Self {
		ColumnDiamond::new(center, center.y(), radius)
	}

	pub fn radius(&self) -> u32 {
		self.radius as u32
	}

	/// Vertical distance from the run.
	fn vertical_distance(&self, y: i32) -> i32 {
		(self.bottom - y).max(y - self.top).max(0)
	}

	pub fn distance(&self, position: BlockPos) -> u32 {
		let horizontal = (position.x() - self.x).abs() + (position.z() - self.z).abs();

		(horizontal + self.vertical_distance(position.y())) as u32
	}

	pub fn contains(&self, position: BlockPos) -> bool {
		self.distance(position) <= self.radius as u32
	}

	/// Every cell within the radius.
	pub fn iter(&self) -> impl Iterator<Item = BlockPos> {
		let diamond = *self;

		(diamond.bottom - diamond.radius..=diamond.top + diamond.radius).flat_map(move |y| {
			disc(diamond.x, y, diamond.z, diamond.radius - diamond.vertical_distance(y))
		})
	}

	/// Every cell exactly one step outside the radius.
	pub fn perimeter(&self) -> impl Iterator<Item = BlockPos> {
		let diamond = *self;
		let distance = diamond.radius + 1;

		(diamond.bottom - distance..=diamond.top + distance).flat_map(move |y| {
			ring(diamond.x, y, diamond.z, distance - diamond.vertical_distance(y))
		})
	}
}

#[cfg(test)]
mod test {
	use crate::diamond::ColumnDiamond;
	use rustc_hash::FxHashSet;
	use tera_blockdata::BlockPos;

	#[test]
	fn test_diamond_count() {
		let center = BlockPos::new(4, 100, -9);

		for radius in 0..6 {
			let diamond = ColumnDiamond::around(center, radius);
			let r = radius as usize;

			// centered octahedral numbers
			let expected = (2 * r + 1) * (2 * r * r + 2 * r + 3) / 3;

			let cells: FxHashSet<BlockPos> = diamond.iter().collect();
			assert_eq!(cells.len(), expected);
			assert_eq!(diamond.iter().count(), expected);
			assert!(cells.iter().all(|&cell| cell.manhattan_distance(center) <= radius));
		}
	}

	#[test]
	fn test_perimeter() {
		let center = BlockPos::new(0, 0, 0);
		let diamond = ColumnDiamond::around(center, 2);

		let shell: FxHashSet<BlockPos> = diamond.perimeter().collect();

		assert_eq!(shell.len(), diamond.perimeter().count());
		assert!(shell.iter().all(|&cell| cell.manhattan_distance(center) == 3));
		// 4 * 3^2 + 2
		assert_eq!(shell.len(), 38);
	}

	#[test]
	fn test_column() {
		let diamond = ColumnDiamond::new(BlockPos::new(0, 20, 0), 10, 3);

		assert!(diamond.contains(BlockPos::new(3, 15, 0)));
		assert!(diamond.contains(BlockPos::new(1, 22, 0)));
		assert!(!diamond.contains(BlockPos::new(1, 23, -1)));
		assert!(!diamond.contains(BlockPos::new(0, 6, 0)));
		assert_eq!(diamond.distance(BlockPos::new(2, 8, 0)), 4);

		let cells: Vec<BlockPos> = diamond.iter().collect();
		assert!(cells.iter().all(|&cell| diamond.contains(cell)));
		// 11 full discs of radius 3, plus two caps of radii 2, 1 and 0
		assert_eq!(cells.len(), 11 * 25 + 2 * (13 + 5 + 1));

		assert!(diamond.perimeter().all(|cell| diamond.distance(cell) == 4));
	}
}
