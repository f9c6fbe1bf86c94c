use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Formatter};

/// One of the six axis-aligned faces of a block.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
	Up,
	Down,
	PlusX,
	MinusX,
	PlusZ,
	MinusZ
}

const ALL: [Side; 6] = [Side::Up, Side::Down, Side::PlusX, Side::MinusX, Side::PlusZ, Side::MinusZ];
const HORIZONTAL: [Side; 4] = [Side::PlusX, Side::MinusX, Side::PlusZ, Side::MinusZ];

impl Side {
	pub fn all() -> [Side; 6] {
		ALL
	}

	pub fn horizontal_sides() -> [Side; 4] {
		HORIZONTAL
	}

	pub fn reverse(self) -> Side {
		match self {
			Side::Up     => Side::Down,
			Side::Down   => Side::Up,
			Side::PlusX  => Side::MinusX,
			Side::MinusX => Side::PlusX,
			Side::PlusZ  => Side::MinusZ,
			Side::MinusZ => Side::PlusZ
		}
	}

	pub fn horizontal(self) -> bool {
		!self.vertical()
	}

	pub fn vertical(self) -> bool {
		self == Side::Up || self == Side::Down
	}

	/// Unit offset vector pointing out of this face, as `(x, y, z)`.
	pub fn offset(self) -> (i32, i32, i32) {
		match self {
			Side::Up     => ( 0,  1,  0),
			Side::Down   => ( 0, -1,  0),
			Side::PlusX  => ( 1,  0,  0),
			Side::MinusX => (-1,  0,  0),
			Side::PlusZ  => ( 0,  0,  1),
			Side::MinusZ => ( 0,  0, -1)
		}
	}

	fn bit(self) -> u8 {
		1 << (self as u8)
	}
}

/// A set of sides packed into the low 6 bits of a byte.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SideSet(u8);

impl SideSet {
	pub fn empty() -> Self {
		SideSet(0)
	}

	pub fn all() -> Self {
		SideSet(0b11_1111)
	}

	pub fn of(sides: &[Side]) -> Self {
		sides.iter().fold(SideSet::empty(), |set, &side| set.with(side))
	}

	pub fn with(self, side: Side) -> Self {
		SideSet(self.0 | side.bit())
	}

	pub fn without(self, side: Side) -> Self {
		SideSet(self.0 & !side.bit())
	}

	pub fn contains(self, side: Side) -> bool {
		self.0 & side.bit() != 0
	}

	pub fn is_empty(self) -> bool {
		self.0 == 0
	}

	/// Sides present in `self` but not in `other`.
	pub fn difference(self, other: SideSet) -> SideSet {
		SideSet(self.0 & !other.0)
	}

	pub fn iter(self) -> impl Iterator<Item = Side> {
		ALL.iter().cloned().filter(move |&side| self.contains(side))
	}
}

impl Debug for SideSet {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}
