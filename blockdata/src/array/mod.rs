mod width;
mod dense;
mod sparse;
mod octree;
mod deflate;
mod shared;

pub use self::width::{Width, Nibble, Byte, Short};
pub use self::dense::DenseArray;
pub use self::sparse::{SparseArray, SparseLayer};
pub use self::octree::{OcTree, OcNode};
pub use self::deflate::{Deflator, StandardDeflator};
pub use self::shared::SharedArray;

use crate::error::{ArrayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The dimensions of an array. Every array is indexed in YZX order: `y * size_x * size_z + z * size_x + x`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Shape {
	size_x: usize,
	size_y: usize,
	size_z: usize
}

impl Shape {
	/// Creates a new shape. Every dimension must be nonzero, and the element count must be
	/// representable in the 32-bit length fields of the serialized form.
	pub fn new(size_x: usize, size_y: usize, size_z: usize) -> Result<Self> {
		let invalid = |reason| ArrayError::InvalidShape { size_x, size_y, size_z, reason };

		if size_x == 0 || size_y == 0 || size_z == 0 {
			return Err(invalid("dimensions must be positive"));
		}

		let count = size_x.checked_mul(size_y).and_then(|xy| xy.checked_mul(size_z));

		match count {
			Some(count) if count <= (i32::max_value() / 2) as usize => Ok(Shape { size_x, size_y, size_z }),
			_ => Err(invalid("element count is too large"))
		}
	}

	pub fn size_x(&self) -> usize {
		self.size_x
	}

	pub fn size_y(&self) -> usize {
		self.size_y
	}

	pub fn size_z(&self) -> usize {
		self.size_z
	}

	/// Number of elements in a single Y layer.
	pub fn size_xz(&self) -> usize {
		self.size_x * self.size_z
	}

	pub fn size_xyz(&self) -> usize {
		self.size_x * self.size_y * self.size_z
	}

	pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
		x < self.size_x && y < self.size_y && z < self.size_z
	}

	pub(crate) fn check(&self, x: usize, y: usize, z: usize) -> Result<()> {
		if self.contains(x, y, z) {
			Ok(())
		} else {
			Err(ArrayError::IndexOutOfRange {
				x,
				y,
				z,
				size_x: self.size_x,
				size_y: self.size_y,
				size_z: self.size_z
			})
		}
	}

	/// Returns the YZX index of an element, or IndexOutOfRange.
	pub(crate) fn index(&self, x: usize, y: usize, z: usize) -> Result<usize> {
		self.check(x, y, z)?;

		Ok(y * self.size_xz() + z * self.size_x + x)
	}

	/// Index of the element inside its Y layer.
	pub(crate) fn layer_index(&self, x: usize, z: usize) -> usize {
		z * self.size_x + x
	}

	pub(crate) fn invalid(&self, reason: &'static str) -> ArrayError {
		ArrayError::InvalidShape { size_x: self.size_x, size_y: self.size_y, size_z: self.size_z, reason }
	}
}

/// Names the concrete representation of an array. This is the key used by the registry and the
/// kind stored next to serialized arrays.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayKind {
	Dense4,
	Dense8,
	Dense16,
	Sparse4,
	Sparse8,
	Sparse16,
	OcTree
}

impl ArrayKind {
	pub fn all() -> [ArrayKind; 7] {
		[
			ArrayKind::Dense4,
			ArrayKind::Dense8,
			ArrayKind::Dense16,
			ArrayKind::Sparse4,
			ArrayKind::Sparse8,
			ArrayKind::Sparse16,
			ArrayKind::OcTree
		]
	}

	pub fn name(self) -> &'static str {
		match self {
			ArrayKind::Dense4   => "dense4",
			ArrayKind::Dense8   => "dense8",
			ArrayKind::Dense16  => "dense16",
			ArrayKind::Sparse4  => "sparse4",
			ArrayKind::Sparse8  => "sparse8",
			ArrayKind::Sparse16 => "sparse16",
			ArrayKind::OcTree   => "octree"
		}
	}

	pub fn from_name(name: &str) -> Option<ArrayKind> {
		ArrayKind::all().iter().cloned().find(|kind| kind.name() == name)
	}

	pub fn element_size_in_bits(self) -> u8 {
		match self {
			ArrayKind::Dense4 | ArrayKind::Sparse4 => 4,
			ArrayKind::Dense8 | ArrayKind::Sparse8 | ArrayKind::OcTree => 8,
			ArrayKind::Dense16 | ArrayKind::Sparse16 => 16
		}
	}

	pub fn is_sparse(self) -> bool {
		match self {
			ArrayKind::Sparse4 | ArrayKind::Sparse8 | ArrayKind::Sparse16 => true,
			_ => false
		}
	}

	pub fn create(self, shape: Shape) -> Result<TeraArray> {
		self.create_filled(shape, 0)
	}

	pub fn create_filled(self, shape: Shape, fill: u16) -> Result<TeraArray> {
		Ok(match self {
			ArrayKind::Dense4   => TeraArray::Dense4(DenseArray::filled(shape, fill)?),
			ArrayKind::Dense8   => TeraArray::Dense8(DenseArray::filled(shape, fill)?),
			ArrayKind::Dense16  => TeraArray::Dense16(DenseArray::filled(shape, fill)?),
			ArrayKind::Sparse4  => TeraArray::Sparse4(SparseArray::filled(shape, fill)?),
			ArrayKind::Sparse8  => TeraArray::Sparse8(SparseArray::filled(shape, fill)?),
			ArrayKind::Sparse16 => TeraArray::Sparse16(SparseArray::filled(shape, fill)?),
			ArrayKind::OcTree   => TeraArray::OcTree(OcTree::filled(shape, fill))
		})
	}
}

impl Display for ArrayKind {
	fn fmt(&self, f: &mut Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A 3D grid of fixed bit-width scalars with an immutable shape.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TeraArray {
	Dense4(DenseArray<Nibble>),
	Dense8(DenseArray<Byte>),
	Dense16(DenseArray<Short>),
	Sparse4(SparseArray<Nibble>),
	Sparse8(SparseArray<Byte>),
	Sparse16(SparseArray<Short>),
	OcTree(OcTree)
}

macro_rules! dispatch {
	($array:expr, $inner:ident => $body:expr) => {
		match $array {
			TeraArray::Dense4($inner)   => $body,
			TeraArray::Dense8($inner)   => $body,
			TeraArray::Dense16($inner)  => $body,
			TeraArray::Sparse4($inner)  => $body,
			TeraArray::Sparse8($inner)  => $body,
			TeraArray::Sparse16($inner) => $body,
			TeraArray::OcTree($inner)   => $body
		}
	};
}

impl TeraArray {
	pub fn kind(&self) -> ArrayKind {
		match self {
			TeraArray::Dense4(_)   => ArrayKind::Dense4,
			TeraArray::Dense8(_)   => ArrayKind::Dense8,
			TeraArray::Dense16(_)  => ArrayKind::Dense16,
			TeraArray::Sparse4(_)  => ArrayKind::Sparse4,
			TeraArray::Sparse8(_)  => ArrayKind::Sparse8,
			TeraArray::Sparse16(_) => ArrayKind::Sparse16,
			TeraArray::OcTree(_)   => ArrayKind::OcTree
		}
	}

	pub fn shape(&self) -> Shape {
		dispatch!(self, array => array.shape())
	}

	pub fn size_x(&self) -> usize {
		self.shape().size_x()
	}

	pub fn size_y(&self) -> usize {
		self.shape().size_y()
	}

	pub fn size_z(&self) -> usize {
		self.shape().size_z()
	}

	pub fn element_size_in_bits(&self) -> u8 {
		self.kind().element_size_in_bits()
	}

	pub fn is_sparse(&self) -> bool {
		self.kind().is_sparse()
	}

	/// Masks a value to the element width of this array.
	pub fn mask(&self, value: u16) -> u16 {
		match self.element_size_in_bits() {
			4 => value & 0xF,
			8 => value & 0xFF,
			_ => value
		}
	}

	pub fn get(&self, x: usize, y: usize, z: usize) -> Result<u16> {
		dispatch!(self, array => array.get(x, y, z))
	}

	/// Stores a value, returning the previous value. Values wider than the element size are
	/// truncated to the element width.
	pub fn set(&mut self, x: usize, y: usize, z: usize, value: u16) -> Result<u16> {
		dispatch!(self, array => array.set(x, y, z, value))
	}

	/// Stores `value` only if the current value equals `expected`. Returns whether the value was
	/// stored. Both values are compared after masking to the element width.
	pub fn compare_and_set(&mut self, x: usize, y: usize, z: usize, value: u16, expected: u16) -> Result<bool> {
		let expected = self.mask(expected);

		if self.get(x, y, z)? != expected {
			return Ok(false);
		}

		self.set(x, y, z, value)?;

		Ok(true)
	}

	/// Sets every element to the value.
	pub fn fill(&mut self, value: u16) {
		dispatch!(self, array => array.fill(value))
	}

	/// Returns a deep copy with independent backing storage.
	pub fn copy(&self) -> TeraArray {
		self.clone()
	}

	pub fn estimated_memory_consumption_in_bytes(&self) -> usize {
		dispatch!(self, array => array.estimated_memory_consumption_in_bytes())
	}

	/// Converts this array into an alternate representation chosen by the deflator.
	pub fn deflate<D>(&self, deflator: &D) -> TeraArray where D: Deflator {
		match self {
			TeraArray::Dense4(array)   => deflator.deflate_dense(array),
			TeraArray::Dense8(array)   => deflator.deflate_dense(array),
			TeraArray::Dense16(array)  => deflator.deflate_dense(array),
			TeraArray::Sparse4(array)  => deflator.deflate_sparse(array),
			TeraArray::Sparse8(array)  => deflator.deflate_sparse(array),
			TeraArray::Sparse16(array) => deflator.deflate_sparse(array),
			TeraArray::OcTree(array)   => deflator.deflate_octree(array)
		}
	}
}

/// Ties an element width to the array variants that use it.
pub trait ArrayWidth: Width {
	const DENSE: ArrayKind;
	const SPARSE: ArrayKind;

	fn wrap_dense(array: DenseArray<Self>) -> TeraArray;
	fn wrap_sparse(array: SparseArray<Self>) -> TeraArray;
	fn as_dense(array: &TeraArray) -> Option<&DenseArray<Self>>;
	fn as_sparse(array: &TeraArray) -> Option<&SparseArray<Self>>;
}

macro_rules! array_width {
	($width:ty, $dense:ident, $sparse:ident) => {
		impl ArrayWidth for $width {
			const DENSE: ArrayKind = ArrayKind::$dense;
			const SPARSE: ArrayKind = ArrayKind::$sparse;

			fn wrap_dense(array: DenseArray<Self>) -> TeraArray {
				TeraArray::$dense(array)
			}

			fn wrap_sparse(array: SparseArray<Self>) -> TeraArray {
				TeraArray::$sparse(array)
			}

			fn as_dense(array: &TeraArray) -> Option<&DenseArray<Self>> {
				match array {
					TeraArray::$dense(array) => Some(array),
					_ => None
				}
			}

			fn as_sparse(array: &TeraArray) -> Option<&SparseArray<Self>> {
				match array {
					TeraArray::$sparse(array) => Some(array),
					_ => None
				}
			}
		}
	};
}

array_width!(Nibble, Dense4, Sparse4);
array_width!(Byte, Dense8, Sparse8);
array_width!(Short, Dense16, Sparse16);

#[cfg(test)]
mod test {
	use super::{ArrayKind, Shape, TeraArray};
	use crate::error::ArrayError;
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};

	fn shape() -> Shape {
		Shape::new(6, 5, 4).unwrap()
	}

	#[test]
	fn test_shape_validation() {
		assert!(Shape::new(0, 1, 1).is_err());
		assert!(Shape::new(1, 1, 1).is_ok());

		// 4-bit packing needs an even element count (dense) or even layer size (sparse)
		let odd = Shape::new(3, 3, 3).unwrap();
		assert!(ArrayKind::Dense4.create(odd).is_err());
		assert!(ArrayKind::Sparse4.create(odd).is_err());
		assert!(ArrayKind::Dense8.create(odd).is_ok());
	}

	#[test]
	fn test_kind_names() {
		for kind in ArrayKind::all().iter().cloned() {
			assert_eq!(ArrayKind::from_name(kind.name()), Some(kind));
			assert_eq!(kind.create(shape()).unwrap().kind(), kind);
		}

		assert_eq!(ArrayKind::from_name("dense32"), None);
	}

	#[test]
	fn test_out_of_range() {
		for kind in ArrayKind::all().iter().cloned() {
			let mut array = kind.create(shape()).unwrap();

			match array.get(6, 0, 0) {
				Err(ArrayError::IndexOutOfRange { x: 6, .. }) => (),
				other => panic!("{}: expected IndexOutOfRange, got {:?}", kind, other)
			}

			assert!(array.set(0, 5, 0, 1).is_err(), "{}", kind);
			assert!(array.compare_and_set(0, 0, 4, 1, 0).is_err(), "{}", kind);
		}
	}

	#[test]
	fn test_set_masks_value() {
		for kind in ArrayKind::all().iter().cloned() {
			let mut array = kind.create(shape()).unwrap();

			array.set(1, 0, 0, 0x3).unwrap();
			array.set(0, 0, 0, 0x1234).unwrap();

			let expected = array.mask(0x1234);
			assert_eq!(array.get(0, 0, 0).unwrap(), expected, "{}", kind);
			assert_eq!(array.get(1, 0, 0).unwrap(), 0x3, "{}: neighbor was corrupted", kind);
		}
	}

	#[test]
	fn test_compare_and_set() {
		for kind in ArrayKind::all().iter().cloned() {
			let mut array = kind.create(shape()).unwrap();

			array.set(2, 3, 1, 7).unwrap();

			assert!(!array.compare_and_set(2, 3, 1, 9, 6).unwrap(), "{}", kind);
			assert_eq!(array.get(2, 3, 1).unwrap(), 7);

			assert!(array.compare_and_set(2, 3, 1, 9, 7).unwrap(), "{}", kind);
			assert_eq!(array.get(2, 3, 1).unwrap(), 9);
		}
	}

	#[test]
	fn test_copy_is_independent() {
		for kind in ArrayKind::all().iter().cloned() {
			let mut array = kind.create(shape()).unwrap();
			array.set(1, 1, 1, 5).unwrap();

			let copy = array.copy();
			array.set(1, 1, 1, 2).unwrap();

			assert_eq!(copy.get(1, 1, 1).unwrap(), 5, "{}", kind);
		}
	}

	/// Every representation of the same width must read back the same values.
	#[test]
	fn test_sparse_dense_equivalence() {
		let groups: [&[ArrayKind]; 3] = [
			&[ArrayKind::Dense4, ArrayKind::Sparse4],
			&[ArrayKind::Dense8, ArrayKind::Sparse8, ArrayKind::OcTree],
			&[ArrayKind::Dense16, ArrayKind::Sparse16]
		];

		let mut rng = StdRng::seed_from_u64(0x7e7a);

		for group in groups.iter() {
			let mut arrays: Vec<TeraArray> = group.iter().map(|kind| kind.create(shape()).unwrap()).collect();

			for _ in 0..2000 {
				let (x, y, z) = (rng.gen_range(0..6), rng.gen_range(0..5), rng.gen_range(0..4));
				let value: u16 = rng.gen();

				let previous: Vec<u16> = arrays.iter_mut().map(|array| array.set(x, y, z, value).unwrap()).collect();
				assert!(previous.windows(2).all(|pair| pair[0] == pair[1]), "{:?}: {:?}", group, previous);
			}

			for (x, y, z) in iproduct(6, 5, 4) {
				let values: Vec<u16> = arrays.iter().map(|array| array.get(x, y, z).unwrap()).collect();
				assert!(values.windows(2).all(|pair| pair[0] == pair[1]), "{:?} at ({}, {}, {}): {:?}", group, x, y, z, values);
			}
		}
	}

	#[test]
	fn test_fill() {
		for kind in ArrayKind::all().iter().cloned() {
			let mut array = kind.create(shape()).unwrap();
			array.set(3, 2, 1, 1).unwrap();
			array.fill(6);

			for (x, y, z) in iproduct(6, 5, 4) {
				assert_eq!(array.get(x, y, z).unwrap(), 6, "{}", kind);
			}
		}
	}

	fn iproduct(sx: usize, sy: usize, sz: usize) -> impl Iterator<Item = (usize, usize, usize)> {
		(0..sy).flat_map(move |y| (0..sz).flat_map(move |z| (0..sx).map(move |x| (x, y, z))))
	}
}
