use crate::array::{Shape, Width};
use crate::error::Result;
use std::marker::PhantomData;
use std::mem;

/// A linear array with a backing buffer sized exactly to the element count.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DenseArray<W: Width> {
	shape: Shape,
	units: Box<[W::Unit]>,
	width: PhantomData<W>
}

impl<W: Width> DenseArray<W> {
	pub fn new(shape: Shape) -> Result<Self> {
		DenseArray::filled(shape, 0)
	}

	/// Creates an array with every element set to the value.
	pub fn filled(shape: Shape, value: u16) -> Result<Self> {
		DenseArray::<W>::validate(shape)?;

		let units = vec![W::splat(W::mask(value)); W::units(shape.size_xyz())];

		Ok(DenseArray { shape, units: units.into_boxed_slice(), width: PhantomData })
	}

	/// Wraps existing backing units. The unit count must match the shape exactly.
	pub fn from_units(shape: Shape, units: Vec<W::Unit>) -> Result<Self> {
		DenseArray::<W>::validate(shape)?;

		if units.len() != W::units(shape.size_xyz()) {
			return Err(shape.invalid("backing unit count does not match dimensions"));
		}

		Ok(DenseArray { shape, units: units.into_boxed_slice(), width: PhantomData })
	}

	fn validate(shape: Shape) -> Result<()> {
		if W::BITS == 4 && shape.size_xyz() % 2 != 0 {
			return Err(shape.invalid("4-bit dense arrays need an even element count"));
		}

		Ok(())
	}

	pub fn shape(&self) -> Shape {
		self.shape
	}

	pub fn units(&self) -> &[W::Unit] {
		&self.units
	}

	/// The backing units of a single Y layer. Layers only start on a unit boundary when the
	/// layer size is a whole number of units, so this returns None for odd-sized 4-bit layers.
	pub fn layer_units(&self, y: usize) -> Option<&[W::Unit]> {
		let layer = self.shape.size_xz();

		if W::BITS == 4 && layer % 2 != 0 {
			return None;
		}

		let len = W::units(layer);

		self.units.get(y * len..(y + 1) * len)
	}

	pub fn get(&self, x: usize, y: usize, z: usize) -> Result<u16> {
		let index = self.shape.index(x, y, z)?;

		Ok(W::get(&self.units, index))
	}

	pub fn set(&mut self, x: usize, y: usize, z: usize, value: u16) -> Result<u16> {
		let index = self.shape.index(x, y, z)?;

		let old = W::get(&self.units, index);
		W::set(&mut self.units, index, W::mask(value));

		Ok(old)
	}

	pub fn fill(&mut self, value: u16) {
		let unit = W::splat(W::mask(value));

		for slot in self.units.iter_mut() {
			*slot = unit;
		}
	}

	/// Returns the shared value of every element in the layer, or None if the layer is mixed.
	pub fn uniform_layer(&self, y: usize) -> Option<u16> {
		let layer = self.shape.size_xz();
		let start = y * layer;
		let first = W::get(&self.units, start);

		if (start + 1..start + layer).all(|index| W::get(&self.units, index) == first) {
			Some(first)
		} else {
			None
		}
	}

	pub fn estimated_memory_consumption_in_bytes(&self) -> usize {
		mem::size_of::<Self>() + self.units.len() * mem::size_of::<W::Unit>()
	}
}

#[cfg(test)]
mod test {
	use crate::array::{Byte, DenseArray, Nibble, Shape, Short};

	#[test]
	fn test_nibble_layout() {
		let mut array = DenseArray::<Nibble>::new(Shape::new(2, 2, 2).unwrap()).unwrap();

		array.set(0, 0, 0, 0x3).unwrap();
		array.set(1, 0, 0, 0xC).unwrap();
		array.set(1, 1, 1, 0x7).unwrap();

		assert_eq!(array.units(), &[0xC3, 0x00, 0x00, 0x70]);
	}

	#[test]
	fn test_from_units_checks_length() {
		let shape = Shape::new(4, 4, 4).unwrap();

		assert!(DenseArray::<Byte>::from_units(shape, vec![0; 64]).is_ok());
		assert!(DenseArray::<Byte>::from_units(shape, vec![0; 63]).is_err());
		assert!(DenseArray::<Nibble>::from_units(shape, vec![0; 32]).is_ok());
		assert!(DenseArray::<Short>::from_units(shape, vec![0; 32]).is_err());
	}

	#[test]
	fn test_filled() {
		let array = DenseArray::<Nibble>::filled(Shape::new(2, 1, 2).unwrap(), 0x1A).unwrap();
		assert_eq!(array.units(), &[0xAA, 0xAA]);

		assert!(DenseArray::<Nibble>::filled(Shape::new(3, 1, 3).unwrap(), 1).is_err());
		assert!(DenseArray::<Byte>::filled(Shape::new(3, 1, 3).unwrap(), 1).is_ok());
	}

	#[test]
	fn test_uniform_layer() {
		let mut array = DenseArray::<Short>::filled(Shape::new(3, 2, 3).unwrap(), 40).unwrap();

		assert_eq!(array.uniform_layer(0), Some(40));
		array.set(2, 1, 2, 41).unwrap();
		assert_eq!(array.uniform_layer(0), Some(40));
		assert_eq!(array.uniform_layer(1), None);
	}

	#[test]
	fn test_layer_units() {
		let array = DenseArray::<Nibble>::new(Shape::new(4, 3, 2).unwrap()).unwrap();
		assert_eq!(array.layer_units(2).map(|units| units.len()), Some(4));

		let odd = DenseArray::<Nibble>::new(Shape::new(3, 2, 3).unwrap()).unwrap();
		assert_eq!(odd.layer_units(0), None);
	}
}
