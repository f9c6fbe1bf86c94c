use crate::array::{DenseArray, Shape, Width};
use crate::error::Result;
use std::marker::PhantomData;
use std::mem;

/// A single Y layer of a sparse array.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SparseLayer<U> {
	/// Every element of the layer holds this value.
	Deflated(u16),
	/// A dense row of `size_x * size_z` elements.
	Inflated(Box<[U]>)
}

/// A linear array that only allocates the Y layers that hold more than one value.
///
/// While no layer exists the array is flat: every element reads as `fill`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SparseArray<W: Width> {
	shape: Shape,
	fill: u16,
	layers: Option<Box<[SparseLayer<W::Unit>]>>,
	width: PhantomData<W>
}

impl<W: Width> SparseArray<W> {
	pub fn new(shape: Shape) -> Result<Self> {
		SparseArray::filled(shape, 0)
	}

	pub fn filled(shape: Shape, value: u16) -> Result<Self> {
		SparseArray::<W>::validate(shape)?;

		Ok(SparseArray { shape, fill: W::mask(value), layers: None, width: PhantomData })
	}

	/// Creates a sparse array from explicit layers. There must be exactly one layer per Y
	/// level, and every inflated row must be sized to the layer.
	pub fn from_layers(shape: Shape, layers: Vec<SparseLayer<W::Unit>>) -> Result<Self> {
		SparseArray::<W>::validate(shape)?;

		if layers.len() != shape.size_y() {
			return Err(shape.invalid("layer count does not match the Y dimension"));
		}

		let row = W::units(shape.size_xz());

		for layer in &layers {
			match layer {
				SparseLayer::Inflated(units) if units.len() != row => {
					return Err(shape.invalid("inflated row does not match the layer size"));
				},
				SparseLayer::Deflated(value) if W::mask(*value) != *value => {
					return Err(shape.invalid("deflated value exceeds the element width"));
				},
				_ => ()
			}
		}

		Ok(SparseArray { shape, fill: 0, layers: Some(layers.into_boxed_slice()), width: PhantomData })
	}

	/// Builds the sparse form of a dense array. Uniform layers are deflated, and if every layer
	/// deflates to the same value the result is flat.
	///
	/// Returns None if the layers of the dense array are not aligned to backing units.
	pub fn from_dense(dense: &DenseArray<W>) -> Option<Self> {
		let shape = dense.shape();
		let mut layers = Vec::with_capacity(shape.size_y());

		for y in 0..shape.size_y() {
			layers.push(match dense.uniform_layer(y) {
				Some(value) => SparseLayer::Deflated(value),
				None => SparseLayer::Inflated(dense.layer_units(y)?.to_vec().into_boxed_slice())
			});
		}

		let array = SparseArray::from_layers(shape, layers).ok()?;

		Some(array.compacted())
	}

	fn validate(shape: Shape) -> Result<()> {
		if W::BITS == 4 && shape.size_xz() % 2 != 0 {
			return Err(shape.invalid("4-bit sparse arrays need an even layer size"));
		}

		Ok(())
	}

	pub fn shape(&self) -> Shape {
		self.shape
	}

	/// The global fill value, meaningful while the array is flat.
	pub fn fill_value(&self) -> u16 {
		self.fill
	}

	/// Returns the layers, or None if the array is flat.
	pub fn layers(&self) -> Option<&[SparseLayer<W::Unit>]> {
		self.layers.as_ref().map(|layers| &layers[..])
	}

	pub fn is_flat(&self) -> bool {
		self.layers.is_none()
	}

	pub fn inflated_layer_count(&self) -> usize {
		self.layers().map(|layers| {
			layers.iter().filter(|layer| match layer {
				SparseLayer::Inflated(_) => true,
				SparseLayer::Deflated(_) => false
			}).count()
		}).unwrap_or(0)
	}

	pub fn get(&self, x: usize, y: usize, z: usize) -> Result<u16> {
		self.shape.check(x, y, z)?;

		let layers = match self.layers {
			Some(ref layers) => layers,
			None => return Ok(self.fill)
		};

		Ok(match layers[y] {
			SparseLayer::Inflated(ref row) => W::get(row, self.shape.layer_index(x, z)),
			SparseLayer::Deflated(value) => value
		})
	}

	pub fn set(&mut self, x: usize, y: usize, z: usize, value: u16) -> Result<u16> {
		self.shape.check(x, y, z)?;

		let value = W::mask(value);

		if self.layers.is_none() && value == self.fill {
			return Ok(value);
		}

		let index = self.shape.layer_index(x, z);
		let row_units = W::units(self.shape.size_xz());
		let (fill, size_y) = (self.fill, self.shape.size_y());

		let layers = self.layers.get_or_insert_with(|| vec![SparseLayer::Deflated(fill); size_y].into_boxed_slice());
		let layer = &mut layers[y];

		let old = match *layer {
			SparseLayer::Inflated(ref mut row) => {
				let old = W::get(row, index);
				W::set(row, index, value);

				return Ok(old);
			},
			SparseLayer::Deflated(old) => old
		};

		if old != value {
			let mut row = vec![W::splat(old); row_units].into_boxed_slice();
			W::set(&mut row, index, value);

			*layer = SparseLayer::Inflated(row);
		}

		Ok(old)
	}

	/// Returns the array to the flat state.
	pub fn fill(&mut self, value: u16) {
		self.fill = W::mask(value);
		self.layers = None;
	}

	/// Deflates inflated rows that became uniform, and flattens the array if every layer holds
	/// the same value.
	pub fn compacted(&self) -> Self {
		let layers = match self.layers {
			Some(ref layers) => layers,
			None => return self.clone()
		};

		let layer_size = self.shape.size_xz();

		let layers: Vec<SparseLayer<W::Unit>> = layers.iter().map(|layer| match layer {
			SparseLayer::Inflated(row) => {
				let first = W::get(row, 0);

				if (1..layer_size).all(|index| W::get(row, index) == first) {
					SparseLayer::Deflated(first)
				} else {
					layer.clone()
				}
			},
			SparseLayer::Deflated(_) => layer.clone()
		}).collect();

		let mut shared = None;
		let mut flat = true;

		for layer in &layers {
			match (layer, shared) {
				(SparseLayer::Deflated(value), None) => shared = Some(*value),
				(SparseLayer::Deflated(value), Some(existing)) if *value == existing => (),
				_ => {
					flat = false;
					break;
				}
			}
		}

		if flat {
			SparseArray { shape: self.shape, fill: shared.unwrap_or(self.fill), layers: None, width: PhantomData }
		} else {
			SparseArray { shape: self.shape, fill: self.fill, layers: Some(layers.into_boxed_slice()), width: PhantomData }
		}
	}

	pub fn estimated_memory_consumption_in_bytes(&self) -> usize {
		let mut total = mem::size_of::<Self>();

		if let Some(ref layers) = self.layers {
			total += layers.len() * mem::size_of::<SparseLayer<W::Unit>>();
			total += self.inflated_layer_count() * W::units(self.shape.size_xz()) * mem::size_of::<W::Unit>();
		}

		total
	}
}
