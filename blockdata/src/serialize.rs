//! Binary (de)serialization of arrays.
//!
//! Every array is written as `[i32 length][i32 size_x][i32 size_y][i32 size_z][payload]`, all
//! big-endian, where `length` counts every byte after the length field itself. The payload
//! depends on the array kind:
//!
//! * dense: `[i32 unit_count][units]`
//! * sparse: `0` followed by a single fill unit for a flat array, or `1` followed by one entry
//!   per Y layer, each either `0` and a fill unit or `1` and the units of the row
//! * octree: the nodes in pre-order, `0` and the leaf value or `1` and the eight children
//!
//! Units are bytes for 4 and 8 bit arrays (two 4-bit elements per byte, even index in the low
//! nibble) and big-endian shorts for 16 bit arrays.

use crate::array::{ArrayKind, ArrayWidth, DenseArray, OcNode, OcTree, Shape, SparseArray, SparseLayer, TeraArray};
use crate::error::{ArrayError, Result};
use byteorder::{BigEndian, ByteOrder};
use std::marker::PhantomData;

/// Size of the length field plus the three dimensions.
const HEADER_BYTES: usize = 16;

const TAG_DEFLATED: u8 = 0;
const TAG_INFLATED: u8 = 1;

const TAG_LEAF: u8 = 0;
const TAG_BRANCH: u8 = 1;

/// Reads and writes the binary form of a single array kind.
pub trait SerializationHandler: Send + Sync {
	/// The kind of array this handler reads and writes.
	fn kind(&self) -> ArrayKind;

	/// Exact number of bytes `serialize` will append for the array.
	fn compute_minimum_buffer_size(&self, array: &TeraArray) -> Result<usize>;

	/// Appends the binary form of the array to the buffer.
	fn serialize(&self, array: &TeraArray, buffer: &mut Vec<u8>) -> Result<()>;

	/// Reads one array from the front of the buffer, advancing it past the consumed bytes.
	fn deserialize(&self, buffer: &mut &[u8]) -> Result<TeraArray>;

	fn can_handle(&self, array: &TeraArray) -> bool {
		array.kind() == self.kind()
	}
}

fn mismatch(expected: ArrayKind, array: &TeraArray) -> ArrayError {
	ArrayError::KindMismatch { expected: expected.name(), found: array.kind().name() }
}

// Reading

fn take<'a>(buffer: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
	if len > buffer.len() {
		return Err(ArrayError::TruncatedData { needed: len, remaining: buffer.len() });
	}

	let (taken, rest) = buffer.split_at(len);
	*buffer = rest;

	Ok(taken)
}

fn read_u8(buffer: &mut &[u8]) -> Result<u8> {
	Ok(take(buffer, 1)?[0])
}

fn read_i32(buffer: &mut &[u8]) -> Result<i32> {
	Ok(BigEndian::read_i32(take(buffer, 4)?))
}

/// Reads a non-negative 32-bit count.
fn read_count(buffer: &mut &[u8], what: &str) -> Result<usize> {
	let value = read_i32(buffer)?;

	if value < 0 {
		return Err(ArrayError::CorruptData(format!("negative {}: {}", what, value)));
	}

	Ok(value as usize)
}

/// Reads the length and shape header, returning the shape and the payload following it.
fn read_header<'a>(buffer: &mut &'a [u8]) -> Result<(Shape, &'a [u8])> {
	let length = read_count(buffer, "length")?;

	if length < HEADER_BYTES - 4 {
		return Err(ArrayError::CorruptData(format!("length {} is too short to hold the array dimensions", length)));
	}

	let mut body = take(buffer, length)?;

	let size_x = read_count(&mut body, "size_x")?;
	let size_y = read_count(&mut body, "size_y")?;
	let size_z = read_count(&mut body, "size_z")?;

	Ok((Shape::new(size_x, size_y, size_z)?, body))
}

fn expect_consumed(payload: &[u8]) -> Result<()> {
	if payload.is_empty() {
		Ok(())
	} else {
		Err(ArrayError::CorruptData(format!("{} trailing bytes after the array payload", payload.len())))
	}
}

fn read_units<W: ArrayWidth>(buffer: &mut &[u8], count: usize) -> Result<Vec<W::Unit>> {
	let bytes = count.checked_mul(W::UNIT_BYTES)
		.ok_or_else(|| ArrayError::CorruptData(format!("unit count {} overflows", count)))?;

	Ok(W::decode_units(take(buffer, bytes)?))
}

fn read_fill<W: ArrayWidth>(buffer: &mut &[u8]) -> Result<u16> {
	let unit = read_units::<W>(buffer, 1)?;

	Ok(W::get(&unit, 0))
}

// Writing

fn write_i32(buffer: &mut Vec<u8>, value: i32) {
	let mut bytes = [0; 4];
	BigEndian::write_i32(&mut bytes, value);

	buffer.extend_from_slice(&bytes);
}

/// Writes the header with a placeholder length, then the payload, then patches in the length.
fn write_framed<F>(buffer: &mut Vec<u8>, shape: Shape, payload: F) -> Result<()> where F: FnOnce(&mut Vec<u8>) -> Result<()> {
	let start = buffer.len();

	write_i32(buffer, 0);
	write_i32(buffer, shape.size_x() as i32);
	write_i32(buffer, shape.size_y() as i32);
	write_i32(buffer, shape.size_z() as i32);

	payload(buffer)?;

	let length = buffer.len() - start - 4;

	if length > i32::max_value() as usize {
		buffer.truncate(start);
		return Err(ArrayError::CorruptData(format!("serialized length {} does not fit in 32 bits", length)));
	}

	BigEndian::write_i32(&mut buffer[start..start + 4], length as i32);

	Ok(())
}

fn write_fill<W: ArrayWidth>(buffer: &mut Vec<u8>, value: u16) {
	W::encode_units(&[W::splat(value)], buffer);
}

/// Handles the dense array of one element width.
#[derive(Debug, Default)]
pub struct DenseHandler<W: ArrayWidth>(PhantomData<W>);

impl<W: ArrayWidth> DenseHandler<W> {
	pub fn new() -> Self {
		DenseHandler(PhantomData)
	}

	fn dense<'a>(&self, array: &'a TeraArray) -> Result<&'a DenseArray<W>> {
		W::as_dense(array).ok_or_else(|| mismatch(W::DENSE, array))
	}
}

impl<W: ArrayWidth> SerializationHandler for DenseHandler<W> {
	fn kind(&self) -> ArrayKind {
		W::DENSE
	}

	fn compute_minimum_buffer_size(&self, array: &TeraArray) -> Result<usize> {
		let dense = self.dense(array)?;

		Ok(HEADER_BYTES + 4 + dense.units().len() * W::UNIT_BYTES)
	}

	fn serialize(&self, array: &TeraArray, buffer: &mut Vec<u8>) -> Result<()> {
		let dense = self.dense(array)?;

		write_framed(buffer, dense.shape(), |buffer| {
			write_i32(buffer, dense.units().len() as i32);
			W::encode_units(dense.units(), buffer);

			Ok(())
		})
	}

	fn deserialize(&self, buffer: &mut &[u8]) -> Result<TeraArray> {
		let (shape, mut payload) = read_header(buffer)?;

		let count = read_count(&mut payload, "unit count")?;
		let expected = W::units(shape.size_xyz());

		if count != expected {
			return Err(ArrayError::CorruptData(format!("{} array of shape {:?} needs {} units, got {}", W::DENSE, shape, expected, count)));
		}

		let units = read_units::<W>(&mut payload, count)?;
		expect_consumed(payload)?;

		Ok(W::wrap_dense(DenseArray::from_units(shape, units)?))
	}
}

/// Handles the sparse array of one element width.
#[derive(Debug, Default)]
pub struct SparseHandler<W: ArrayWidth>(PhantomData<W>);

impl<W: ArrayWidth> SparseHandler<W> {
	pub fn new() -> Self {
		SparseHandler(PhantomData)
	}

	fn sparse<'a>(&self, array: &'a TeraArray) -> Result<&'a SparseArray<W>> {
		W::as_sparse(array).ok_or_else(|| mismatch(W::SPARSE, array))
	}
}

impl<W: ArrayWidth> SerializationHandler for SparseHandler<W> {
	fn kind(&self) -> ArrayKind {
		W::SPARSE
	}

	fn compute_minimum_buffer_size(&self, array: &TeraArray) -> Result<usize> {
		let sparse = self.sparse(array)?;
		let row_bytes = W::units(sparse.shape().size_xz()) * W::UNIT_BYTES;

		let payload = match sparse.layers() {
			None => 1 + W::UNIT_BYTES,
			Some(layers) => 1 + layers.iter().map(|layer| match layer {
				SparseLayer::Deflated(_) => 1 + W::UNIT_BYTES,
				SparseLayer::Inflated(_) => 1 + row_bytes
			}).sum::<usize>()
		};

		Ok(HEADER_BYTES + payload)
	}

	fn serialize(&self, array: &TeraArray, buffer: &mut Vec<u8>) -> Result<()> {
		let sparse = self.sparse(array)?;

		write_framed(buffer, sparse.shape(), |buffer| {
			match sparse.layers() {
				None => {
					buffer.push(TAG_DEFLATED);
					write_fill::<W>(buffer, sparse.fill_value());
				},
				Some(layers) => {
					buffer.push(TAG_INFLATED);

					for layer in layers {
						match layer {
							SparseLayer::Deflated(value) => {
								buffer.push(TAG_DEFLATED);
								write_fill::<W>(buffer, *value);
							},
							SparseLayer::Inflated(row) => {
								buffer.push(TAG_INFLATED);
								W::encode_units(row, buffer);
							}
						}
					}
				}
			}

			Ok(())
		})
	}

	fn deserialize(&self, buffer: &mut &[u8]) -> Result<TeraArray> {
		let (shape, mut payload) = read_header(buffer)?;

		let array = match read_u8(&mut payload)? {
			TAG_DEFLATED => SparseArray::filled(shape, read_fill::<W>(&mut payload)?)?,
			TAG_INFLATED => {
				let row_units = W::units(shape.size_xz());

				// every layer takes at least a tag and a fill unit, so the header cannot claim more
				// layers than the payload holds
				let needed = shape.size_y().saturating_mul(1 + W::UNIT_BYTES);

				if needed > payload.len() {
					return Err(ArrayError::TruncatedData { needed, remaining: payload.len() });
				}

				let mut layers = Vec::with_capacity(shape.size_y());

				for y in 0..shape.size_y() {
					layers.push(match read_u8(&mut payload)? {
						TAG_DEFLATED => SparseLayer::Deflated(read_fill::<W>(&mut payload)?),
						TAG_INFLATED => SparseLayer::Inflated(read_units::<W>(&mut payload, row_units)?.into_boxed_slice()),
						tag => return Err(ArrayError::CorruptData(format!("unknown tag {} for sparse layer {}", tag, y)))
					});
				}

				SparseArray::from_layers(shape, layers)?
			},
			tag => return Err(ArrayError::CorruptData(format!("unknown sparse array tag {}", tag)))
		};

		expect_consumed(payload)?;

		Ok(W::wrap_sparse(array))
	}
}

/// Handles octrees.
#[derive(Debug, Default)]
pub struct OcTreeHandler;

impl OcTreeHandler {
	fn octree<'a>(&self, array: &'a TeraArray) -> Result<&'a OcTree> {
		match array {
			TeraArray::OcTree(octree) => Ok(octree),
			_ => Err(mismatch(ArrayKind::OcTree, array))
		}
	}

	fn write_node(node: &OcNode, buffer: &mut Vec<u8>) {
		match node {
			OcNode::Leaf(value) => {
				buffer.push(TAG_LEAF);
				buffer.push(*value);
			},
			OcNode::Branch(children) => {
				buffer.push(TAG_BRANCH);

				for child in children.iter() {
					OcTreeHandler::write_node(child, buffer);
				}
			}
		}
	}

	fn read_node(buffer: &mut &[u8], size: usize) -> Result<OcNode> {
		match read_u8(buffer)? {
			TAG_LEAF => Ok(OcNode::Leaf(read_u8(buffer)?)),
			TAG_BRANCH if size > 1 => {
				let mut children = OcNode::uniform_children(0);

				for child in children.iter_mut() {
					*child = OcTreeHandler::read_node(buffer, size / 2)?;
				}

				Ok(OcNode::Branch(children))
			},
			TAG_BRANCH => Err(ArrayError::CorruptData("octree branch below single cell size".to_string())),
			tag => Err(ArrayError::CorruptData(format!("unknown octree node tag {}", tag)))
		}
	}
}

impl SerializationHandler for OcTreeHandler {
	fn kind(&self) -> ArrayKind {
		ArrayKind::OcTree
	}

	fn compute_minimum_buffer_size(&self, array: &TeraArray) -> Result<usize> {
		let octree = self.octree(array)?;

		// n nodes hold (n - 1) / 8 branches. Every node has a tag byte, and leaves a value byte.
		let nodes = octree.node_count();
		let branches = (nodes - 1) / 8;
		let leaves = nodes - branches;

		Ok(HEADER_BYTES + nodes + leaves)
	}

	fn serialize(&self, array: &TeraArray, buffer: &mut Vec<u8>) -> Result<()> {
		let octree = self.octree(array)?;

		write_framed(buffer, octree.shape(), |buffer| {
			OcTreeHandler::write_node(octree.root(), buffer);

			Ok(())
		})
	}

	fn deserialize(&self, buffer: &mut &[u8]) -> Result<TeraArray> {
		let (shape, mut payload) = read_header(buffer)?;

		let extent = OcTree::new(shape).extent();
		let root = OcTreeHandler::read_node(&mut payload, extent)?;

		expect_consumed(payload)?;

		Ok(TeraArray::OcTree(OcTree::from_root(shape, root)?))
	}
}
