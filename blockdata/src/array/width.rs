use byteorder::{BigEndian, ByteOrder};
use std::fmt::Debug;

/// Element width of a linear array, along with how elements are packed into backing units.
pub trait Width: Copy + Clone + Debug + Default + Eq + Send + Sync + 'static {
	/// Size of a single element in bits.
	const BITS: u8;
	/// Size of a single backing unit on the wire.
	const UNIT_BYTES: usize;

	type Unit: Copy + Clone + Debug + Default + Eq + Send + Sync + 'static;

	/// Number of backing units needed to hold `len` elements.
	fn units(len: usize) -> usize;

	fn get(units: &[Self::Unit], index: usize) -> u16;

	/// Stores the value, which must already be masked to the element width.
	fn set(units: &mut [Self::Unit], index: usize, value: u16);

	/// A unit holding `value` in every element slot.
	fn splat(value: u16) -> Self::Unit;

	fn encode_units(units: &[Self::Unit], out: &mut Vec<u8>);

	/// Decodes units from a byte slice whose length is a multiple of `UNIT_BYTES`.
	fn decode_units(bytes: &[u8]) -> Vec<Self::Unit>;

	/// Truncates a value to the element width.
	fn mask(value: u16) -> u16 {
		(((1u32 << Self::BITS) - 1) as u16) & value
	}
}

/// Returns the index into a nibble array. Returns in the form (index, shift).
fn nibble_index(index: usize) -> (usize, u8) {
	(index >> 1, ((index & 1) as u8) << 2)
}

/// 4-bit elements, two per byte. The even element is stored in the low nibble.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Nibble;

impl Width for Nibble {
	const BITS: u8 = 4;
	const UNIT_BYTES: usize = 1;

	type Unit = u8;

	fn units(len: usize) -> usize {
		(len + 1) / 2
	}

	fn get(units: &[u8], index: usize) -> u16 {
		let (index, shift) = nibble_index(index);

		((units[index] >> shift) & 0xF) as u16
	}

	fn set(units: &mut [u8], index: usize, value: u16) {
		let (index, shift) = nibble_index(index);

		let cleared = !((!units[index]) | (0xF << shift));

		units[index] = cleared | (((value & 0xF) as u8) << shift);
	}

	fn splat(value: u16) -> u8 {
		let value = (value & 0xF) as u8;

		(value << 4) | value
	}

	fn encode_units(units: &[u8], out: &mut Vec<u8>) {
		out.extend_from_slice(units);
	}

	fn decode_units(bytes: &[u8]) -> Vec<u8> {
		bytes.to_vec()
	}
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Byte;

impl Width for Byte {
	const BITS: u8 = 8;
	const UNIT_BYTES: usize = 1;

	type Unit = u8;

	fn units(len: usize) -> usize {
		len
	}

	fn get(units: &[u8], index: usize) -> u16 {
		units[index] as u16
	}

	fn set(units: &mut [u8], index: usize, value: u16) {
		units[index] = value as u8;
	}

	fn splat(value: u16) -> u8 {
		value as u8
	}

	fn encode_units(units: &[u8], out: &mut Vec<u8>) {
		out.extend_from_slice(units);
	}

	fn decode_units(bytes: &[u8]) -> Vec<u8> {
		bytes.to_vec()
	}
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Short;

impl Width for Short {
	const BITS: u8 = 16;
	const UNIT_BYTES: usize = 2;

	type Unit = u16;

	fn units(len: usize) -> usize {
		len
	}

	fn get(units: &[u16], index: usize) -> u16 {
		units[index]
	}

	fn set(units: &mut [u16], index: usize, value: u16) {
		units[index] = value;
	}

	fn splat(value: u16) -> u16 {
		value
	}

	fn encode_units(units: &[u16], out: &mut Vec<u8>) {
		let start = out.len();
		out.resize(start + units.len() * 2, 0);

		BigEndian::write_u16_into(units, &mut out[start..]);
	}

	fn decode_units(bytes: &[u8]) -> Vec<u16> {
		let mut units = vec![0; bytes.len() / 2];

		BigEndian::read_u16_into(bytes, &mut units);

		units
	}
}
