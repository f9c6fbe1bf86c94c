use crate::array::{Shape, TeraArray};
use crate::error::Result;
use spin::{RwLock, RwLockReadGuard, RwLockWriteGuard};

// TODO: Writers spin while a reader holds the lock. Per-layer locks would let writers to
// different layers of the same array proceed in parallel.

/// An array shared between threads. Compare-and-set is atomic with respect to every other
/// writer going through the same `SharedArray`.
///
/// Exclusive access through `&mut self` bypasses the lock entirely.
#[derive(Debug)]
pub struct SharedArray {
	array: RwLock<TeraArray>
}

impl SharedArray {
	pub fn new(array: TeraArray) -> Self {
		SharedArray { array: RwLock::new(array) }
	}

	pub fn shape(&self) -> Shape {
		self.array.read().shape()
	}

	pub fn get(&self, x: usize, y: usize, z: usize) -> Result<u16> {
		self.array.read().get(x, y, z)
	}

	pub fn set(&self, x: usize, y: usize, z: usize, value: u16) -> Result<u16> {
		self.array.write().set(x, y, z, value)
	}

	pub fn compare_and_set(&self, x: usize, y: usize, z: usize, value: u16, expected: u16) -> Result<bool> {
		self.array.write().compare_and_set(x, y, z, value, expected)
	}

	/// Locks the array for reading. Holding the guard blocks every writer.
	pub fn read(&self) -> RwLockReadGuard<TeraArray> {
		self.array.read()
	}

	/// Locks the array for a batch of writes.
	pub fn write(&self) -> RwLockWriteGuard<TeraArray> {
		self.array.write()
	}

	pub fn get_mut(&mut self) -> &mut TeraArray {
		self.array.get_mut()
	}

	/// Swaps in a new array, returning the previous one.
	pub fn replace(&mut self, array: TeraArray) -> TeraArray {
		::std::mem::replace(self.array.get_mut(), array)
	}

	pub fn into_inner(self) -> TeraArray {
		self.array.into_inner()
	}
}

impl Clone for SharedArray {
	fn clone(&self) -> Self {
		SharedArray::new(self.array.read().copy())
	}
}

impl From<TeraArray> for SharedArray {
	fn from(array: TeraArray) -> Self {
		SharedArray::new(array)
	}
}
