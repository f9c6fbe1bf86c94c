use crate::array::{ArrayWidth, DenseArray, OcTree, SparseArray, TeraArray};
use log::trace;

/// Converts arrays into alternate, usually more compact, representations. Each array variant
/// dispatches to the method for its representation.
pub trait Deflator {
	fn deflate_dense<W: ArrayWidth>(&self, array: &DenseArray<W>) -> TeraArray;
	fn deflate_sparse<W: ArrayWidth>(&self, array: &SparseArray<W>) -> TeraArray;
	fn deflate_octree(&self, array: &OcTree) -> TeraArray;
}

/// Picks whichever of the dense and sparse forms is estimated to use less memory.
#[derive(Debug, Default, Copy, Clone)]
pub struct StandardDeflator;

impl Deflator for StandardDeflator {
	fn deflate_dense<W: ArrayWidth>(&self, array: &DenseArray<W>) -> TeraArray {
		let sparse = match SparseArray::from_dense(array) {
			Some(sparse) => sparse,
			None => return W::wrap_dense(array.clone())
		};

		let dense_size = array.estimated_memory_consumption_in_bytes();
		let sparse_size = sparse.estimated_memory_consumption_in_bytes();

		trace!("deflating {:?}: dense {} bytes, sparse {} bytes", W::DENSE, dense_size, sparse_size);

		if sparse_size < dense_size {
			W::wrap_sparse(sparse)
		} else {
			W::wrap_dense(array.clone())
		}
	}

	fn deflate_sparse<W: ArrayWidth>(&self, array: &SparseArray<W>) -> TeraArray {
		W::wrap_sparse(array.compacted())
	}

	fn deflate_octree(&self, array: &OcTree) -> TeraArray {
		TeraArray::OcTree(array.rebuilt())
	}
}
