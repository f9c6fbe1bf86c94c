use crate::array::Shape;
use crate::error::{ArrayError, Result};
use std::mem;

/// A node of an octree. Children of a branch are ordered by octant, with bit 0 selecting the
/// upper X half, bit 1 the upper Y half and bit 2 the upper Z half.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OcNode {
	Leaf(u8),
	Branch(Box<[OcNode; 8]>)
}

impl OcNode {
	pub(crate) fn uniform_children(value: u8) -> Box<[OcNode; 8]> {
		let leaf = OcNode::Leaf(value);

		Box::new([
			leaf.clone(), leaf.clone(), leaf.clone(), leaf.clone(),
			leaf.clone(), leaf.clone(), leaf.clone(), leaf
		])
	}

	/// Returns the value of the node if every child is a leaf holding the same value.
	fn uniform_value(children: &[OcNode; 8]) -> Option<u8> {
		let first = match children[0] {
			OcNode::Leaf(value) => value,
			OcNode::Branch(_) => return None
		};

		if children.iter().all(|child| *child == OcNode::Leaf(first)) {
			Some(first)
		} else {
			None
		}
	}

	fn node_count(&self) -> usize {
		match self {
			OcNode::Leaf(_) => 1,
			OcNode::Branch(children) => 1 + children.iter().map(OcNode::node_count).sum::<usize>()
		}
	}

	fn depth(&self) -> u32 {
		match self {
			OcNode::Leaf(_) => 0,
			OcNode::Branch(children) => 1 + children.iter().map(OcNode::depth).max().unwrap_or(0)
		}
	}

	fn collapsed(&self) -> OcNode {
		match self {
			OcNode::Leaf(value) => OcNode::Leaf(*value),
			OcNode::Branch(children) => {
				let mut rebuilt = OcNode::uniform_children(0);

				for (slot, child) in rebuilt.iter_mut().zip(children.iter()) {
					*slot = child.collapsed();
				}

				match OcNode::uniform_value(&rebuilt) {
					Some(value) => OcNode::Leaf(value),
					None => OcNode::Branch(rebuilt)
				}
			}
		}
	}
}

fn octant(x: usize, y: usize, z: usize, half: usize) -> (usize, usize, usize, usize) {
	let index = (x >= half) as usize | ((y >= half) as usize) << 1 | ((z >= half) as usize) << 2;

	(index, x % half, y % half, z % half)
}

/// An 8-bit array stored as a recursive subdivision of the power-of-two cube that covers its
/// shape. Uniform subtrees are kept collapsed into a single leaf.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OcTree {
	shape: Shape,
	extent: usize,
	root: OcNode
}

impl OcTree {
	pub fn new(shape: Shape) -> Self {
		OcTree::filled(shape, 0)
	}

	pub fn filled(shape: Shape, value: u16) -> Self {
		OcTree { shape, extent: OcTree::extent_of(shape), root: OcNode::Leaf(value as u8) }
	}

	/// Creates an octree from an existing node hierarchy, checking that it is not deeper than
	/// the covering cube allows.
	pub fn from_root(shape: Shape, root: OcNode) -> Result<Self> {
		let extent = OcTree::extent_of(shape);

		if 1usize << root.depth() > extent {
			return Err(ArrayError::CorruptData(format!("octree of depth {} exceeds its cube of extent {}", root.depth(), extent)));
		}

		Ok(OcTree { shape, extent, root })
	}

	fn extent_of(shape: Shape) -> usize {
		shape.size_x().max(shape.size_y()).max(shape.size_z()).next_power_of_two()
	}

	pub fn shape(&self) -> Shape {
		self.shape
	}

	/// Edge length of the covering cube.
	pub fn extent(&self) -> usize {
		self.extent
	}

	pub fn root(&self) -> &OcNode {
		&self.root
	}

	pub fn node_count(&self) -> usize {
		self.root.node_count()
	}

	pub fn get(&self, x: usize, y: usize, z: usize) -> Result<u16> {
		self.shape.check(x, y, z)?;

		let (mut x, mut y, mut z) = (x, y, z);
		let mut size = self.extent;
		let mut node = &self.root;

		loop {
			match node {
				OcNode::Leaf(value) => return Ok(*value as u16),
				OcNode::Branch(children) => {
					size /= 2;

					let (index, cx, cy, cz) = octant(x, y, z, size);

					node = &children[index];
					x = cx;
					y = cy;
					z = cz;
				}
			}
		}
	}

	pub fn set(&mut self, x: usize, y: usize, z: usize, value: u16) -> Result<u16> {
		self.shape.check(x, y, z)?;

		Ok(OcTree::set_in(&mut self.root, self.extent, x, y, z, value as u8) as u16)
	}

	fn set_in(node: &mut OcNode, size: usize, x: usize, y: usize, z: usize, value: u8) -> u8 {
		if let OcNode::Leaf(old) = *node {
			if old == value {
				return old;
			}

			if size == 1 {
				*node = OcNode::Leaf(value);
				return old;
			}

			*node = OcNode::Branch(OcNode::uniform_children(old));
		}

		let half = size / 2;
		let (index, cx, cy, cz) = octant(x, y, z, half);

		let (old, merged) = match *node {
			OcNode::Branch(ref mut children) => {
				let old = OcTree::set_in(&mut children[index], half, cx, cy, cz, value);

				(old, OcNode::uniform_value(children))
			},
			OcNode::Leaf(old) => (old, None)
		};

		if let Some(value) = merged {
			*node = OcNode::Leaf(value);
		}

		old
	}

	pub fn fill(&mut self, value: u16) {
		self.root = OcNode::Leaf(value as u8);
	}

	/// Rebuilds the tree with every uniform subtree collapsed.
	pub fn rebuilt(&self) -> Self {
		OcTree { shape: self.shape, extent: self.extent, root: self.root.collapsed() }
	}

	pub fn estimated_memory_consumption_in_bytes(&self) -> usize {
		mem::size_of::<Self>() + self.node_count() * mem::size_of::<OcNode>()
	}
}
