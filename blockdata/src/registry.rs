use crate::array::{ArrayKind, Byte, Nibble, Shape, Short, TeraArray};
use crate::error::{ArrayError, Result};
use crate::serialize::{DenseHandler, OcTreeHandler, SerializationHandler, SparseHandler};
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Creates arrays of a registered kind.
pub trait Factory: Send + Sync {
	fn create(&self, shape: Shape) -> Result<TeraArray>;
}

impl Factory for ArrayKind {
	fn create(&self, shape: Shape) -> Result<TeraArray> {
		ArrayKind::create(*self, shape)
	}
}

impl<F> Factory for F where F: Fn(Shape) -> Result<TeraArray> + Send + Sync {
	fn create(&self, shape: Shape) -> Result<TeraArray> {
		self(shape)
	}
}

/// The serialized form of an array, tagged with the name of the kind that wrote it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct EncodedArray {
	pub kind: String,
	pub data: Vec<u8>
}

struct Registration {
	factory: Box<dyn Factory>,
	handler: Box<dyn SerializationHandler>
}

/// Maps kind names to the factory and serialization handler of each array kind.
pub struct ArrayRegistry {
	kinds: FxHashMap<String, Registration>
}

impl ArrayRegistry {
	/// Creates a registry without any kinds.
	pub fn empty() -> Self {
		ArrayRegistry { kinds: FxHashMap::default() }
	}

	/// Creates a registry holding the built-in kinds.
	pub fn new() -> Self {
		let mut registry = ArrayRegistry::empty();

		registry.register_builtin(ArrayKind::Dense4, DenseHandler::<Nibble>::new());
		registry.register_builtin(ArrayKind::Dense8, DenseHandler::<Byte>::new());
		registry.register_builtin(ArrayKind::Dense16, DenseHandler::<Short>::new());
		registry.register_builtin(ArrayKind::Sparse4, SparseHandler::<Nibble>::new());
		registry.register_builtin(ArrayKind::Sparse8, SparseHandler::<Byte>::new());
		registry.register_builtin(ArrayKind::Sparse16, SparseHandler::<Short>::new());
		registry.register_builtin(ArrayKind::OcTree, OcTreeHandler);

		registry
	}

	fn register_builtin<H>(&mut self, kind: ArrayKind, handler: H) where H: SerializationHandler + 'static {
		self.register(kind.name(), kind, handler);
	}

	/// Registers a kind under a name, replacing any previous registration with that name.
	/// Returns true if a registration was replaced.
	pub fn register<N, F, H>(&mut self, name: N, factory: F, handler: H) -> bool
		where N: Into<String>, F: Factory + 'static, H: SerializationHandler + 'static {

		let name = name.into();
		debug!("registering array kind {} (stored as {})", name, handler.kind());

		self.kinds.insert(name, Registration { factory: Box::new(factory), handler: Box::new(handler) }).is_some()
	}

	pub fn contains(&self, kind: &str) -> bool {
		self.kinds.contains_key(kind)
	}

	pub fn kinds(&self) -> impl Iterator<Item = &str> {
		self.kinds.keys().map(|name| name.as_str())
	}

	fn lookup(&self, kind: &str) -> Result<&Registration> {
		self.kinds.get(kind).ok_or_else(|| ArrayError::UnknownKind(kind.to_string()))
	}

	pub fn handler(&self, kind: &str) -> Result<&dyn SerializationHandler> {
		Ok(&*self.lookup(kind)?.handler)
	}

	pub fn create(&self, kind: &str, shape: Shape) -> Result<TeraArray> {
		self.lookup(kind)?.factory.create(shape)
	}

	/// Encodes the array with the handler registered for its own kind.
	pub fn encode(&self, array: &TeraArray) -> Result<EncodedArray> {
		self.encode_as(array.kind().name(), array)
	}

	/// Encodes the array with the handler registered under the given name.
	pub fn encode_as(&self, kind: &str, array: &TeraArray) -> Result<EncodedArray> {
		let handler = self.handler(kind)?;

		let mut data = Vec::with_capacity(handler.compute_minimum_buffer_size(array)?);
		handler.serialize(array, &mut data)?;

		Ok(EncodedArray { kind: kind.to_string(), data })
	}

	pub fn decode(&self, encoded: &EncodedArray) -> Result<TeraArray> {
		let handler = self.handler(&encoded.kind)?;

		let mut data = &encoded.data[..];
		let array = handler.deserialize(&mut data)?;

		if !data.is_empty() {
			return Err(ArrayError::CorruptData(format!("{} trailing bytes after encoded {} array", data.len(), encoded.kind)));
		}

		Ok(array)
	}
}

impl Default for ArrayRegistry {
	fn default() -> Self {
		ArrayRegistry::new()
	}
}
