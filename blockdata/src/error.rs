use thiserror::Error;

/// Failures reported by array construction, access and (de)serialization.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ArrayError {
	#[error("index ({x}, {y}, {z}) out of range for array of size {size_x}x{size_y}x{size_z}")]
	IndexOutOfRange {
		x: usize,
		y: usize,
		z: usize,
		size_x: usize,
		size_y: usize,
		size_z: usize
	},
	#[error("invalid array shape {size_x}x{size_y}x{size_z}: {reason}")]
	InvalidShape {
		size_x: usize,
		size_y: usize,
		size_z: usize,
		reason: &'static str
	},
	#[error("truncated data: needed {needed} bytes but only {remaining} remain")]
	TruncatedData { needed: usize, remaining: usize },
	#[error("corrupt data: {0}")]
	CorruptData(String),
	#[error("array kind mismatch: handler for {expected} was given {found}")]
	KindMismatch { expected: &'static str, found: &'static str },
	#[error("unknown array kind {0:?}")]
	UnknownKind(String),
	#[error("unsupported element size of {0} bits")]
	UnsupportedElementSize(u8)
}

pub type Result<T> = ::std::result::Result<T, ArrayError>;
