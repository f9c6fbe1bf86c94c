#![forbid(unsafe_code)]

//! # `tera-blockdata`: chunked voxel block data
//!
//! Storage for the per-block data of a voxel world. Every chunk holds its block ids, its two
//! light channels and any extra per-block data in 3D arrays of small fixed-width integers.
//!
//! # Arrays
//!
//! Most of a chunk is usually uniform: the sky is empty, the deep underground is stone, and
//! light levels change slowly. So, arrays come in several representations behind one interface:
//!
//!  * Dense arrays, holding every element in a buffer sized exactly to the element count.
//!  * Sparse arrays, which only allocate the Y layers that hold more than one value.
//!  * Octrees, subdividing space until every region is uniform.
//!
//! A `Deflator` moves an array into a more compact representation, and the `ArrayRegistry`
//! creates and (de)serializes arrays by kind name.
//!
//! # World
//!
//! Chunks are 16x256x16 columns addressed by `ChunkPos`, and the `World` holds the loaded chunks
//! along with the `BlockManager` describing the lighting properties of every block type.

pub mod error;
pub mod position;

/// Fixed-width 3D arrays and their representations.
pub mod array;

/// Binary format of every built-in array kind.
pub mod serialize;

pub mod registry;
pub mod block;
pub mod chunk;
pub mod world;
pub mod config;

pub use array::{ArrayKind, Shape, SharedArray, TeraArray};
pub use block::{Block, BlockId, BlockManager};
pub use chunk::{Chunk, LightChannel};
pub use config::{ChunkConfig, ConfigError};
pub use error::{ArrayError, Result};
pub use position::{BlockPos, ChunkPos, Region3i, Side, SideSet};
pub use registry::ArrayRegistry;
pub use world::World;
