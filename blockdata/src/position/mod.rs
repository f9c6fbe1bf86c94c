mod side;
mod region;

/// Global positioning in world and chunk coordinates.
///
/// The world is a single chunk tall: blocks span `0..Chunk::SIZE_Y` vertically and chunks are
/// addressed by their X and Z components only.
mod global;

pub use self::side::{Side, SideSet};
pub use self::region::Region3i;
pub use self::global::{BlockPos, ChunkPos};
