use crate::util::MAX_LIGHT;
use rustc_hash::FxHashSet;
use std::mem;
use tera_blockdata::BlockPos;

/// Positions bucketed by light level. Buckets are handed out brightest first, and each bucket
/// holds a position at most once.
#[derive(Debug)]
pub struct LevelQueue {
	buckets: Vec<FxHashSet<BlockPos>>
}

impl LevelQueue {
	pub fn new() -> Self {
		LevelQueue {
			buckets: (0..MAX_LIGHT).map(|_| FxHashSet::default()).collect()
		}
	}

	/// Queues a position at a level between 1 and 15. Level 0 is ignored.
	pub fn push(&mut self, position: BlockPos, level: u8) {
		if level == 0 {
			return;
		}

		let index = (MAX_LIGHT - level.min(MAX_LIGHT)) as usize;

		self.buckets[index].insert(position);
	}

	/// Takes every position of the brightest non-empty bucket. Positions queued while handling the
	/// batch at the same level are returned by the next call.
	pub fn next_batch(&mut self) -> Option<(u8, FxHashSet<BlockPos>)> {
		let index = self.buckets.iter().position(|bucket| !bucket.is_empty())?;

		let mut batch = FxHashSet::default();
		mem::swap(&mut batch, &mut self.buckets[index]);

		Some((MAX_LIGHT - index as u8, batch))
	}

	pub fn len(&self) -> usize {
		self.buckets.iter().map(FxHashSet::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.buckets.iter().all(FxHashSet::is_empty)
	}

	pub fn clear(&mut self) {
		for bucket in &mut self.buckets {
			bucket.clear();
		}
	}
}

impl Default for LevelQueue {
	fn default() -> Self {
		LevelQueue::new()
	}
}
