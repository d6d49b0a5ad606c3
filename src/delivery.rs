/* src/delivery.rs */

use std::ops::AddAssign;

/// Result of a fan-out pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
	/// Subscribers whose callback ran to completion.
	pub delivered: usize,
	/// Entries whose handle was dropped, or whose subscription already ended.
	pub skipped: usize,
	/// Subscribers whose callback panicked during this pass.
	pub failed: usize,
	/// Values queued by a reentrant `set` and delivered after the pass
	/// that queued them.
	pub deferred: usize,
}

impl Delivery {
	pub(crate) fn deferred() -> Self {
		Self {
			deferred: 1,
			..Self::default()
		}
	}

	/// Total number of subscriber entries visited.
	pub fn visited(&self) -> usize {
		self.delivered + self.skipped + self.failed
	}
}

impl AddAssign for Delivery {
	fn add_assign(&mut self, rhs: Self) {
		self.delivered += rhs.delivered;
		self.skipped += rhs.skipped;
		self.failed += rhs.failed;
		self.deferred += rhs.deferred;
	}
}
