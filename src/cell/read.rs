/* src/cell/read.rs */

use std::sync::Arc;
use std::sync::atomic::Ordering;

use super::{ObservableCell, lock};

impl<E> ObservableCell<E>
where
	E: Send + Sync + 'static,
{
	/// Returns a clone of the current value.
	///
	/// Waits while a `set` on another thread is fanning out, then returns
	/// that write's value. Readers never block each other.
	pub fn get(&self) -> E
	where
		E: Clone,
	{
		E::clone(&self.load())
	}

	/// Returns the current value without cloning it.
	pub fn load(&self) -> Arc<E> {
		let _read = self.read_access();
		self.current.load_full()
	}

	/// Returns the committed values in the order they were set, oldest first.
	///
	/// The construction value is not part of the history. With
	/// [`Retention::Bounded`](crate::Retention::Bounded) only the newest
	/// values are kept.
	pub fn history(&self) -> Vec<Arc<E>> {
		let _read = self.read_access();
		lock(&self.history).iter().cloned().collect()
	}

	/// Number of committed writes.
	pub fn version(&self) -> u64 {
		let _read = self.read_access();
		self.version.load(Ordering::Acquire)
	}

	/// Number of subscribers that are still alive and active.
	pub fn subscriber_count(&self) -> usize {
		self.subscribers
			.load()
			.iter()
			.filter_map(|weak| weak.upgrade())
			.filter(|observer| observer.is_active())
			.count()
	}

	/// Returns true if a transform is installed.
	pub fn is_mapped(&self) -> bool {
		self.transform.load().is_some()
	}
}
