/* src/cell/write.rs */

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::super::subscription::Outcome;
use super::super::{Delivery, Retention};
use super::{ObservableCell, lock, thread_token, write_gate};

/// Marks the calling thread as the writer for the critical section.
///
/// On exit, including unwind, the token is released and values still queued
/// by reentrant writes are discarded, so they never outlive the `set` that
/// queued them.
struct WriterToken<'a, E> {
	writer: &'a AtomicU64,
	deferred: &'a Mutex<VecDeque<Arc<E>>>,
}

impl<'a, E> WriterToken<'a, E> {
	fn acquire(writer: &'a AtomicU64, deferred: &'a Mutex<VecDeque<Arc<E>>>) -> Self {
		writer.store(thread_token(), Ordering::Release);
		Self { writer, deferred }
	}
}

impl<E> Drop for WriterToken<'_, E> {
	fn drop(&mut self) {
		lock(self.deferred).clear();
		self.writer.store(0, Ordering::Release);
	}
}

impl<E> ObservableCell<E>
where
	E: Send + Sync + 'static,
{
	/// Sets a new value and notifies every live subscriber.
	///
	/// The value replaces the current one and is appended to the history.
	/// The installed transform, if any, then runs once and its result is
	/// delivered as `Event::Next` to each subscriber in registration order.
	/// Stored values are never transformed.
	///
	/// Writers are mutually exclusive. Readers on other threads wait until
	/// the fan-out has finished; a synchronous callback reading the cell
	/// sees the new value.
	///
	/// # Reentrancy
	///
	/// Calling `set` from inside a synchronous callback of this cell queues
	/// the value and returns immediately with `deferred == 1`. Queued values
	/// are delivered, in order, after the pass that queued them, and are
	/// included in the outer call's report.
	///
	/// # Panics
	///
	/// Panics raised by subscriber callbacks are caught. A panic in the
	/// transform propagates to the caller before the value is stored, and
	/// discards values queued by reentrant writes.
	pub fn set(&self, value: E) -> Delivery {
		let value = Arc::new(value);

		if self.is_reentrant() {
			lock(&self.deferred).push_back(value);
			#[cfg(feature = "logging")]
			log::trace!("{}: reentrant write deferred", self.config.label());
			return Delivery::deferred();
		}

		let _write = write_gate(&self.gate);
		let _token = WriterToken::acquire(&self.writer, &self.deferred);

		let mut delivery = self.commit(value);
		loop {
			let next = lock(&self.deferred).pop_front();
			let Some(value) = next else {
				break;
			};
			delivery += self.commit(value);
			delivery.deferred += 1;
		}
		delivery
	}

	/// Stores one value, then fans it out. Caller holds the gate exclusively.
	fn commit(&self, value: Arc<E>) -> Delivery {
		let delivered = match self.transform.load_full() {
			Some(transform) => Arc::new((transform.0)(&*value)),
			None => Arc::clone(&value),
		};

		{
			let mut history = lock(&self.history);
			history.push_back(Arc::clone(&value));
			if let Retention::Bounded(limit) = self.config.retention {
				while history.len() > limit {
					history.pop_front();
				}
			}
			self.current.store(value);
			self.version.fetch_add(1, Ordering::AcqRel);
		}

		self.fan_out(&delivered)
	}

	fn fan_out(&self, value: &Arc<E>) -> Delivery {
		let subscribers = self.subscribers.load_full();
		let mut delivery = Delivery::default();

		for weak in subscribers.iter() {
			let Some(observer) = weak.upgrade() else {
				delivery.skipped += 1;
				continue;
			};
			match observer.next(value) {
				Outcome::Delivered => delivery.delivered += 1,
				Outcome::Skipped => delivery.skipped += 1,
				Outcome::Failed(error) => {
					delivery.failed += 1;
					#[cfg(feature = "logging")]
					log::warn!("{}: {}", self.config.label(), error);
					#[cfg(not(feature = "logging"))]
					let _ = error;
				}
			}
		}

		if let Some(threshold) = self.config.prune_threshold
			&& delivery.skipped >= threshold
		{
			self.prune();
		}

		delivery
	}

	/// Drops stale and terminated entries, keeping live ones in order.
	fn prune(&self) {
		let mut removed = 0usize;
		self.subscribers.rcu(|current| {
			let kept: Vec<_> = current
				.iter()
				.filter(|weak| weak.upgrade().is_some_and(|observer| observer.is_active()))
				.cloned()
				.collect();
			removed = current.len() - kept.len();
			kept
		});

		#[cfg(feature = "logging")]
		log::debug!(
			"{}: pruned {} stale subscriber entries",
			self.config.label(),
			removed
		);

		#[cfg(not(feature = "logging"))]
		{
			let _ = removed;
		}
	}
}
