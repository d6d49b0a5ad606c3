/* src/subscription.rs */

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use super::{CellError, Event};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

const ACTIVE: u8 = 0;
const COMPLETED: u8 = 1;
const FAILED: u8 = 2;

/// Lifecycle state of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionStatus {
	/// Receiving events.
	Active,
	/// The cell was dropped and `Event::Completed` was delivered.
	Completed,
	/// The callback panicked and `Event::Error` was delivered.
	Failed,
}

pub(crate) type Callback<E> = Box<dyn Fn(Event<E>) + Send + Sync>;

/// Outcome of handing one event to one observer.
pub(crate) enum Outcome {
	Delivered,
	Skipped,
	Failed(CellError),
}

/// Owner of a subscriber callback. Only `SubscriptionHandle` holds it strongly;
/// the cell keeps a `Weak`.
pub(crate) struct Observer<E> {
	id: u64,
	status: AtomicU8,
	on_event: Callback<E>,
}

impl<E> Observer<E> {
	pub(crate) fn new(on_event: Callback<E>) -> Self {
		Self {
			id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
			status: AtomicU8::new(ACTIVE),
			on_event,
		}
	}

	pub(crate) fn is_active(&self) -> bool {
		self.status.load(Ordering::Acquire) == ACTIVE
	}

	/// Delivers `Event::Next`. A panic terminates the subscription and is
	/// reported to the observer once as `Event::Error`.
	pub(crate) fn next(&self, value: &Arc<E>) -> Outcome {
		if !self.is_active() {
			return Outcome::Skipped;
		}

		let event = Event::Next(Arc::clone(value));
		match panic::catch_unwind(AssertUnwindSafe(|| (self.on_event)(event))) {
			Ok(()) => Outcome::Delivered,
			Err(payload) => Outcome::Failed(self.fail(payload)),
		}
	}

	/// Delivers `Event::Completed` unless the subscription already ended.
	pub(crate) fn complete(&self) -> bool {
		if self
			.status
			.compare_exchange(ACTIVE, COMPLETED, Ordering::AcqRel, Ordering::Acquire)
			.is_err()
		{
			return false;
		}
		let _ = panic::catch_unwind(AssertUnwindSafe(|| (self.on_event)(Event::Completed)));
		true
	}

	fn fail(&self, payload: Box<dyn Any + Send>) -> CellError {
		self.status.store(FAILED, Ordering::Release);
		let error = CellError::CallbackPanicked {
			subscriber: self.id,
			message: panic_message(payload.as_ref()),
		};
		let event = Event::Error(error.clone());
		let _ = panic::catch_unwind(AssertUnwindSafe(|| (self.on_event)(event)));
		error
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"non-string panic payload".to_string()
	}
}

/// Caller-owned token for a subscription.
///
/// The subscription lasts exactly as long as at least one clone of the handle
/// is alive. Dropping the last clone unsubscribes; the cell notices at its
/// next fan-out and skips the entry.
#[must_use = "the subscription ends as soon as the handle is dropped"]
pub struct SubscriptionHandle<E> {
	observer: Arc<Observer<E>>,
}

impl<E> SubscriptionHandle<E> {
	pub(crate) fn new(observer: Observer<E>) -> Self {
		Self {
			observer: Arc::new(observer),
		}
	}

	pub(crate) fn downgrade(&self) -> Weak<Observer<E>> {
		Arc::downgrade(&self.observer)
	}

	/// Process-unique subscription id, as reported in `CellError::CallbackPanicked`.
	pub fn id(&self) -> u64 {
		self.observer.id
	}

	pub fn status(&self) -> SubscriptionStatus {
		match self.observer.status.load(Ordering::Acquire) {
			ACTIVE => SubscriptionStatus::Active,
			COMPLETED => SubscriptionStatus::Completed,
			_ => SubscriptionStatus::Failed,
		}
	}

	/// Returns true while the subscription still receives events.
	pub fn is_active(&self) -> bool {
		self.observer.is_active()
	}
}

impl<E> Clone for SubscriptionHandle<E> {
	fn clone(&self) -> Self {
		Self {
			observer: Arc::clone(&self.observer),
		}
	}
}

impl<E> fmt::Debug for SubscriptionHandle<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SubscriptionHandle")
			.field("id", &self.id())
			.field("status", &self.status())
			.finish()
	}
}
