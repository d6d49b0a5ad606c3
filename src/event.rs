/* src/event.rs */

use std::sync::Arc;

use super::CellError;

/// Events delivered to subscribers of an [`ObservableCell`](crate::ObservableCell).
#[derive(Debug)]
pub enum Event<E> {
	/// A new value was set (after the cell's transform, if any).
	Next(Arc<E>),
	/// The cell was dropped. Nothing follows.
	Completed,
	/// The subscriber's own callback failed. Nothing follows.
	Error(CellError),
}

impl<E> Event<E> {
	/// Returns the carried value for `Next` events.
	pub fn value(&self) -> Option<&Arc<E>> {
		match self {
			Event::Next(value) => Some(value),
			_ => None,
		}
	}

	/// Returns true for `Completed` and `Error`, after which a subscriber
	/// receives nothing more.
	pub fn is_terminal(&self) -> bool {
		!matches!(self, Event::Next(_))
	}
}

impl<E> Clone for Event<E> {
	fn clone(&self) -> Self {
		match self {
			Event::Next(value) => Event::Next(Arc::clone(value)),
			Event::Completed => Event::Completed,
			Event::Error(error) => Event::Error(error.clone()),
		}
	}
}
