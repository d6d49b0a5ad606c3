/* src/stream.rs */

//!
//! Cell events as a `futures_util::Stream`.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::{Event, ObservableCell, SubscriptionHandle};

/// A subscription that yields events as a stream.
///
/// The stream owns its subscription: dropping it unsubscribes. It ends after
/// yielding `Event::Completed` or `Event::Error`.
pub struct EventStream<E> {
	inner: UnboundedReceiverStream<Event<E>>,
	handle: SubscriptionHandle<E>,
	finished: bool,
}

impl<E> EventStream<E> {
	/// The subscription backing this stream.
	pub fn handle(&self) -> &SubscriptionHandle<E> {
		&self.handle
	}
}

impl<E> Stream for EventStream<E> {
	type Item = Event<E>;

	fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
		if self.finished {
			return Poll::Ready(None);
		}

		let polled = Pin::new(&mut self.inner).poll_next(cx);
		if let Poll::Ready(Some(event)) = &polled
			&& event.is_terminal()
		{
			self.finished = true;
		}
		polled
	}
}

impl<E> ObservableCell<E>
where
	E: Send + Sync + 'static,
{
	/// Subscribes and returns the events as a [`Stream`].
	pub fn stream(&self) -> EventStream<E> {
		let (tx, rx) = mpsc::unbounded_channel::<Event<E>>();
		let handle = self.forward(tx);
		EventStream {
			inner: UnboundedReceiverStream::new(rx),
			handle,
			finished: false,
		}
	}
}
