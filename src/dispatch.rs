/* src/dispatch.rs */

//!
//! Asynchronous delivery of cell events onto a tokio runtime.

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::{Event, ObservableCell, SubscriptionHandle};

impl<E> ObservableCell<E>
where
	E: Send + Sync + 'static,
{
	/// Subscribes with a callback that runs on `runtime` instead of the
	/// writer's thread.
	///
	/// Events are forwarded through an unbounded channel to a task spawned on
	/// `runtime`, so a slow callback never blocks `set` or other subscribers.
	/// Events reach this callback in the order they were set; callbacks of
	/// different subscribers may run concurrently.
	///
	/// The task exits after a terminal event, or once the handle is dropped
	/// and the already forwarded events are drained. A panic inside
	/// `on_event` ends the task; later events are discarded.
	pub fn subscribe_on<F>(&self, runtime: &Handle, mut on_event: F) -> SubscriptionHandle<E>
	where
		F: FnMut(Event<E>) + Send + 'static,
	{
		let (tx, mut rx) = mpsc::unbounded_channel::<Event<E>>();

		runtime.spawn(async move {
			while let Some(event) = rx.recv().await {
				let terminal = event.is_terminal();
				on_event(event);
				if terminal {
					break;
				}
			}
		});

		self.forward(tx)
	}

	/// Registers a subscriber that pushes every event into `tx`.
	pub(crate) fn forward(&self, tx: mpsc::UnboundedSender<Event<E>>) -> SubscriptionHandle<E> {
		self.register(Box::new(move |event| {
			// The receiving side may already be gone.
			let _ = tx.send(event);
		}))
	}
}
