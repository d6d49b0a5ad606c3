/* src/cell/subscribe.rs */

use std::sync::Arc;

use super::super::Event;
use super::super::subscription::{Callback, Observer, SubscriptionHandle};
use super::{ObservableCell, Transform};

impl<E> ObservableCell<E>
where
	E: Send + Sync + 'static,
{
	/// Subscribes to future values.
	///
	/// `on_next` receives every value set after this call returns, after the
	/// cell's transform. Earlier values are not replayed. The subscription
	/// lasts as long as the returned handle.
	pub fn subscribe<F>(&self, on_next: F) -> SubscriptionHandle<E>
	where
		F: Fn(Arc<E>) + Send + Sync + 'static,
	{
		self.register(Box::new(move |event| {
			if let Event::Next(value) = event {
				on_next(value);
			}
		}))
	}

	/// Subscribes to every event, including `Completed` when the cell is
	/// dropped and `Error` if `on_event` itself panics.
	pub fn subscribe_events<F>(&self, on_event: F) -> SubscriptionHandle<E>
	where
		F: Fn(Event<E>) + Send + Sync + 'static,
	{
		self.register(Box::new(on_event))
	}

	pub(crate) fn register(&self, on_event: Callback<E>) -> SubscriptionHandle<E> {
		let handle = SubscriptionHandle::new(Observer::new(on_event));
		let weak = handle.downgrade();

		let _write = self.write_access();
		self.subscribers.rcu(|current| {
			let mut next = Vec::with_capacity(current.len() + 1);
			next.extend(current.iter().cloned());
			next.push(weak.clone());
			next
		});

		handle
	}

	/// Installs `transform`, applied to every value before it is delivered to
	/// subscribers, existing and future. Stored values are not transformed.
	///
	/// Only one transform is active at a time: a later call replaces the
	/// previous one rather than composing with it.
	pub fn map<F>(&self, transform: F) -> &Self
	where
		F: Fn(&E) -> E + Send + Sync + 'static,
	{
		self.transform
			.store(Some(Arc::new(Transform(Box::new(transform)))));
		self
	}

	/// Removes the installed transform.
	pub fn clear_map(&self) -> &Self {
		self.transform.store(None);
		self
	}
}
