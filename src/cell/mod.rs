/* src/cell/mod.rs */

mod read;
mod subscribe;
mod write;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{
	Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak,
};

use arc_swap::{ArcSwap, ArcSwapOption};

use super::subscription::Observer;
use super::{CellError, Config, Retention};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

thread_local! {
	static THREAD_TOKEN: u64 = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
}

/// Non-zero token identifying the calling thread.
fn thread_token() -> u64 {
	THREAD_TOKEN.with(|token| *token)
}

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read_gate(gate: &RwLock<()>) -> RwLockReadGuard<'_, ()> {
	gate.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_gate(gate: &RwLock<()>) -> RwLockWriteGuard<'_, ()> {
	gate.write().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct Transform<E>(Box<dyn Fn(&E) -> E + Send + Sync>);

/// Thread-safe observable value cell.
///
/// Readers share access; writers are exclusive. Each `set` replaces the
/// value, appends it to the history and fans it out to every live
/// subscriber, in registration order, as one step: readers on other threads
/// wait for the step to finish, so they never observe a value that has not
/// been fully delivered, and any read that follows a delivery sees the
/// delivered write.
///
/// Subscribers are held weakly. The [`SubscriptionHandle`](crate::SubscriptionHandle)
/// returned by `subscribe` owns the callback, and dropping it unsubscribes.
///
/// Dropping the cell delivers [`Event::Completed`](crate::Event::Completed)
/// to every subscriber that is still alive.
pub struct ObservableCell<E> {
	pub(crate) current: ArcSwap<E>,
	pub(crate) history: Mutex<VecDeque<Arc<E>>>,
	pub(crate) subscribers: ArcSwap<Vec<Weak<Observer<E>>>>,
	pub(crate) transform: ArcSwapOption<Transform<E>>,
	/// Exclusive for `set` and `subscribe`, shared for reads.
	pub(crate) gate: RwLock<()>,
	/// Token of the thread holding `gate` exclusively, 0 when free.
	pub(crate) writer: AtomicU64,
	/// Values set reentrantly from inside a fan-out, delivered after it.
	pub(crate) deferred: Mutex<VecDeque<Arc<E>>>,
	pub(crate) version: AtomicU64,
	pub(crate) config: Config,
}

impl<E> ObservableCell<E>
where
	E: Send + Sync + 'static,
{
	/// Creates a cell holding `initial`, with no history, no subscribers and
	/// no transform.
	pub fn new(initial: E) -> Self {
		Self::from_parts(initial, Config::default())
	}

	/// Creates a cell with a custom configuration.
	pub fn with_config(initial: E, config: Config) -> Result<Self, CellError> {
		config.validate()?;
		Ok(Self::from_parts(initial, config))
	}

	pub fn builder() -> CellBuilder<E> {
		CellBuilder::new()
	}

	fn from_parts(initial: E, config: Config) -> Self {
		Self {
			current: ArcSwap::from_pointee(initial),
			history: Mutex::new(VecDeque::new()),
			subscribers: ArcSwap::from_pointee(Vec::new()),
			transform: ArcSwapOption::empty(),
			gate: RwLock::new(()),
			writer: AtomicU64::new(0),
			deferred: Mutex::new(VecDeque::new()),
			version: AtomicU64::new(0),
			config,
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Returns true if the calling thread is inside this cell's fan-out.
	pub(crate) fn is_reentrant(&self) -> bool {
		self.writer.load(Ordering::Acquire) == thread_token()
	}

	/// Shared access for readers. Inside a fan-out the calling thread already
	/// holds the gate exclusively and reads without it.
	pub(crate) fn read_access(&self) -> Option<RwLockReadGuard<'_, ()>> {
		(!self.is_reentrant()).then(|| read_gate(&self.gate))
	}

	/// Exclusive access for writers and registrations, `None` when reentrant.
	pub(crate) fn write_access(&self) -> Option<RwLockWriteGuard<'_, ()>> {
		(!self.is_reentrant()).then(|| write_gate(&self.gate))
	}
}

impl<E> Drop for ObservableCell<E> {
	fn drop(&mut self) {
		let subscribers = self.subscribers.load();
		let mut completed = 0usize;
		for observer in subscribers.iter().filter_map(Weak::upgrade) {
			if observer.complete() {
				completed += 1;
			}
		}

		#[cfg(feature = "logging")]
		log::debug!(
			"{}: dropped after {} writes, completed {} subscribers",
			self.config.label(),
			self.version.load(Ordering::Acquire),
			completed
		);

		#[cfg(not(feature = "logging"))]
		{
			let _ = completed;
		}
	}
}

impl<E> std::fmt::Debug for ObservableCell<E>
where
	E: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut s = f.debug_struct("ObservableCell");
		s.field("current", &**self.current.load());
		s.field("version", &self.version.load(Ordering::Acquire));
		s.field("subscribers", &self.subscribers.load().len());
		s.field("mapped", &self.transform.load().is_some());
		s.field("config", &self.config);
		s.finish_non_exhaustive()
	}
}

/// Builder for [`ObservableCell`].
pub struct CellBuilder<E> {
	config: Config,
	_marker: std::marker::PhantomData<fn() -> E>,
}

impl<E> CellBuilder<E>
where
	E: Send + Sync + 'static,
{
	pub fn new() -> Self {
		Self {
			config: Config::default(),
			_marker: std::marker::PhantomData,
		}
	}

	/// Replaces the whole configuration.
	pub fn config(mut self, config: Config) -> Self {
		self.config = config;
		self
	}

	pub fn retention(mut self, retention: Retention) -> Self {
		self.config.retention = retention;
		self
	}

	/// Sets how many stale subscriber entries a fan-out pass tolerates before
	/// compacting the list. `None` disables compaction.
	pub fn prune_threshold(mut self, threshold: Option<usize>) -> Self {
		self.config.prune_threshold = threshold;
		self
	}

	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.config.label = Some(label.into());
		self
	}

	pub fn build(self, initial: E) -> Result<ObservableCell<E>, CellError> {
		ObservableCell::with_config(initial, self.config)
	}
}

impl<E> Default for CellBuilder<E>
where
	E: Send + Sync + 'static,
{
	fn default() -> Self {
		Self::new()
	}
}
