/* src/error.rs */

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellError {
	/// A subscriber callback panicked while handling an event.
	///
	/// The subscriber is terminated and receives no further events; the
	/// remaining subscribers of the same pass are still notified.
	#[error("subscriber {subscriber} panicked: {message}")]
	CallbackPanicked { subscriber: u64, message: String },
	/// The cell configuration was rejected.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}
