/* src/lib.rs */

//!
//! A thread-safe observable value cell.
//!
//! [`ObservableCell`] holds a single value and notifies subscribers whenever
//! it changes:
//!
//! - **Atomic writes**: writers are mutually exclusive, and readers only ever
//!   see values whose fan-out has finished.
//! - **Weak subscribers**: the cell never owns a callback. Dropping the
//!   [`SubscriptionHandle`] returned by `subscribe` unsubscribes.
//! - **Ordered fan-out**: each `set` delivers one [`Event::Next`] per live
//!   subscriber, in registration order.
//! - **Single transform**: `map` installs one function applied to values
//!   before delivery.
//! - **End of life**: dropping the cell delivers [`Event::Completed`].
//!
//! ## Feature Flags
//!
//! - `full`: Enables all features.
//! - `logging`: Emits `log` records for failed callbacks, pruning and drop (default).
//! - `async`: Enables `subscribe_on`, delivering events on a tokio runtime (default).
//! - `stream`: Enables `stream`, exposing events as a `futures_util::Stream` (default).
//! - `serde`: Derives `Serialize`/`Deserialize` for [`Config`].
//!
//! ## Basic Usage
//!
//! ```
//! use obcell::ObservableCell;
//!
//! let cell = ObservableCell::new(0);
//! let _handle = cell.map(|x| x + 1).subscribe(|v| println!("got {v}"));
//! cell.set(5); // prints "got 6"
//! assert_eq!(cell.get(), 5);
//! ```
//!
//! See `demos/basic.rs` for a multi-threaded example.

mod cell;
mod config;
mod delivery;
mod error;
mod event;
mod subscription;

#[cfg(feature = "async")]
mod dispatch;
#[cfg(feature = "stream")]
mod stream;

pub use cell::{CellBuilder, ObservableCell};
pub use config::{Config, DEFAULT_PRUNE_THRESHOLD, Retention};
pub use delivery::Delivery;
pub use error::CellError;
pub use event::Event;
pub use subscription::{SubscriptionHandle, SubscriptionStatus};

#[cfg(feature = "stream")]
pub use stream::EventStream;
