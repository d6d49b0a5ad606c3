/* src/config.rs */

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::CellError;

/// Default number of stale subscriber entries tolerated before compaction.
pub const DEFAULT_PRUNE_THRESHOLD: usize = 32;

/// How much of the value history a cell keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Retention {
	/// Every value ever set is kept.
	#[default]
	Unbounded,
	/// Only the newest `n` values are kept. `n` must be at least 1.
	Bounded(usize),
}

/// Configuration for an [`ObservableCell`](crate::ObservableCell).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
	/// History retention policy.
	pub retention: Retention,

	/// Number of stale subscriber entries a fan-out pass may encounter before
	/// the subscriber list is compacted. `None` disables compaction.
	pub prune_threshold: Option<usize>,

	/// Name used in log lines.
	pub label: Option<String>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			retention: Retention::Unbounded,
			prune_threshold: Some(DEFAULT_PRUNE_THRESHOLD),
			label: None,
		}
	}
}

impl Config {
	pub(crate) fn validate(&self) -> Result<(), CellError> {
		if self.retention == Retention::Bounded(0) {
			return Err(CellError::InvalidConfig(
				"bounded retention must keep at least one value".to_string(),
			));
		}
		if self.prune_threshold == Some(0) {
			return Err(CellError::InvalidConfig(
				"prune threshold must be positive, use None to disable".to_string(),
			));
		}
		Ok(())
	}

	#[cfg_attr(not(feature = "logging"), allow(dead_code))]
	pub(crate) fn label(&self) -> &str {
		self.label.as_deref().unwrap_or("cell")
	}
}
