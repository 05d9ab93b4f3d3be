use affix_primitives::{ActionError, HostError};
use thiserror::Error;

/// Errors from history operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
	/// Reading or writing region content failed; history is unchanged.
	#[error(transparent)]
	Host(#[from] HostError),
	/// The history backing an undo action has been dropped.
	#[error("edit history is no longer available")]
	Detached,
}

impl From<HistoryError> for ActionError {
	fn from(error: HistoryError) -> Self {
		match error {
			HistoryError::Host(error) => ActionError::Host(error),
			HistoryError::Detached => ActionError::Unavailable("edit history"),
		}
	}
}
