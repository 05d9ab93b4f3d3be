use thiserror::Error;

use crate::ids::RegionId;

/// Failure reported by a host collaborator.
///
/// The core treats every variant the same way: the operation that hit it is
/// abandoned without mutating core state, and the error is handed back to the
/// caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
	/// The region is no longer present in the document.
	#[error("region not found: {0}")]
	RegionNotFound(RegionId),
	/// Region content could not be read.
	#[error("failed to read region {region}: {reason}")]
	Read { region: RegionId, reason: String },
	/// Region content could not be written.
	#[error("failed to write region {region}: {reason}")]
	Write { region: RegionId, reason: String },
	/// Region discovery failed.
	#[error("region discovery failed: {0}")]
	Discovery(String),
	/// Clipboard text was unavailable.
	#[error("clipboard unavailable: {0}")]
	Clipboard(String),
}
