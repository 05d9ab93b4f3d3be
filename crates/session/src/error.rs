//! Session-level error types.

use std::path::PathBuf;

use affix_primitives::{ActionError, ActionName, RegionId};
use thiserror::Error;

/// Errors that can occur while loading a [`SessionConfig`](crate::SessionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unknown key.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value parsed but cannot be used.
	#[error("invalid value for {field}: {reason}")]
	Invalid {
		field: &'static str,
		reason: String,
	},
}

/// Errors from [`Session::invoke`](crate::Session::invoke).
#[derive(Debug, Error)]
pub enum SessionError {
	/// The registry knows no region with this id.
	#[error("unknown region: {0}")]
	UnknownRegion(RegionId),

	/// No effective action with this name is attached to the region.
	#[error("no action {name} on region {region}")]
	UnknownAction { region: RegionId, name: ActionName },

	/// The action's handler failed.
	#[error(transparent)]
	Action(#[from] ActionError),
}
