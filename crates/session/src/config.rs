//! Session configuration.
//!
//! ```toml
//! [cursor]
//! cursor_line_class = "cursor-line"
//!
//! [history]
//! name = "Undo"
//! icon = ["fa-solid", "fa-arrow-rotate-left"]
//!
//! [paste]
//! enabled = true
//! name = "Paste"
//!
//! [registry]
//! rescan_on_content_change = true
//! ```
//!
//! Every key is optional. Unknown keys are rejected.

use std::path::Path;

use affix_cursor::DEFAULT_CURSOR_LINE_CLASS;
use affix_history::HistoryOptions;
use affix_primitives::{ActionName, Icon};
use serde::Deserialize;

use crate::error::ConfigError;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
	pub cursor: CursorConfig,
	pub history: HistoryConfig,
	pub paste: PasteConfig,
	pub registry: RegistryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CursorConfig {
	/// Class that flags the line holding the cursor.
	pub cursor_line_class: String,
}

impl Default for CursorConfig {
	fn default() -> Self {
		Self {
			cursor_line_class: DEFAULT_CURSOR_LINE_CLASS.to_string(),
		}
	}
}

/// Undo action and the prompt shown before discarding later edits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
	pub name: String,
	pub icon: Icon,
	pub title: String,
	pub body: String,
}

impl Default for HistoryConfig {
	fn default() -> Self {
		let options = HistoryOptions::default();
		Self {
			name: options.undo_name.to_string(),
			icon: options.undo_icon,
			title: options.confirm_title,
			body: options.confirm_body,
		}
	}
}

impl HistoryConfig {
	pub fn options(&self) -> HistoryOptions {
		HistoryOptions {
			undo_name: ActionName::new(&self.name),
			undo_icon: self.icon.clone(),
			confirm_title: self.title.clone(),
			confirm_body: self.body.clone(),
		}
	}
}

/// Built-in paste action and the alert shown when the clipboard is unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasteConfig {
	pub enabled: bool,
	pub name: String,
	pub icon: Icon,
	pub title: String,
	pub body: String,
}

impl Default for PasteConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			name: "Paste".to_string(),
			icon: Icon::new(["fa-regular", "fa-paste"]),
			title: "Could not read text from the clipboard".to_string(),
			body: "Check that clipboard access is allowed in the browser's permission settings.".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Rescan regions whenever the document reports a content change.
	pub rescan_on_content_change: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			rescan_on_content_change: true,
		}
	}
}

impl SessionConfig {
	/// Parses and validates TOML text.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&input)?;
		tracing::debug!(path = %path.display(), "config.load");
		Ok(config)
	}

	/// Rejects values that parse but would break action identity or line lookup.
	pub fn validate(&self) -> Result<()> {
		let class = &self.cursor.cursor_line_class;
		if class.is_empty() || class.contains(char::is_whitespace) {
			return Err(ConfigError::Invalid {
				field: "cursor.cursor_line_class",
				reason: format!("{class:?} is not a single class name"),
			});
		}
		if self.history.name.trim().is_empty() {
			return Err(ConfigError::Invalid {
				field: "history.name",
				reason: "action name is empty".to_string(),
			});
		}
		if self.paste.name.trim().is_empty() {
			return Err(ConfigError::Invalid {
				field: "paste.name",
				reason: "action name is empty".to_string(),
			});
		}
		if self.paste.name == self.history.name {
			return Err(ConfigError::Invalid {
				field: "paste.name",
				reason: format!("{:?} is already the undo action's name", self.paste.name),
			});
		}
		Ok(())
	}
}
