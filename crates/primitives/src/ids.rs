use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Stable identifier of a region (the id of the line that heads it).
///
/// Cheap to clone; compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(Arc<str>);

impl RegionId {
	pub fn new(id: impl AsRef<str>) -> Self {
		Self(Arc::from(id.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for RegionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for RegionId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for RegionId {
	fn from(id: String) -> Self {
		Self(Arc::from(id))
	}
}

impl Borrow<str> for RegionId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

/// Key of an action within one scope.
///
/// Two actions with the same name are the same action as far as attachment,
/// deduplication, and rendering are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionName(Arc<str>);

impl ActionName {
	pub fn new(name: impl AsRef<str>) -> Self {
		Self(Arc::from(name.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ActionName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ActionName {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for ActionName {
	fn from(name: String) -> Self {
		Self(Arc::from(name))
	}
}

impl Borrow<str> for ActionName {
	fn borrow(&self) -> &str {
		&self.0
	}
}

/// Owning scope of a region: the project and the document inside it.
///
/// A region whose context differs from the host's active context is stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentContext {
	pub project: Arc<str>,
	pub document: Arc<str>,
}

impl DocumentContext {
	pub fn new(project: impl AsRef<str>, document: impl AsRef<str>) -> Self {
		Self {
			project: Arc::from(project.as_ref()),
			document: Arc::from(document.as_ref()),
		}
	}

	/// Returns `true` when both contexts belong to the same project.
	pub fn same_project(&self, other: &Self) -> bool {
		self.project == other.project
	}
}

impl fmt::Display for DocumentContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.project, self.document)
	}
}
