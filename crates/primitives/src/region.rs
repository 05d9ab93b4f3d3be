//! Externally owned regions of the host document.

use crate::ids::{DocumentContext, RegionId};

/// An addressable block of document content that can host affordances.
///
/// The host owns the content; this value only carries identity. `label` is
/// whatever the host uses to name the block (a file name for code blocks) and
/// is informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
	pub id: RegionId,
	pub context: DocumentContext,
	pub label: Option<String>,
}

impl Region {
	pub fn new(id: impl Into<RegionId>, context: DocumentContext) -> Self {
		Self {
			id: id.into(),
			context,
			label: None,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
}
