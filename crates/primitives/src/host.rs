use std::sync::Arc;

use async_trait::async_trait;

use crate::affordance::AttachmentSlot;
use crate::error::HostError;
use crate::ids::{DocumentContext, RegionId};
use crate::region::Region;

/// Document-side collaborator.
///
/// Every async method is a suspension point; callers re-validate their own
/// state after awaiting one.
#[async_trait]
pub trait DocumentHost: Send + Sync {
	/// Context of the document currently open, `None` when no document is.
	fn active_context(&self) -> Option<DocumentContext>;

	/// All regions currently materialized in the document for `context`.
	async fn discover_regions(&self, context: &DocumentContext) -> Result<Vec<Region>, HostError>;

	/// Where affordances for `region` render; `None` while it is not visible.
	fn find_attachment_slot(&self, region: &RegionId) -> Option<Arc<dyn AttachmentSlot>>;

	async fn read_region_content(&self, region: &Region) -> Result<String, HostError>;

	async fn write_region_content(&self, content: &str, region: &Region) -> Result<(), HostError>;
}

/// Buttons offered by a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
	Ok,
	OkCancel,
}

/// Button the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
	Ok,
	Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogAnswer {
	pub button: DialogButton,
}

impl DialogAnswer {
	pub fn ok() -> Self {
		Self { button: DialogButton::Ok }
	}

	pub fn cancel() -> Self {
		Self {
			button: DialogButton::Cancel,
		}
	}

	pub fn is_ok(&self) -> bool {
		self.button == DialogButton::Ok
	}
}

/// Modal confirmation collaborator.
#[async_trait]
pub trait Dialog: Send + Sync {
	async fn confirm(&self, kind: ConfirmKind, title: &str, body: &str) -> DialogAnswer;
}

/// System clipboard collaborator.
#[async_trait]
pub trait Clipboard: Send + Sync {
	async fn read_text(&self) -> Result<String, HostError>;
}
