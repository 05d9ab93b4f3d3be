//! Rendered affordances.
//!
//! An [`Affordance`] is what a slot actually holds: one action bound to the
//! region it was rendered for. Slots are host-owned; the reconciler only ever
//! asks them which names are rendered, appends, and removes by name.

use crate::action::{Action, ActionEvent, ActionResult, Icon};
use crate::future::BoxFutureStatic;
use crate::ids::ActionName;
use crate::region::Region;

/// One action rendered inside one region's slot.
#[derive(Debug, Clone)]
pub struct Affordance {
	action: Action,
	region: Region,
}

impl Affordance {
	pub fn new(action: Action, region: Region) -> Self {
		Self { action, region }
	}

	pub fn name(&self) -> &ActionName {
		self.action.name()
	}

	pub fn icon(&self) -> &Icon {
		self.action.icon()
	}

	pub fn region(&self) -> &Region {
		&self.region
	}

	/// Style classes for the rendered element: `button` plus the lowercased name.
	pub fn classes(&self) -> Vec<String> {
		vec!["button".to_string(), self.name().as_str().to_lowercase()]
	}

	/// Runs the bound action against the region it was rendered for.
	pub fn invoke(&self, event: ActionEvent) -> BoxFutureStatic<ActionResult> {
		self.action.invoke(event, self.region.clone())
	}
}

/// Host-side container for a region's affordances.
pub trait AttachmentSlot: Send + Sync {
	/// Names of the affordances currently rendered, in display order.
	fn rendered(&self) -> Vec<ActionName>;

	/// Appends one affordance at the end of the slot.
	fn append(&self, affordance: Affordance);

	/// Removes every rendered affordance called `name`; returns how many went.
	fn remove(&self, name: &ActionName) -> usize;
}
