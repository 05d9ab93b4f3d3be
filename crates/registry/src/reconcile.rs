//! Idempotent affordance reconciliation.
//!
//! Given the latest cursor notification, make one region's slot show exactly
//! the effective actions when the cursor is on the region's line and none of
//! them otherwise. Membership is checked by name against what the slot reports
//! as rendered, so repeated or interleaved passes converge on the same result.

use affix_primitives::{Action, ActionName, Affordance, CursorNotification, DocumentHost, Region};

/// What one reconciliation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
	pub added: usize,
	pub removed: usize,
}

impl ReconcileStats {
	pub fn is_noop(&self) -> bool {
		self.added == 0 && self.removed == 0
	}
}

/// Global actions followed by local ones, deduplicated by name.
///
/// A local action sharing a name with a global one takes the global slot in
/// the ordering but keeps its own icon and handler.
pub fn effective_actions(global: &[Action], local: &[Action]) -> Vec<Action> {
	let mut out = Vec::with_capacity(global.len() + local.len());
	for action in global {
		if out.iter().any(|a: &Action| a.name() == action.name()) {
			continue;
		}
		let winner = local.iter().find(|l| l.name() == action.name()).unwrap_or(action);
		out.push(winner.clone());
	}
	for action in local {
		if !out.iter().any(|a| a.name() == action.name()) {
			out.push(action.clone());
		}
	}
	out
}

/// Reconciles the slot of `region` against `notification`.
///
/// `retired` names are removed whenever they are rendered and not effective,
/// regardless of the cursor. Returns `None` when the region has no slot (not
/// rendered), in which case nothing was touched.
pub fn reconcile_region(
	notification: &CursorNotification,
	region: &Region,
	effective: &[Action],
	retired: &[ActionName],
	host: &dyn DocumentHost,
) -> Option<ReconcileStats> {
	let Some(slot) = host.find_attachment_slot(&region.id) else {
		tracing::trace!(region = %region.id, "reconcile.no_slot");
		return None;
	};

	let rendered = slot.rendered();
	let is_rendered = |name: &ActionName| rendered.iter().any(|r| r == name);
	let mut stats = ReconcileStats::default();

	for name in retired {
		if is_rendered(name) && !effective.iter().any(|a| a.name() == name) {
			stats.removed += slot.remove(name);
		}
	}

	if notification.is_on(&region.id) {
		for action in effective {
			if !is_rendered(action.name()) {
				slot.append(Affordance::new(action.clone(), region.clone()));
				stats.added += 1;
			}
		}
	} else {
		for action in effective {
			if is_rendered(action.name()) {
				stats.removed += slot.remove(action.name());
			}
		}
	}

	if !stats.is_noop() {
		tracing::trace!(region = %region.id, added = stats.added, removed = stats.removed, "reconcile.region");
	}
	Some(stats)
}
