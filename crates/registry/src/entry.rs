use affix_primitives::{Action, ActionName, Region};

/// Actions attached to one region.
#[derive(Debug, Clone)]
pub struct AttachmentEntry {
	region: Region,
	actions: Vec<Action>,
	/// Detached names whose rendered affordances still need removing.
	retired: Vec<ActionName>,
}

impl AttachmentEntry {
	pub fn new(region: Region) -> Self {
		Self {
			region,
			actions: Vec::new(),
			retired: Vec::new(),
		}
	}

	pub fn region(&self) -> &Region {
		&self.region
	}

	pub fn actions(&self) -> &[Action] {
		&self.actions
	}

	pub fn retired(&self) -> &[ActionName] {
		&self.retired
	}

	pub(crate) fn set_region(&mut self, region: Region) {
		self.region = region;
	}

	pub(crate) fn merge(&mut self, incoming: impl IntoIterator<Item = Action>) {
		merge_by_name(&mut self.actions, &mut self.retired, incoming);
	}

	pub(crate) fn remove(&mut self, names: &[ActionName]) -> usize {
		remove_by_name(&mut self.actions, &mut self.retired, names)
	}

	/// Forgets retirements that a reconciliation pass has already applied.
	pub(crate) fn settle(&mut self, applied: &[ActionName]) {
		self.retired.retain(|name| !applied.contains(name));
	}
}

/// Merges `incoming` into `actions` by name.
///
/// A colliding action replaces the old one in place; new names are appended.
/// Merged names stop being retired.
pub(crate) fn merge_by_name(actions: &mut Vec<Action>, retired: &mut Vec<ActionName>, incoming: impl IntoIterator<Item = Action>) {
	for action in incoming {
		retired.retain(|name| name != action.name());
		match actions.iter().position(|a| a.name() == action.name()) {
			Some(index) => actions[index] = action,
			None => actions.push(action),
		}
	}
}

/// Removes every action whose name is in `names`, retiring the removed names.
pub(crate) fn remove_by_name(actions: &mut Vec<Action>, retired: &mut Vec<ActionName>, names: &[ActionName]) -> usize {
	let before = actions.len();
	actions.retain(|action| {
		if !names.contains(action.name()) {
			return true;
		}
		if !retired.contains(action.name()) {
			retired.push(action.name().clone());
		}
		false
	});
	before - actions.len()
}
