use affix_primitives::{ActionName, Icon};

/// Presentation of the undo action and its confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOptions {
	pub undo_name: ActionName,
	pub undo_icon: Icon,
	/// Title of the prompt shown when a revert would discard later edits.
	pub confirm_title: String,
	pub confirm_body: String,
}

impl Default for HistoryOptions {
	fn default() -> Self {
		Self {
			undo_name: ActionName::new("Undo"),
			undo_icon: Icon::new(["fa-solid", "fa-arrow-rotate-left"]),
			confirm_title: "Restore the previous contents?".to_string(),
			confirm_body: "This block was edited after the last paste.\n\
			               Restoring it discards those edits and they cannot be recovered.\n\
			               Continue anyway?"
				.to_string(),
		}
	}
}
