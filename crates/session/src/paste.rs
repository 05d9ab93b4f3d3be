//! Built-in paste action.
//!
//! Replaces a region's content with the clipboard text through
//! [`EditHistory::replace`], which leaves an undo affordance behind.

use std::sync::Arc;

use affix_history::{EditHistory, HistoryError, RecordOutcome, WeakEditHistory};
use affix_primitives::{Action, ActionError, ActionName, Clipboard, ConfirmKind, Dialog, Region};

use crate::config::PasteConfig;

/// Rewrites clipboard line endings to `\n`.
///
/// `\r\n` collapses to one newline and a lone `\r` becomes one. Text with
/// no carriage return comes back without reallocating.
pub fn normalize_to_lf(text: String) -> String {
	if !text.contains('\r') {
		return text;
	}
	text.replace("\r\n", "\n").replace('\r', "\n")
}

struct PasteAlert {
	title: String,
	body: String,
}

/// Builds the paste action described by `config`.
///
/// Holds the history weakly so a global attachment never keeps it alive.
pub(crate) fn paste_action(
	config: &PasteConfig,
	history: WeakEditHistory,
	clipboard: Arc<dyn Clipboard>,
	dialog: Arc<dyn Dialog>,
) -> Action {
	let alert = Arc::new(PasteAlert {
		title: config.title.clone(),
		body: config.body.clone(),
	});
	Action::new(ActionName::new(&config.name), config.icon.clone(), move |_event, region| {
		let history = history.clone();
		let clipboard = clipboard.clone();
		let dialog = dialog.clone();
		let alert = alert.clone();
		async move {
			let history = history.upgrade().ok_or(HistoryError::Detached)?;
			let text = match clipboard.read_text().await {
				Ok(text) => normalize_to_lf(text),
				Err(error) => {
					tracing::warn!(region = %region.id, %error, "paste.clipboard_failed");
					dialog.confirm(ConfirmKind::Ok, &alert.title, &alert.body).await;
					return Err(ActionError::Host(error));
				}
			};
			paste_into(&history, &region, &text).await?;
			Ok::<(), ActionError>(())
		}
	})
}

async fn paste_into(history: &EditHistory, region: &Region, text: &str) -> Result<(), HistoryError> {
	match history.replace(region, text).await? {
		RecordOutcome::Stale => tracing::debug!(region = %region.id, "paste.stale"),
		outcome => tracing::debug!(region = %region.id, bytes = text.len(), ?outcome, "paste"),
	}
	Ok(())
}
