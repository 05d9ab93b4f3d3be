//! Common utilities for session integration tests.

use std::sync::Arc;

use affix_primitives::testing::{FakeClipboard, FakeCursorSurface, FakeDocument, ScriptedDialog};
use affix_primitives::{DocumentContext, Region};
use affix_session::{Collaborators, Session, SessionConfig};

/// A session wired to in-memory collaborators.
pub struct Harness {
	pub doc: Arc<FakeDocument>,
	pub surface: Arc<FakeCursorSurface>,
	pub dialog: Arc<ScriptedDialog>,
	pub clipboard: Arc<FakeClipboard>,
	pub session: Session,
}

pub fn context(document: &str) -> DocumentContext {
	DocumentContext::new("P1", document)
}

pub fn harness() -> Harness {
	harness_with(SessionConfig::default())
}

pub fn harness_with(config: SessionConfig) -> Harness {
	let _ = tracing_subscriber::fmt::try_init();
	let doc = Arc::new(FakeDocument::new(context("page")));
	let surface = Arc::new(FakeCursorSurface::new());
	let dialog = Arc::new(ScriptedDialog::new());
	let clipboard = Arc::new(FakeClipboard::with_text(""));
	let session = Session::new(
		config,
		Collaborators {
			document: doc.clone(),
			cursor: surface.clone(),
			dialog: dialog.clone(),
			clipboard: clipboard.clone(),
		},
	);
	Harness {
		doc,
		surface,
		dialog,
		clipboard,
		session,
	}
}

impl Harness {
	/// Adds regions with the given contents and lays them out as lines.
	pub fn regions(&self, blocks: &[(&str, &str)]) -> Vec<Region> {
		let regions = blocks
			.iter()
			.map(|(id, content)| {
				let region = self.doc.add_region(id);
				self.doc.set_content(id, content);
				region
			})
			.collect();
		let ids: Vec<&str> = blocks.iter().map(|(id, _)| *id).collect();
		self.surface.layout(&ids, None);
		regions
	}

	/// Moves the cursor and delivers the marker mutation.
	pub async fn cursor_to(&self, line: Option<&str>) {
		self.surface.move_cursor(line);
		self.session.on_marker_mutation().await;
	}
}
