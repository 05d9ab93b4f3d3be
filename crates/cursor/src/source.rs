use std::sync::Arc;

use affix_primitives::{CursorSurface, LineNode, MarkerObservation};

/// Class the host puts on the line holding the cursor.
pub const DEFAULT_CURSOR_LINE_CLASS: &str = "cursor-line";

/// Observer of the cursor marker.
///
/// Observation starts lazily (the bus calls [`observe`](Self::observe) when
/// its first subscriber arrives) and ends on [`disconnect`](Self::disconnect).
pub struct CursorSource {
	surface: Arc<dyn CursorSurface>,
	cursor_line_class: Arc<str>,
	observation: Option<Box<dyn MarkerObservation>>,
}

impl CursorSource {
	pub fn new(surface: Arc<dyn CursorSurface>) -> Self {
		Self::with_class(surface, DEFAULT_CURSOR_LINE_CLASS)
	}

	pub fn with_class(surface: Arc<dyn CursorSurface>, cursor_line_class: &str) -> Self {
		Self {
			surface,
			cursor_line_class: Arc::from(cursor_line_class),
			observation: None,
		}
	}

	/// Starts observing the marker unless already observing.
	///
	/// Returns whether an observation is active afterwards. A missing marker
	/// is not an error; the next call tries again.
	pub fn observe(&mut self) -> bool {
		if self.observation.is_some() {
			return true;
		}
		match self.surface.observe_marker() {
			Some(observation) => {
				tracing::debug!("cursor.observe");
				self.observation = Some(observation);
				true
			}
			None => {
				tracing::debug!("cursor.observe.no_marker");
				false
			}
		}
	}

	/// Stops observing. No-op when not observing.
	pub fn disconnect(&mut self) {
		if let Some(mut observation) = self.observation.take() {
			observation.disconnect();
			tracing::debug!("cursor.disconnect");
		}
	}

	pub fn is_observing(&self) -> bool {
		self.observation.is_some()
	}

	/// Id of the line currently holding the cursor.
	///
	/// `None` when the lines container is missing or no line is flagged.
	pub fn current_line(&self) -> Option<Arc<str>> {
		let lines = self.surface.lines()?;
		find_cursor_line(&lines, &self.cursor_line_class).map(Arc::from)
	}
}

impl Drop for CursorSource {
	fn drop(&mut self) {
		self.disconnect();
	}
}

/// Scans `lines` in order for the first one carrying `class`.
pub fn find_cursor_line<'a>(lines: &'a [LineNode], class: &str) -> Option<&'a str> {
	lines.iter().find(|line| line.has_class(class)).map(LineNode::line_id)
}
