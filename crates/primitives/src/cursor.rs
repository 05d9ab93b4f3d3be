use std::sync::Arc;

use crate::ids::RegionId;

/// Logical cursor position, computed once per marker mutation and shared
/// read-only by every handler of that notification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CursorNotification {
	pub cursor_line_id: Option<Arc<str>>,
}

impl CursorNotification {
	pub fn new(cursor_line_id: Option<Arc<str>>) -> Self {
		Self { cursor_line_id }
	}

	/// Notification for a cursor sitting on `line`.
	pub fn at(line: impl AsRef<str>) -> Self {
		Self::new(Some(Arc::from(line.as_ref())))
	}

	/// Notification for a cursor outside any trackable line.
	pub fn nowhere() -> Self {
		Self::default()
	}

	/// Returns `true` if the cursor sits on the line heading `region`.
	pub fn is_on(&self, region: &RegionId) -> bool {
		self.cursor_line_id.as_deref() == Some(region.as_str())
	}
}

/// One child of the host's lines container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNode {
	/// Element id, a one-character prefix followed by the line id.
	pub element_id: String,
	pub classes: Vec<String>,
}

impl LineNode {
	pub fn new<I, S>(element_id: impl Into<String>, classes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			element_id: element_id.into(),
			classes: classes.into_iter().map(Into::into).collect(),
		}
	}

	pub fn has_class(&self, class: &str) -> bool {
		self.classes.iter().any(|c| c == class)
	}

	/// Line id with the element prefix stripped.
	pub fn line_id(&self) -> &str {
		let mut chars = self.element_id.chars();
		chars.next();
		chars.as_str()
	}
}

/// Live handle on an attribute observation of the cursor marker.
pub trait MarkerObservation: Send {
	/// Stops delivering mutations. Calling it twice is harmless.
	fn disconnect(&mut self);
}

/// Host view of the cursor marker and the lines container.
pub trait CursorSurface: Send + Sync {
	/// Starts observing the marker; `None` when there is no marker to observe.
	fn observe_marker(&self) -> Option<Box<dyn MarkerObservation>>;

	/// Ordered children of the lines container, `None` if it is absent.
	fn lines(&self) -> Option<Vec<LineNode>>;
}
