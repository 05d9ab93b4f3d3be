//! In-memory collaborators for tests.
//!
//! Each double records what the core asked of it so tests can assert on the
//! conversation as well as on the resulting state. Hooks run synchronously
//! inside the corresponding async call, which is how tests inject work that
//! lands "while" the core is suspended.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::affordance::{Affordance, AttachmentSlot};
use crate::cursor::{CursorSurface, LineNode, MarkerObservation};
use crate::error::HostError;
use crate::host::{Clipboard, ConfirmKind, Dialog, DialogAnswer, DocumentHost};
use crate::ids::{ActionName, DocumentContext, RegionId};
use crate::region::Region;

type Hook = Box<dyn Fn() + Send + Sync>;

/// Slot that keeps affordances in a vector.
#[derive(Default)]
pub struct FakeSlot {
	items: Mutex<Vec<Affordance>>,
	appended: AtomicUsize,
	removed: AtomicUsize,
}

impl FakeSlot {
	pub fn new() -> Self {
		Self::default()
	}

	/// Rendered names as plain strings, in display order.
	pub fn names(&self) -> Vec<String> {
		self.items.lock().iter().map(|a| a.name().to_string()).collect()
	}

	pub fn affordance(&self, name: &str) -> Option<Affordance> {
		self.items.lock().iter().find(|a| a.name().as_str() == name).cloned()
	}

	/// Total appends since creation.
	pub fn appended(&self) -> usize {
		self.appended.load(Ordering::SeqCst)
	}

	/// Total removals since creation.
	pub fn removed(&self) -> usize {
		self.removed.load(Ordering::SeqCst)
	}
}

impl AttachmentSlot for FakeSlot {
	fn rendered(&self) -> Vec<ActionName> {
		self.items.lock().iter().map(|a| a.name().clone()).collect()
	}

	fn append(&self, affordance: Affordance) {
		self.appended.fetch_add(1, Ordering::SeqCst);
		self.items.lock().push(affordance);
	}

	fn remove(&self, name: &ActionName) -> usize {
		let mut items = self.items.lock();
		let before = items.len();
		items.retain(|a| a.name() != name);
		let removed = before - items.len();
		self.removed.fetch_add(removed, Ordering::SeqCst);
		removed
	}
}

#[derive(Default)]
struct DocState {
	context: Option<DocumentContext>,
	regions: Vec<Region>,
	contents: FxHashMap<RegionId, String>,
	slots: FxHashMap<RegionId, Arc<FakeSlot>>,
	hidden: FxHashSet<RegionId>,
	fail_reads: bool,
	fail_writes: bool,
	fail_discovery: bool,
	writes: Vec<(RegionId, String)>,
	discover_calls: usize,
}

/// Document with regions, contents, and one slot per region.
#[derive(Default)]
pub struct FakeDocument {
	state: Mutex<DocState>,
	on_discover: Mutex<Option<Hook>>,
	on_read: Mutex<Option<Hook>>,
}

impl FakeDocument {
	pub fn new(context: DocumentContext) -> Self {
		let doc = Self::default();
		doc.state.lock().context = Some(context);
		doc
	}

	pub fn context(&self) -> Option<DocumentContext> {
		self.state.lock().context.clone()
	}

	/// Switches the active context and drops every region of the old one.
	pub fn open(&self, context: Option<DocumentContext>) {
		let mut state = self.state.lock();
		state.context = context;
		state.regions.clear();
		state.contents.clear();
		state.slots.clear();
		state.hidden.clear();
	}

	/// Adds a region in the active context with empty content and a fresh slot.
	pub fn add_region(&self, id: &str) -> Region {
		let mut state = self.state.lock();
		let context = state
			.context
			.clone()
			.unwrap_or_else(|| DocumentContext::new("", ""));
		let region = Region::new(id, context);
		state.regions.retain(|r| r.id != region.id);
		state.regions.push(region.clone());
		state.contents.entry(region.id.clone()).or_default();
		state
			.slots
			.entry(region.id.clone())
			.or_insert_with(|| Arc::new(FakeSlot::new()));
		region
	}

	pub fn remove_region(&self, id: &str) {
		let mut state = self.state.lock();
		state.regions.retain(|r| r.id.as_str() != id);
		state.contents.remove(id);
		state.slots.remove(id);
	}

	pub fn set_content(&self, id: &str, content: &str) {
		self.state.lock().contents.insert(RegionId::new(id), content.to_string());
	}

	pub fn content(&self, id: &str) -> Option<String> {
		self.state.lock().contents.get(id).cloned()
	}

	pub fn slot(&self, id: &str) -> Option<Arc<FakeSlot>> {
		self.state.lock().slots.get(id).cloned()
	}

	/// Rendered names in `id`'s slot, empty when there is none.
	pub fn rendered(&self, id: &str) -> Vec<String> {
		self.slot(id).map(|s| s.names()).unwrap_or_default()
	}

	/// Hides or reveals a region's slot without touching its content.
	pub fn set_hidden(&self, id: &str, hidden: bool) {
		let mut state = self.state.lock();
		if hidden {
			state.hidden.insert(RegionId::new(id));
		} else {
			state.hidden.remove(id);
		}
	}

	pub fn fail_reads(&self, fail: bool) {
		self.state.lock().fail_reads = fail;
	}

	pub fn fail_writes(&self, fail: bool) {
		self.state.lock().fail_writes = fail;
	}

	pub fn fail_discovery(&self, fail: bool) {
		self.state.lock().fail_discovery = fail;
	}

	pub fn writes(&self) -> Vec<(RegionId, String)> {
		self.state.lock().writes.clone()
	}

	pub fn discover_calls(&self) -> usize {
		self.state.lock().discover_calls
	}

	/// Runs `hook` inside every discovery call, before the result is built.
	pub fn on_discover(&self, hook: impl Fn() + Send + Sync + 'static) {
		*self.on_discover.lock() = Some(Box::new(hook));
	}

	/// Runs `hook` inside every content read, before the content is returned.
	pub fn on_read(&self, hook: impl Fn() + Send + Sync + 'static) {
		*self.on_read.lock() = Some(Box::new(hook));
	}
}

#[async_trait]
impl DocumentHost for FakeDocument {
	fn active_context(&self) -> Option<DocumentContext> {
		self.state.lock().context.clone()
	}

	async fn discover_regions(&self, context: &DocumentContext) -> Result<Vec<Region>, HostError> {
		if let Some(hook) = self.on_discover.lock().as_ref() {
			hook();
		}
		let mut state = self.state.lock();
		state.discover_calls += 1;
		if state.fail_discovery {
			return Err(HostError::Discovery("discovery disabled".into()));
		}
		Ok(state
			.regions
			.iter()
			.filter(|r| &r.context == context)
			.cloned()
			.collect())
	}

	fn find_attachment_slot(&self, region: &RegionId) -> Option<Arc<dyn AttachmentSlot>> {
		let state = self.state.lock();
		if state.hidden.contains(region) {
			return None;
		}
		state
			.slots
			.get(region)
			.map(|slot| slot.clone() as Arc<dyn AttachmentSlot>)
	}

	async fn read_region_content(&self, region: &Region) -> Result<String, HostError> {
		if let Some(hook) = self.on_read.lock().as_ref() {
			hook();
		}
		let state = self.state.lock();
		if state.fail_reads {
			return Err(HostError::Read {
				region: region.id.clone(),
				reason: "reads disabled".into(),
			});
		}
		state
			.contents
			.get(&region.id)
			.cloned()
			.ok_or_else(|| HostError::RegionNotFound(region.id.clone()))
	}

	async fn write_region_content(&self, content: &str, region: &Region) -> Result<(), HostError> {
		let mut state = self.state.lock();
		if state.fail_writes {
			return Err(HostError::Write {
				region: region.id.clone(),
				reason: "writes disabled".into(),
			});
		}
		if !state.contents.contains_key(&region.id) {
			return Err(HostError::RegionNotFound(region.id.clone()));
		}
		state.contents.insert(region.id.clone(), content.to_string());
		state.writes.push((region.id.clone(), content.to_string()));
		Ok(())
	}
}

struct FakeObservation {
	active: Arc<AtomicUsize>,
	connected: bool,
}

impl MarkerObservation for FakeObservation {
	fn disconnect(&mut self) {
		if self.connected {
			self.connected = false;
			self.active.fetch_sub(1, Ordering::SeqCst);
		}
	}
}

#[derive(Default)]
struct SurfaceState {
	marker: bool,
	lines: Option<Vec<LineNode>>,
}

/// Cursor marker plus a lines container holding `L<id>` elements.
pub struct FakeCursorSurface {
	state: Mutex<SurfaceState>,
	cursor_class: String,
	active: Arc<AtomicUsize>,
	observe_calls: AtomicUsize,
}

impl FakeCursorSurface {
	/// Surface with a marker, an empty lines container, and the `cursor-line` class.
	pub fn new() -> Self {
		Self {
			state: Mutex::new(SurfaceState {
				marker: true,
				lines: Some(Vec::new()),
			}),
			cursor_class: "cursor-line".to_string(),
			active: Arc::new(AtomicUsize::new(0)),
			observe_calls: AtomicUsize::new(0),
		}
	}

	pub fn set_marker(&self, present: bool) {
		self.state.lock().marker = present;
	}

	/// Replaces the lines container contents; `None` removes the container.
	pub fn set_lines(&self, lines: Option<Vec<LineNode>>) {
		self.state.lock().lines = lines;
	}

	/// Lays out `ids` as lines and flags `cursor` (if any) as the active one.
	pub fn layout(&self, ids: &[&str], cursor: Option<&str>) {
		let lines = ids
			.iter()
			.map(|id| {
				let mut classes = vec!["line".to_string()];
				if Some(*id) == cursor {
					classes.push(self.cursor_class.clone());
				}
				LineNode::new(format!("L{id}"), classes)
			})
			.collect();
		self.set_lines(Some(lines));
	}

	/// Moves the active-line flag to `cursor`, keeping the current layout.
	pub fn move_cursor(&self, cursor: Option<&str>) {
		let mut state = self.state.lock();
		if let Some(lines) = state.lines.as_mut() {
			for line in lines.iter_mut() {
				line.classes.retain(|c| c != &self.cursor_class);
				if Some(line.line_id()) == cursor {
					line.classes.push(self.cursor_class.clone());
				}
			}
		}
	}

	/// Observations currently connected.
	pub fn active_observations(&self) -> usize {
		self.active.load(Ordering::SeqCst)
	}

	pub fn observe_calls(&self) -> usize {
		self.observe_calls.load(Ordering::SeqCst)
	}
}

impl Default for FakeCursorSurface {
	fn default() -> Self {
		Self::new()
	}
}

impl CursorSurface for FakeCursorSurface {
	fn observe_marker(&self) -> Option<Box<dyn MarkerObservation>> {
		self.observe_calls.fetch_add(1, Ordering::SeqCst);
		if !self.state.lock().marker {
			return None;
		}
		self.active.fetch_add(1, Ordering::SeqCst);
		Some(Box::new(FakeObservation {
			active: self.active.clone(),
			connected: true,
		}))
	}

	fn lines(&self) -> Option<Vec<LineNode>> {
		self.state.lock().lines.clone()
	}
}

/// One prompt shown through [`ScriptedDialog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
	pub kind: ConfirmKind,
	pub title: String,
	pub body: String,
}

/// Dialog answering from a queue; an empty queue answers OK.
#[derive(Default)]
pub struct ScriptedDialog {
	answers: Mutex<VecDeque<DialogAnswer>>,
	prompts: Mutex<Vec<Prompt>>,
	on_confirm: Mutex<Option<Hook>>,
}

impl ScriptedDialog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn answer(&self, answer: DialogAnswer) {
		self.answers.lock().push_back(answer);
	}

	pub fn prompts(&self) -> Vec<Prompt> {
		self.prompts.lock().clone()
	}

	/// Runs `hook` while the dialog is "open".
	pub fn on_confirm(&self, hook: impl Fn() + Send + Sync + 'static) {
		*self.on_confirm.lock() = Some(Box::new(hook));
	}
}

#[async_trait]
impl Dialog for ScriptedDialog {
	async fn confirm(&self, kind: ConfirmKind, title: &str, body: &str) -> DialogAnswer {
		self.prompts.lock().push(Prompt {
			kind,
			title: title.to_string(),
			body: body.to_string(),
		});
		if let Some(hook) = self.on_confirm.lock().as_ref() {
			hook();
		}
		self.answers.lock().pop_front().unwrap_or_else(DialogAnswer::ok)
	}
}

/// Clipboard holding either text or a failure reason.
pub struct FakeClipboard {
	contents: Mutex<Result<String, String>>,
}

impl FakeClipboard {
	pub fn with_text(text: &str) -> Self {
		Self {
			contents: Mutex::new(Ok(text.to_string())),
		}
	}

	pub fn denied() -> Self {
		Self {
			contents: Mutex::new(Err("permission denied".to_string())),
		}
	}

	pub fn set_text(&self, text: &str) {
		*self.contents.lock() = Ok(text.to_string());
	}

	/// Makes every later read fail, as a revoked permission would.
	pub fn deny(&self) {
		*self.contents.lock() = Err("permission denied".to_string());
	}
}

#[async_trait]
impl Clipboard for FakeClipboard {
	async fn read_text(&self) -> Result<String, HostError> {
		self.contents.lock().clone().map_err(HostError::Clipboard)
	}
}
