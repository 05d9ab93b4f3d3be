use std::fmt;
use std::sync::{Arc, Weak};

use affix_primitives::{Action, ActionError, ConfirmKind, Dialog, Region, RegionId};
use affix_registry::{AttachOutcome, AttachmentRegistry};
use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

use crate::error::HistoryError;
use crate::options::HistoryOptions;

/// Content a region held before its last destructive write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
	pub previous_content: String,
	pub target: Region,
	revision: u64,
}

impl HistoryEntry {
	/// Monotonic stamp of the record that produced this entry.
	pub fn revision(&self) -> u64 {
		self.revision
	}
}

/// Result of recording a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
	/// First entry for the region.
	Recorded,
	/// An older entry for the region was overwritten in place.
	Replaced,
	/// The region belongs to an inactive context; nothing was recorded.
	Stale,
}

/// Result of a revert request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertOutcome {
	/// The snapshot was written back and the entry removed.
	Reverted,
	/// The user declined the confirmation; nothing changed.
	Declined,
	/// No entry exists for the region.
	NoHistory,
	/// The region's context stopped being active.
	Stale,
	/// The entry was replaced or cleared while the revert was suspended.
	Superseded,
}

type EntryMap = IndexMap<RegionId, HistoryEntry, FxBuildHasher>;

#[derive(Default)]
struct HistoryState {
	entries: EntryMap,
	next_revision: u64,
}

struct HistoryInner {
	registry: AttachmentRegistry,
	dialog: Arc<dyn Dialog>,
	options: HistoryOptions,
	undo: Action,
	state: Mutex<HistoryState>,
}

/// Single-level undo history keyed by region id.
///
/// Every entry is mirrored by the undo action attached to its region. Cheap
/// to clone; clones share state. The undo action holds only a weak handle, so
/// dropping every `EditHistory` turns it into a no-op that reports
/// [`HistoryError::Detached`].
#[derive(Clone)]
pub struct EditHistory {
	inner: Arc<HistoryInner>,
}

/// Non-owning handle to an [`EditHistory`].
#[derive(Clone)]
pub struct WeakEditHistory {
	inner: Weak<HistoryInner>,
}

impl WeakEditHistory {
	pub fn upgrade(&self) -> Option<EditHistory> {
		self.inner.upgrade().map(|inner| EditHistory { inner })
	}
}

impl EditHistory {
	pub fn new(registry: AttachmentRegistry, dialog: Arc<dyn Dialog>, options: HistoryOptions) -> Self {
		let inner = Arc::new_cyclic(|weak: &Weak<HistoryInner>| {
			let history = WeakEditHistory { inner: weak.clone() };
			let undo = Action::new(options.undo_name.clone(), options.undo_icon.clone(), move |_event, region| {
				let history = history.clone();
				async move {
					let history = history.upgrade().ok_or(HistoryError::Detached)?;
					history.revert(&region).await?;
					Ok::<(), ActionError>(())
				}
			});
			HistoryInner {
				registry,
				dialog,
				options,
				undo,
				state: Mutex::new(HistoryState::default()),
			}
		});
		Self { inner }
	}

	pub fn downgrade(&self) -> WeakEditHistory {
		WeakEditHistory {
			inner: Arc::downgrade(&self.inner),
		}
	}

	/// The undo action this history attaches to regions.
	pub fn undo_action(&self) -> &Action {
		&self.inner.undo
	}

	pub fn registry(&self) -> &AttachmentRegistry {
		&self.inner.registry
	}

	/// Reads `region`'s current content and records it.
	pub async fn record(&self, region: &Region) -> Result<RecordOutcome, HistoryError> {
		if !self.inner.registry.is_active(region) {
			tracing::debug!(region = %region.id, "history.record.stale");
			return Ok(RecordOutcome::Stale);
		}
		let previous = self.read(region).await?;
		Ok(self.record_content(region, previous).await)
	}

	/// Records `previous` as `region`'s snapshot, attaches undo, and pushes a
	/// cursor notification so the affordance shows without waiting for a move.
	pub async fn record_content(&self, region: &Region, previous: String) -> RecordOutcome {
		if !self.inner.registry.is_active(region) {
			tracing::debug!(region = %region.id, "history.record.stale");
			return RecordOutcome::Stale;
		}

		let (outcome, revision) = {
			let mut state = self.inner.state.lock();
			state.next_revision += 1;
			let revision = state.next_revision;
			let entry = HistoryEntry {
				previous_content: previous,
				target: region.clone(),
				revision,
			};
			let outcome = match state.entries.insert(region.id.clone(), entry) {
				Some(_) => RecordOutcome::Replaced,
				None => RecordOutcome::Recorded,
			};
			(outcome, revision)
		};

		if self.inner.registry.attach_to_region([self.inner.undo.clone()], region) == AttachOutcome::Stale {
			self.drop_if_current(&region.id, revision);
			tracing::debug!(region = %region.id, "history.record.stale");
			return RecordOutcome::Stale;
		}

		tracing::debug!(region = %region.id, revision, ?outcome, "history.record");
		self.inner.registry.bus().notify().await;
		outcome
	}

	/// Writes `content` into `region` and records what it replaced.
	///
	/// A failed read or write leaves history and the registry untouched.
	pub async fn replace(&self, region: &Region, content: &str) -> Result<RecordOutcome, HistoryError> {
		if !self.inner.registry.is_active(region) {
			tracing::debug!(region = %region.id, "history.replace.stale");
			return Ok(RecordOutcome::Stale);
		}
		let previous = self.read(region).await?;
		if let Err(error) = self.inner.registry.host().write_region_content(content, region).await {
			tracing::warn!(region = %region.id, %error, "history.replace.write_failed");
			return Err(error.into());
		}
		Ok(self.record_content(region, previous).await)
	}

	/// Restores `region`'s snapshot.
	///
	/// Asks for confirmation when the content changed since the snapshot was
	/// taken. The entry is removed and undo detached only once the write-back
	/// succeeded.
	pub async fn revert(&self, region: &Region) -> Result<RevertOutcome, HistoryError> {
		if !self.inner.registry.is_active(region) {
			tracing::debug!(region = %region.id, "history.revert.stale");
			return Ok(RevertOutcome::Stale);
		}
		let Some(entry) = self.entry(&region.id) else {
			tracing::debug!(region = %region.id, "history.revert.none");
			return Ok(RevertOutcome::NoHistory);
		};

		let current = self.read(region).await?;
		if current != entry.previous_content {
			let options = &self.inner.options;
			let answer = self
				.inner
				.dialog
				.confirm(ConfirmKind::OkCancel, &options.confirm_title, &options.confirm_body)
				.await;
			if !answer.is_ok() {
				tracing::debug!(region = %region.id, "history.revert.declined");
				return Ok(RevertOutcome::Declined);
			}
		}

		if let Some(outcome) = self.check_resumed(region, entry.revision) {
			return Ok(outcome);
		}
		if let Err(error) = self
			.inner
			.registry
			.host()
			.write_region_content(&entry.previous_content, region)
			.await
		{
			tracing::warn!(region = %region.id, %error, "history.revert.write_failed");
			return Err(error.into());
		}

		if self.drop_if_current(&region.id, entry.revision) {
			self.inner
				.registry
				.detach_from_region(std::slice::from_ref(self.inner.undo.name()), region);
		} else {
			tracing::debug!(region = %region.id, "history.revert.rerecorded");
		}
		tracing::debug!(region = %region.id, revision = entry.revision, "history.revert");
		self.inner.registry.bus().notify().await;
		Ok(RevertOutcome::Reverted)
	}

	/// Drops entries for `regions` and detaches their undo actions.
	///
	/// Used when regions disappear from the document. Returns how many
	/// entries were removed.
	pub fn forget(&self, regions: &[RegionId]) -> usize {
		let removed: Vec<HistoryEntry> = {
			let mut state = self.inner.state.lock();
			regions.iter().filter_map(|id| state.entries.shift_remove(id)).collect()
		};
		let names = std::slice::from_ref(self.inner.undo.name());
		for entry in &removed {
			self.inner.registry.detach_from_region(names, &entry.target);
		}
		if !removed.is_empty() {
			tracing::debug!(removed = removed.len(), "history.forget");
		}
		removed.len()
	}

	/// Drops every entry without touching the registry.
	///
	/// Callers pair this with a registry transition that already discarded
	/// the per-region attachments.
	pub fn clear(&self) {
		let mut state = self.inner.state.lock();
		let cleared = state.entries.len();
		state.entries.clear();
		if cleared > 0 {
			tracing::debug!(cleared, "history.clear");
		}
	}

	pub fn entry(&self, region: &RegionId) -> Option<HistoryEntry> {
		self.inner.state.lock().entries.get(region).cloned()
	}

	pub fn len(&self) -> usize {
		self.inner.state.lock().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.state.lock().entries.is_empty()
	}

	/// Regions with history, in first-record order.
	pub fn region_ids(&self) -> Vec<RegionId> {
		self.inner.state.lock().entries.keys().cloned().collect()
	}

	async fn read(&self, region: &Region) -> Result<String, HistoryError> {
		self.inner
			.registry
			.host()
			.read_region_content(region)
			.await
			.map_err(|error| {
				tracing::warn!(region = %region.id, %error, "history.read_failed");
				HistoryError::from(error)
			})
	}

	/// Re-validates a suspended revert against the current state.
	fn check_resumed(&self, region: &Region, revision: u64) -> Option<RevertOutcome> {
		if !self.inner.registry.is_active(region) {
			tracing::debug!(region = %region.id, "history.revert.stale");
			return Some(RevertOutcome::Stale);
		}
		let current = self.inner.state.lock().entries.get(&region.id).map(HistoryEntry::revision);
		if current != Some(revision) {
			tracing::debug!(region = %region.id, revision, ?current, "history.revert.superseded");
			return Some(RevertOutcome::Superseded);
		}
		None
	}

	/// Removes `region`'s entry if it is still the one stamped `revision`.
	fn drop_if_current(&self, region: &RegionId, revision: u64) -> bool {
		let mut state = self.inner.state.lock();
		if state.entries.get(region).map(HistoryEntry::revision) != Some(revision) {
			return false;
		}
		state.entries.shift_remove(region);
		true
	}
}

impl fmt::Debug for EditHistory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EditHistory")
			.field("entries", &self.len())
			.field("undo", self.inner.undo.name())
			.finish()
	}
}
