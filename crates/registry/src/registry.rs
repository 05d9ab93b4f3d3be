use std::fmt;
use std::sync::{Arc, Weak};

use affix_cursor::{CursorBus, SubscriptionId};
use affix_primitives::{Action, ActionName, CursorNotification, DocumentHost, HostError, Region, RegionId};
use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

use crate::entry::{AttachmentEntry, merge_by_name, remove_by_name};
use crate::reconcile::{effective_actions, reconcile_region};

/// Result of a per-region attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
	Attached,
	/// The region belongs to a context that is no longer active; nothing changed.
	Stale,
}

/// What a rescan did to the set of known regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RescanReport {
	/// Regions known after the rescan.
	pub live: usize,
	/// Regions seen for the first time.
	pub added: Vec<RegionId>,
	/// Regions that disappeared from the document.
	pub dropped: Vec<RegionId>,
}

type EntryMap = IndexMap<RegionId, AttachmentEntry, FxBuildHasher>;

#[derive(Default)]
struct RegistryState {
	entries: EntryMap,
	global: Vec<Action>,
	global_retired: Vec<ActionName>,
	subscription: Option<SubscriptionId>,
	/// Content-change signals trigger a rescan once global attachment began.
	rescan_armed: bool,
	/// Bumped by every transition; async work started in an older epoch is dropped.
	epoch: u64,
}

struct RegistryInner {
	host: Arc<dyn DocumentHost>,
	bus: CursorBus,
	state: Mutex<RegistryState>,
}

/// Registry of actions attached to regions of the open document.
///
/// Cheap to clone; clones share state. All mutation happens under a short
/// lock that is never held across an await, and every mutation leaves entries
/// unique per region id.
#[derive(Clone)]
pub struct AttachmentRegistry {
	inner: Arc<RegistryInner>,
}

impl AttachmentRegistry {
	pub fn new(host: Arc<dyn DocumentHost>, bus: CursorBus) -> Self {
		Self {
			inner: Arc::new(RegistryInner {
				host,
				bus,
				state: Mutex::new(RegistryState::default()),
			}),
		}
	}

	/// Returns `true` if `region` belongs to the host's active context.
	pub fn is_active(&self, region: &Region) -> bool {
		self.inner.host.active_context().as_ref() == Some(&region.context)
	}

	/// Attaches `actions` to one region, merging by name.
	///
	/// Stale regions are ignored. The reconciliation handler is subscribed on
	/// first use.
	pub fn attach_to_region(&self, actions: impl IntoIterator<Item = Action>, region: &Region) -> AttachOutcome {
		if !self.is_active(region) {
			tracing::debug!(region = %region.id, context = %region.context, "registry.attach.stale");
			return AttachOutcome::Stale;
		}
		{
			let mut state = self.inner.state.lock();
			let entry = state
				.entries
				.entry(region.id.clone())
				.or_insert_with(|| AttachmentEntry::new(region.clone()));
			entry.merge(actions);
			tracing::debug!(region = %region.id, actions = entry.actions().len(), "registry.attach");
		}
		self.ensure_subscription();
		AttachOutcome::Attached
	}

	/// Attaches `actions` to every region, including ones that appear later.
	///
	/// Arms content-change rescans and runs one immediately. The actions stay
	/// attached even if that rescan fails.
	pub async fn attach_to_all_regions(&self, actions: impl IntoIterator<Item = Action>) -> Result<RescanReport, HostError> {
		{
			let mut state = self.inner.state.lock();
			let RegistryState { global, global_retired, .. } = &mut *state;
			merge_by_name(global, global_retired, actions);
			state.rescan_armed = true;
			tracing::debug!(actions = state.global.len(), "registry.attach_all");
		}
		self.ensure_subscription();
		self.rescan().await
	}

	/// Detaches actions from one region by name. Returns `false` if none were attached.
	pub fn detach_from_region(&self, names: &[ActionName], region: &Region) -> bool {
		let mut state = self.inner.state.lock();
		let Some(entry) = state.entries.get_mut(&region.id) else {
			return false;
		};
		let removed = entry.remove(names);
		if removed > 0 {
			tracing::debug!(region = %region.id, removed, "registry.detach");
		}
		removed > 0
	}

	/// Detaches globally attached actions by name; per-region attachments stay.
	pub fn detach_from_all_regions(&self, names: &[ActionName]) -> bool {
		let mut state = self.inner.state.lock();
		let RegistryState { global, global_retired, .. } = &mut *state;
		let removed = remove_by_name(global, global_retired, names);
		if removed > 0 {
			tracing::debug!(removed, "registry.detach_all");
		}
		removed > 0
	}

	/// Resynchronizes entries with the regions the document currently has.
	///
	/// Existing entries keep their actions; regions the document no longer
	/// reports are dropped. A transition during discovery voids the result.
	pub async fn rescan(&self) -> Result<RescanReport, HostError> {
		let Some(context) = self.inner.host.active_context() else {
			tracing::debug!("registry.rescan.no_document");
			return Ok(RescanReport::default());
		};
		let epoch = self.inner.state.lock().epoch;

		let regions = match self.inner.host.discover_regions(&context).await {
			Ok(regions) => regions,
			Err(error) => {
				tracing::warn!(%error, "registry.rescan.failed");
				return Err(error);
			}
		};

		let mut state = self.inner.state.lock();
		if state.epoch != epoch {
			tracing::debug!(epoch, current = state.epoch, "registry.rescan.stale");
			return Ok(RescanReport::default());
		}

		let mut previous = std::mem::take(&mut state.entries);
		let mut report = RescanReport::default();
		for region in regions {
			if region.context != context || state.entries.contains_key(&region.id) {
				continue;
			}
			let entry = match previous.swap_remove(&region.id) {
				Some(mut entry) => {
					entry.set_region(region);
					entry
				}
				None => {
					report.added.push(region.id.clone());
					AttachmentEntry::new(region)
				}
			};
			state.entries.insert(entry.region().id.clone(), entry);
		}
		report.dropped = previous.into_keys().collect();
		report.live = state.entries.len();
		tracing::debug!(
			live = report.live,
			added = report.added.len(),
			dropped = report.dropped.len(),
			"registry.rescan"
		);
		Ok(report)
	}

	/// Handles the document's content-changed signal.
	///
	/// Rescans only once global attachment has armed it; otherwise `Ok(None)`.
	pub async fn on_content_changed(&self) -> Result<Option<RescanReport>, HostError> {
		if !self.inner.state.lock().rescan_armed {
			return Ok(None);
		}
		self.rescan().await.map(Some)
	}

	/// Handles navigation to another document.
	///
	/// Per-region entries are cleared. Global actions survive; when there are
	/// any, the registry resubscribes and rescans the new document.
	pub async fn on_document_transition(&self) -> Result<Option<RescanReport>, HostError> {
		let resume = {
			let mut state = self.inner.state.lock();
			state.epoch += 1;
			state.entries.clear();
			self.drop_subscription(&mut state);
			tracing::debug!(epoch = state.epoch, globals = state.global.len(), "registry.document_transition");
			!state.global.is_empty()
		};
		if !resume {
			return Ok(None);
		}
		self.ensure_subscription();
		self.rescan().await.map(Some)
	}

	/// Handles a context (project) switch: everything is cleared.
	pub fn on_context_transition(&self) {
		let mut state = self.inner.state.lock();
		state.epoch += 1;
		state.entries.clear();
		state.global.clear();
		state.global_retired.clear();
		state.rescan_armed = false;
		self.drop_subscription(&mut state);
		tracing::debug!(epoch = state.epoch, "registry.context_transition");
	}

	/// Reconciles every known region against `notification`.
	pub fn reconcile_all(&self, notification: &CursorNotification) {
		let (plans, global_retired) = {
			let state = self.inner.state.lock();
			let plans: Vec<_> = state
				.entries
				.values()
				.map(|entry| {
					let effective = effective_actions(&state.global, entry.actions());
					let mut retired = entry.retired().to_vec();
					for name in &state.global_retired {
						if !retired.contains(name) {
							retired.push(name.clone());
						}
					}
					(entry.region().clone(), effective, retired, entry.retired().to_vec())
				})
				.collect();
			(plans, state.global_retired.clone())
		};

		let mut settled = Vec::new();
		let mut all_rendered = true;
		for (region, effective, retired, local_retired) in &plans {
			let outcome = reconcile_region(notification, region, effective, retired, self.inner.host.as_ref());
			match outcome {
				Some(_) if !local_retired.is_empty() => settled.push((region.id.clone(), local_retired)),
				Some(_) => {}
				None => all_rendered = false,
			}
		}

		// Global retirements are kept until one pass reached every slot.
		let settle_global = all_rendered && !global_retired.is_empty();
		if settled.is_empty() && !settle_global {
			return;
		}
		let mut state = self.inner.state.lock();
		for (id, applied) in settled {
			if let Some(entry) = state.entries.get_mut(&id) {
				entry.settle(applied);
			}
		}
		if settle_global {
			state.global_retired.retain(|name| !global_retired.contains(name));
		}
	}

	pub fn region_ids(&self) -> Vec<RegionId> {
		self.inner.state.lock().entries.keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.inner.state.lock().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.state.lock().entries.is_empty()
	}

	/// The region value last seen for `id`.
	pub fn region(&self, id: &RegionId) -> Option<Region> {
		self.inner.state.lock().entries.get(id).map(|e| e.region().clone())
	}

	/// Per-region actions for `region`, `None` if the region is unknown.
	pub fn actions_for(&self, region: &RegionId) -> Option<Vec<Action>> {
		self.inner.state.lock().entries.get(region).map(|e| e.actions().to_vec())
	}

	/// Global plus per-region actions as they would be rendered.
	pub fn effective_actions_for(&self, region: &RegionId) -> Option<Vec<Action>> {
		let state = self.inner.state.lock();
		let entry = state.entries.get(region)?;
		Some(effective_actions(&state.global, entry.actions()))
	}

	/// Returns `true` if `name` is attached to `region` itself (not globally).
	pub fn has_action(&self, region: &RegionId, name: &str) -> bool {
		self.inner
			.state
			.lock()
			.entries
			.get(region)
			.is_some_and(|e| e.actions().iter().any(|a| a.name().as_str() == name))
	}

	pub fn global_actions(&self) -> Vec<Action> {
		self.inner.state.lock().global.clone()
	}

	/// Returns `true` while the reconciliation handler is subscribed.
	pub fn is_subscribed(&self) -> bool {
		self.inner.state.lock().subscription.is_some()
	}

	pub fn bus(&self) -> &CursorBus {
		&self.inner.bus
	}

	pub fn host(&self) -> &Arc<dyn DocumentHost> {
		&self.inner.host
	}

	fn ensure_subscription(&self) {
		if self.inner.state.lock().subscription.is_some() {
			return;
		}
		let weak: Weak<RegistryInner> = Arc::downgrade(&self.inner);
		let id = self.inner.bus.subscribe(move |notification| {
			if let Some(inner) = weak.upgrade() {
				AttachmentRegistry { inner }.reconcile_all(&notification);
			}
			async {}
		});

		let mut state = self.inner.state.lock();
		if state.subscription.is_some() {
			// Lost a race with another subscriber; keep exactly one.
			drop(state);
			self.inner.bus.unsubscribe(id);
			return;
		}
		state.subscription = Some(id);
	}

	fn drop_subscription(&self, state: &mut RegistryState) {
		if let Some(id) = state.subscription.take() {
			self.inner.bus.unsubscribe(id);
		}
	}
}

impl fmt::Debug for AttachmentRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.inner.state.lock();
		f.debug_struct("AttachmentRegistry")
			.field("regions", &state.entries.len())
			.field("global", &state.global.len())
			.field("subscribed", &state.subscription.is_some())
			.field("epoch", &state.epoch)
			.finish()
	}
}

/// Debug check used by tests: no two entries share an id.
#[cfg(test)]
pub(crate) fn ids_are_unique(registry: &AttachmentRegistry) -> bool {
	let ids = registry.region_ids();
	let set: rustc_hash::FxHashSet<_> = ids.iter().collect();
	set.len() == ids.len()
}
