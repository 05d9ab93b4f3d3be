use std::fmt;
use std::sync::Arc;

use affix_cursor::{CursorBus, CursorSource};
use affix_history::EditHistory;
use affix_primitives::{
	ActionEvent, ActionName, Clipboard, CursorSurface, Dialog, DocumentHost, HostError, RegionId,
};
use affix_registry::{AttachmentRegistry, RescanReport};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::paste::paste_action;

/// Host-side collaborators a session is built from.
#[derive(Clone)]
pub struct Collaborators {
	pub document: Arc<dyn DocumentHost>,
	pub cursor: Arc<dyn CursorSurface>,
	pub dialog: Arc<dyn Dialog>,
	pub clipboard: Arc<dyn Clipboard>,
}

/// Long-lived owner of the cursor bus, registry, and edit history.
///
/// The host forwards its lifecycle signals to the `on_*` methods. Nothing in
/// here observes the host on its own.
pub struct Session {
	config: SessionConfig,
	bus: CursorBus,
	registry: AttachmentRegistry,
	history: EditHistory,
	dialog: Arc<dyn Dialog>,
	clipboard: Arc<dyn Clipboard>,
}

impl Session {
	pub fn new(config: SessionConfig, collaborators: Collaborators) -> Self {
		let Collaborators {
			document,
			cursor,
			dialog,
			clipboard,
		} = collaborators;
		let source = CursorSource::with_class(cursor, &config.cursor.cursor_line_class);
		let bus = CursorBus::new(source);
		let registry = AttachmentRegistry::new(document, bus.clone());
		let history = EditHistory::new(registry.clone(), dialog.clone(), config.history.options());
		tracing::debug!(
			cursor_line_class = %config.cursor.cursor_line_class,
			undo = %config.history.name,
			paste = config.paste.enabled,
			"session.new"
		);
		Self {
			config,
			bus,
			registry,
			history,
			dialog,
			clipboard,
		}
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	pub fn bus(&self) -> &CursorBus {
		&self.bus
	}

	pub fn registry(&self) -> &AttachmentRegistry {
		&self.registry
	}

	pub fn history(&self) -> &EditHistory {
		&self.history
	}

	/// The cursor marker changed.
	pub async fn on_marker_mutation(&self) {
		self.bus.on_marker_mutation().await;
	}

	/// The document's content changed.
	///
	/// Rescans when global attachment armed it and the config allows it.
	/// History for regions that disappeared is forgotten, and the cursor line
	/// is reconciled again when the region set moved.
	pub async fn on_content_changed(&self) -> Result<Option<RescanReport>, HostError> {
		if !self.config.registry.rescan_on_content_change {
			return Ok(None);
		}
		let Some(report) = self.registry.on_content_changed().await? else {
			return Ok(None);
		};
		self.settle_rescan(&report).await;
		Ok(Some(report))
	}

	/// Navigation to another document in the same context.
	///
	/// Per-region state and history are discarded; global actions are
	/// carried over to the new document.
	pub async fn on_document_transition(&self) -> Result<Option<RescanReport>, HostError> {
		tracing::debug!("session.document_transition");
		self.bus.disconnect_all();
		self.history.clear();
		let report = self.registry.on_document_transition().await?;
		if let Some(report) = &report {
			self.forget_dropped(report);
			self.bus.notify().await;
		}
		Ok(report)
	}

	/// Switch to another context; every component starts over.
	pub fn on_context_transition(&self) {
		tracing::debug!("session.context_transition");
		self.bus.disconnect_all();
		self.registry.on_context_transition();
		self.history.clear();
	}

	/// Attaches the paste action to every region.
	///
	/// Returns `Ok(None)` when paste is disabled in the config.
	pub async fn install_paste_action(&self) -> Result<Option<RescanReport>, HostError> {
		if !self.config.paste.enabled {
			tracing::debug!("session.paste.disabled");
			return Ok(None);
		}
		let action = paste_action(
			&self.config.paste,
			self.history.downgrade(),
			self.clipboard.clone(),
			self.dialog.clone(),
		);
		let report = self.registry.attach_to_all_regions([action]).await?;
		self.forget_dropped(&report);
		self.bus.notify().await;
		Ok(Some(report))
	}

	/// Detaches the paste action from every region.
	pub fn remove_paste_action(&self) -> bool {
		self.registry
			.detach_from_all_regions(&[ActionName::new(&self.config.paste.name)])
	}

	/// Runs the effective action `name` on `region`, as a click on its
	/// affordance would.
	pub async fn invoke(&self, region: &RegionId, name: &str, event: ActionEvent) -> Result<(), SessionError> {
		let target = self
			.registry
			.region(region)
			.ok_or_else(|| SessionError::UnknownRegion(region.clone()))?;
		let action = self
			.registry
			.effective_actions_for(region)
			.and_then(|actions| actions.into_iter().find(|a| a.name().as_str() == name))
			.ok_or_else(|| SessionError::UnknownAction {
				region: region.clone(),
				name: ActionName::new(name),
			})?;
		tracing::debug!(region = %region, action = name, ?event, "session.invoke");
		action.invoke(event, target).await?;
		Ok(())
	}
}

impl Session {
	/// Forgets history for regions a rescan no longer found, keeping undo
	/// attached exactly where history exists.
	fn forget_dropped(&self, report: &RescanReport) -> usize {
		let forgotten = self.history.forget(&report.dropped);
		if forgotten > 0 {
			tracing::debug!(forgotten, "session.history_pruned");
		}
		forgotten
	}

	/// Prunes history after a rescan and reconciles again when the region
	/// set moved.
	async fn settle_rescan(&self, report: &RescanReport) {
		self.forget_dropped(report);
		if !report.added.is_empty() || !report.dropped.is_empty() {
			self.bus.notify().await;
		}
	}
}

impl fmt::Debug for Session {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Session")
			.field("bus", &self.bus)
			.field("registry", &self.registry)
			.field("history", &self.history)
			.finish()
	}
}
