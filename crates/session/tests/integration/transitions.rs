use affix_primitives::{Action, DocumentContext, Icon, RegionId};
use pretty_assertions::assert_eq;

use crate::common::{context, harness};

fn noop(name: &str) -> Action {
	Action::new(name, Icon::default(), |_, _| async { Ok(()) })
}

#[tokio::test]
async fn document_transition_carries_globals_over() {
	let h = harness();
	let regions = h.regions(&[("L1", "a")]);
	h.session.install_paste_action().await.unwrap();
	h.session.history().record(&regions[0]).await.unwrap();

	h.doc.open(Some(context("next")));
	h.regions(&[("M1", ""), ("M2", "")]);
	let report = h.session.on_document_transition().await.unwrap().unwrap();

	assert_eq!(report.added, vec![RegionId::new("M1"), RegionId::new("M2")]);
	assert!(h.session.history().is_empty());
	assert_eq!(h.session.bus().subscriber_count(), 1);

	h.cursor_to(Some("M2")).await;
	assert_eq!(h.doc.rendered("M2"), vec!["Paste"]);
	assert!(h.doc.rendered("M1").is_empty());
}

#[tokio::test]
async fn document_transition_without_globals_goes_quiet() {
	let h = harness();
	let regions = h.regions(&[("L1", "a")]);
	h.session.registry().attach_to_region([noop("A")], &regions[0]);
	assert_eq!(h.session.bus().subscriber_count(), 1);

	h.doc.open(Some(context("next")));
	assert_eq!(h.session.on_document_transition().await.unwrap(), None);
	assert!(h.session.registry().is_empty());
	assert_eq!(h.session.bus().subscriber_count(), 0);
	assert!(!h.session.bus().is_observing());
	assert_eq!(h.surface.active_observations(), 0);
}

#[tokio::test]
async fn context_transition_resets_everything() {
	let h = harness();
	let regions = h.regions(&[("L1", "a")]);
	h.session.install_paste_action().await.unwrap();
	h.session.history().record(&regions[0]).await.unwrap();

	h.doc.open(Some(DocumentContext::new("P2", "page")));
	h.session.on_context_transition();

	assert!(h.session.registry().is_empty());
	assert!(h.session.registry().global_actions().is_empty());
	assert!(h.session.history().is_empty());
	assert_eq!(h.session.bus().subscriber_count(), 0);
	assert_eq!(h.surface.active_observations(), 0);

	h.regions(&[("N1", "")]);
	assert_eq!(h.session.on_content_changed().await.unwrap(), None);
}

#[tokio::test]
async fn stale_region_after_context_switch_is_ignored() {
	let h = harness();
	let regions = h.regions(&[("L1", "a")]);
	h.doc.open(Some(DocumentContext::new("P2", "page")));
	h.session.on_context_transition();

	h.session.registry().attach_to_region([noop("A")], &regions[0]);
	h.session.history().record(&regions[0]).await.unwrap();
	assert!(h.session.registry().is_empty());
	assert!(h.session.history().is_empty());
	assert_eq!(h.session.bus().subscriber_count(), 0);
}

#[tokio::test]
async fn observation_restarts_after_teardown() {
	let h = harness();
	h.regions(&[("L1", "")]);
	h.session.install_paste_action().await.unwrap();
	assert_eq!(h.surface.active_observations(), 1);

	h.session.on_context_transition();
	assert_eq!(h.surface.active_observations(), 0);

	h.regions(&[("L1", "")]);
	h.session.install_paste_action().await.unwrap();
	assert_eq!(h.surface.active_observations(), 1);
	h.cursor_to(Some("L1")).await;
	assert_eq!(h.doc.rendered("L1"), vec!["Paste"]);
}

#[tokio::test]
async fn content_change_rescan_can_be_disabled() {
	let config = affix_session::SessionConfig::from_toml_str("[registry]\nrescan_on_content_change = false\n").unwrap();
	let h = crate::common::harness_with(config);
	h.regions(&[("L1", "")]);
	h.session.install_paste_action().await.unwrap();
	let calls = h.doc.discover_calls();

	h.regions(&[("L1", ""), ("L2", "")]);
	assert_eq!(h.session.on_content_changed().await.unwrap(), None);
	assert_eq!(h.doc.discover_calls(), calls);
}

#[tokio::test]
async fn paste_install_forgets_history_of_vanished_regions() {
	let h = harness();
	let regions = h.regions(&[("L1", "a"), ("L2", "b")]);
	h.session.history().record(&regions[0]).await.unwrap();
	assert!(h.session.registry().has_action(&RegionId::new("L1"), "Undo"));

	h.doc.remove_region("L1");
	assert_eq!(h.session.on_content_changed().await.unwrap(), None);

	let report = h.session.install_paste_action().await.unwrap().unwrap();
	assert_eq!(report.dropped, vec![RegionId::new("L1")]);
	assert!(h.session.history().is_empty());

	h.regions(&[("L1", "a"), ("L2", "b")]);
	let report = h.session.on_content_changed().await.unwrap().unwrap();
	assert_eq!(report.added, vec![RegionId::new("L1")]);
	let l1 = RegionId::new("L1");
	assert_eq!(
		h.session.registry().has_action(&l1, "Undo"),
		h.session.history().entry(&l1).is_some()
	);
	assert!(!h.session.registry().has_action(&l1, "Undo"));
}
