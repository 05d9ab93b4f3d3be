use affix_primitives::{Action, ActionEvent, DialogAnswer, Icon};
use pretty_assertions::assert_eq;

use crate::common::harness;

fn noop(name: &str) -> Action {
	Action::new(name, Icon::default(), |_, _| async { Ok(()) })
}

#[tokio::test]
async fn record_then_revert_unchanged_region() {
	let h = harness();
	let regions = h.regions(&[("L1", "old")]);
	let l1 = &regions[0];
	let history = h.session.history();

	history.record(l1).await.unwrap();
	assert!(h.session.registry().has_action(&l1.id, "Undo"));

	h.session.invoke(&l1.id, "Undo", ActionEvent::Pointer).await.unwrap();
	assert!(h.dialog.prompts().is_empty());
	assert_eq!(h.doc.writes(), vec![(l1.id.clone(), "old".to_string())]);
	assert!(!h.session.registry().has_action(&l1.id, "Undo"));
	assert!(history.is_empty());
}

#[tokio::test]
async fn declined_revert_keeps_edits_and_undo() {
	let h = harness();
	let regions = h.regions(&[("L1", "old")]);
	let l1 = &regions[0];
	h.session.history().record(l1).await.unwrap();
	h.doc.set_content("L1", "new");
	h.dialog.answer(DialogAnswer::cancel());

	h.session.invoke(&l1.id, "Undo", ActionEvent::Pointer).await.unwrap();
	assert_eq!(h.dialog.prompts().len(), 1);
	assert_eq!(h.doc.content("L1").as_deref(), Some("new"));
	assert!(h.session.history().entry(&l1.id).is_some());
	assert!(h.session.registry().has_action(&l1.id, "Undo"));
}

#[tokio::test]
async fn global_action_follows_the_cursor() {
	let h = harness();
	h.regions(&[("L1", ""), ("L2", ""), ("L3", "")]);
	h.session.registry().attach_to_all_regions([noop("X")]).await.unwrap();

	h.cursor_to(Some("L2")).await;
	assert!(h.doc.rendered("L1").is_empty());
	assert_eq!(h.doc.rendered("L2"), vec!["X"]);
	assert!(h.doc.rendered("L3").is_empty());

	h.cursor_to(Some("L3")).await;
	assert!(h.doc.rendered("L1").is_empty());
	assert!(h.doc.rendered("L2").is_empty());
	assert_eq!(h.doc.rendered("L3"), vec!["X"]);
}

#[tokio::test]
async fn rendered_affordances_carry_button_classes() {
	let h = harness();
	h.regions(&[("L1", "")]);
	h.session.registry().attach_to_all_regions([noop("Copy")]).await.unwrap();
	h.cursor_to(Some("L1")).await;

	let affordance = h.doc.slot("L1").unwrap().affordance("Copy").unwrap();
	assert_eq!(affordance.classes(), vec!["button".to_string(), "copy".to_string()]);
	assert_eq!(affordance.region().id.as_str(), "L1");
}

#[tokio::test]
async fn invoke_reports_unknown_targets() {
	let h = harness();
	let regions = h.regions(&[("L1", "")]);
	let err = h.session.invoke(&regions[0].id, "Undo", ActionEvent::Synthetic).await.unwrap_err();
	assert!(matches!(err, affix_session::SessionError::UnknownRegion(_)));

	h.session.registry().attach_to_region([noop("A")], &regions[0]);
	let err = h.session.invoke(&regions[0].id, "Undo", ActionEvent::Synthetic).await.unwrap_err();
	assert!(matches!(err, affix_session::SessionError::UnknownAction { .. }));
}

#[tokio::test]
async fn content_change_picks_up_new_regions_and_prunes_history() {
	let h = harness();
	let regions = h.regions(&[("L1", "a"), ("L2", "b")]);
	h.session.registry().attach_to_all_regions([noop("X")]).await.unwrap();
	h.session.history().record(&regions[0]).await.unwrap();

	h.doc.remove_region("L1");
	h.doc.add_region("L4");
	let report = h.session.on_content_changed().await.unwrap().unwrap();
	assert_eq!(report.dropped, vec![regions[0].id.clone()]);
	assert_eq!(report.added.len(), 1);
	assert!(h.session.history().is_empty());
	assert_eq!(h.session.registry().len(), 2);
}
