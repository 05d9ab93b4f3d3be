use affix_primitives::{ActionError, ActionEvent, ConfirmKind, DialogAnswer, HostError};
use affix_session::{SessionConfig, SessionError};
use pretty_assertions::assert_eq;

use crate::common::{harness, harness_with};

#[tokio::test]
async fn paste_then_undo_round_trip() {
	let h = harness();
	h.regions(&[("L1", "fn old() {}"), ("L2", "")]);
	h.session.install_paste_action().await.unwrap().unwrap();
	h.cursor_to(Some("L1")).await;
	assert_eq!(h.doc.rendered("L1"), vec!["Paste"]);

	h.clipboard.set_text("fn new() {}\r\n");
	let paste = h.doc.slot("L1").unwrap().affordance("Paste").unwrap();
	paste.invoke(ActionEvent::Pointer).await.unwrap();

	assert_eq!(h.doc.content("L1").as_deref(), Some("fn new() {}\n"));
	assert_eq!(h.doc.rendered("L1"), vec!["Paste", "Undo"]);
	assert!(h.doc.rendered("L2").is_empty());

	let undo = h.doc.slot("L1").unwrap().affordance("Undo").unwrap();
	undo.invoke(ActionEvent::Pointer).await.unwrap();
	// The pasted text differs from the snapshot, so undo confirms first.
	assert_eq!(h.dialog.prompts().len(), 1);
	assert_eq!(h.doc.content("L1").as_deref(), Some("fn old() {}"));
	assert_eq!(h.doc.rendered("L1"), vec!["Paste"]);
}

#[tokio::test]
async fn second_paste_keeps_one_undo() {
	let h = harness();
	let regions = h.regions(&[("L1", "v0")]);
	h.session.install_paste_action().await.unwrap();
	h.cursor_to(Some("L1")).await;

	h.clipboard.set_text("v1");
	h.session.invoke(&regions[0].id, "Paste", ActionEvent::Keyboard).await.unwrap();
	h.clipboard.set_text("v2");
	h.session.invoke(&regions[0].id, "Paste", ActionEvent::Keyboard).await.unwrap();

	assert_eq!(h.doc.rendered("L1"), vec!["Paste", "Undo"]);
	assert_eq!(h.session.history().entry(&regions[0].id).unwrap().previous_content, "v1");

	h.doc.set_content("L1", "v2 edited");
	h.dialog.answer(DialogAnswer::ok());
	h.session.invoke(&regions[0].id, "Undo", ActionEvent::Pointer).await.unwrap();
	assert_eq!(h.dialog.prompts()[0].kind, ConfirmKind::OkCancel);
	assert_eq!(h.doc.content("L1").as_deref(), Some("v1"));
}

#[tokio::test]
async fn denied_clipboard_alerts_without_writing() {
	let h = harness();
	let regions = h.regions(&[("L1", "keep")]);
	h.session.install_paste_action().await.unwrap();
	h.clipboard.deny();

	let err = h
		.session
		.invoke(&regions[0].id, "Paste", ActionEvent::Pointer)
		.await
		.unwrap_err();
	assert!(matches!(
		err,
		SessionError::Action(ActionError::Host(HostError::Clipboard(_)))
	));
	let prompts = h.dialog.prompts();
	assert_eq!(prompts.len(), 1);
	assert_eq!(prompts[0].kind, ConfirmKind::Ok);
	assert_eq!(prompts[0].title, h.session.config().paste.title);
	assert_eq!(h.doc.content("L1").as_deref(), Some("keep"));
	assert!(h.session.history().is_empty());
}

#[tokio::test]
async fn disabled_paste_installs_nothing() {
	let config = SessionConfig::from_toml_str("[paste]\nenabled = false\n").unwrap();
	let h = harness_with(config);
	h.regions(&[("L1", "")]);
	assert_eq!(h.session.install_paste_action().await.unwrap(), None);
	assert!(h.session.registry().global_actions().is_empty());
}

#[tokio::test]
async fn removing_paste_clears_it_under_the_cursor() {
	let h = harness();
	h.regions(&[("L1", "")]);
	h.session.install_paste_action().await.unwrap();
	h.cursor_to(Some("L1")).await;
	assert_eq!(h.doc.rendered("L1"), vec!["Paste"]);

	assert!(h.session.remove_paste_action());
	h.cursor_to(Some("L1")).await;
	assert!(h.doc.rendered("L1").is_empty());
	assert!(!h.session.remove_paste_action());
}
