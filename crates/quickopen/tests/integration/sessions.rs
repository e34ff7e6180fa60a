use pretty_assertions::assert_eq;
use quickopen::{QuickInputButton, QuickInputKind, QuickOpenProxy, QuickPickItem};
use serde_json::json;

use crate::support::{HostCall, MockHost, init_tracing, settle};

#[tokio::test]
async fn writes_in_one_turn_coalesce_into_one_update() {
	init_tracing();
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let pick = proxy.create_quick_pick::<&'static str>();

	pick.show();
	pick.set_title(Some("first".into()));
	pick.set_placeholder(Some("filter".into()));
	pick.set_busy(true);
	pick.set_title(Some("second".into()));
	settle().await;

	let updates = host.updates();
	assert_eq!(updates.len(), 1);
	let update = &updates[0];
	assert_eq!(update.id, pick.id());
	assert_eq!(update.kind, Some(QuickInputKind::QuickPick));
	assert_eq!(update.visible, Some(true));
	assert_eq!(update.title, Some(Some("second".into())));
	assert_eq!(update.placeholder, Some(Some("filter".into())));
	assert_eq!(update.busy, Some(true));

	pick.set_busy(false);
	settle().await;
	let updates = host.updates();
	assert_eq!(updates.len(), 2);
	assert_eq!(
		serde_json::to_value(&updates[1]).unwrap(),
		json!({ "id": pick.id().0, "busy": false })
	);
}

#[tokio::test]
async fn first_show_sends_kind_and_visibility() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let input = proxy.create_input_box();

	input.show();
	settle().await;

	let updates = host.updates();
	assert_eq!(updates.len(), 1);
	assert_eq!(
		serde_json::to_value(&updates[0]).unwrap(),
		json!({ "id": input.id().0, "type": "inputBox", "visible": true })
	);
	assert!(input.is_visible());
}

#[tokio::test]
async fn hidden_writes_accumulate_until_show() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let pick = proxy.create_quick_pick::<&'static str>();

	pick.set_items(["a", "b"]);
	pick.set_step(Some(1));
	pick.set_total_steps(Some(3));
	pick.set_title(None);
	settle().await;
	assert!(host.updates().is_empty());

	pick.show();
	settle().await;
	let updates = host.updates();
	assert_eq!(updates.len(), 1);
	assert_eq!(
		serde_json::to_value(&updates[0]).unwrap(),
		json!({
			"id": pick.id().0,
			"type": "quickPick",
			"title": null,
			"step": 1,
			"totalSteps": 3,
			"visible": true,
			"items": [
				{ "handle": 0, "label": "a", "picked": false },
				{ "handle": 1, "label": "b", "picked": false },
			],
		})
	);
}

#[tokio::test]
async fn hide_flushes_and_hiding_twice_is_silent() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let pick = proxy.create_quick_pick::<&'static str>();

	pick.hide();
	settle().await;
	assert!(host.calls().is_empty());

	pick.show();
	settle().await;
	pick.hide();
	pick.hide();
	settle().await;

	let updates = host.updates();
	assert_eq!(updates.len(), 2);
	assert_eq!(updates[1].visible, Some(false));
	assert!(!pick.is_visible());
}

#[tokio::test]
async fn dispose_is_idempotent() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let pick = proxy.create_quick_pick::<&'static str>();
	let mut hidden = pick.on_did_hide();
	assert_eq!(proxy.session_count(), 1);

	pick.show();
	pick.dispose();
	pick.dispose();
	pick.set_title(Some("late".into()));
	settle().await;

	assert_eq!(hidden.try_recv(), Ok(()));
	assert!(hidden.try_recv().is_err());
	assert_eq!(host.dispose_count(pick.id()), 1);
	assert!(host.updates().is_empty());
	assert!(pick.is_disposed());
	assert_eq!(pick.title(), None);
	assert_eq!(proxy.session_count(), 0);

	proxy.on_did_hide(pick.id());
	assert!(hidden.try_recv().is_err());
}

#[tokio::test]
async fn reassigned_items_invalidate_old_handles() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let pick = proxy.create_quick_pick::<&'static str>();
	let mut active = pick.on_did_change_active();
	let mut selection = pick.on_did_change_selection();

	pick.set_items(["a", "b"]);
	pick.show();
	settle().await;

	proxy.on_did_change_active(pick.id(), &[1]);
	assert_eq!(active.try_recv(), Ok(vec!["b"]));
	assert_eq!(pick.active_items(), vec!["b"]);

	pick.set_items(["c"]);
	settle().await;
	let items = host.updates()[1].items.clone().unwrap();
	assert_eq!(items[0].handle, 2);

	proxy.on_did_change_selection(pick.id(), &[0, 1]);
	assert_eq!(selection.try_recv(), Ok(Vec::new()));
	proxy.on_did_change_selection(pick.id(), &[2]);
	assert_eq!(selection.try_recv(), Ok(vec!["c"]));
	assert_eq!(pick.selected_items(), vec!["c"]);
}

#[tokio::test]
async fn local_selection_is_sent_as_handles() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let pick = proxy.create_quick_pick::<QuickPickItem>();
	let items = vec![
		QuickPickItem::new("src").with_description("sources"),
		QuickPickItem::new("docs").with_id("d"),
	];

	pick.set_items(items.clone());
	pick.set_can_select_many(true);
	pick.set_selected_items(vec![items[1].clone()]);
	pick.show();
	settle().await;

	let update = &host.updates()[0];
	assert_eq!(update.can_select_many, Some(true));
	assert_eq!(update.selected_items, Some(vec![1]));
	let sent = update.items.as_ref().unwrap();
	assert_eq!(sent[0].description.as_deref(), Some("sources"));
	assert_eq!(pick.selected_items(), vec![items[1].clone()]);
}

#[tokio::test]
async fn host_value_and_accept_reach_subscribers() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let input = proxy.create_input_box();
	let mut values = input.on_did_change_value();
	let mut accepted = input.on_did_accept();

	input.show();
	settle().await;
	proxy.on_did_change_value(input.id(), "hello".into());
	proxy.on_did_accept(input.id());

	assert_eq!(values.try_recv(), Ok("hello".to_string()));
	assert_eq!(accepted.try_recv(), Ok(()));
	assert_eq!(input.value(), "hello");
	assert_eq!(host.updates().len(), 1);
}

#[tokio::test]
async fn button_handles_resolve_to_buttons() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let input = proxy.create_input_box();
	let mut triggered = input.on_did_trigger_button();
	let refresh = QuickInputButton::new("refresh").with_tooltip("Reload");

	input.set_buttons(vec![QuickInputButton::new("back"), refresh.clone()]);
	input.show();
	settle().await;

	let update = &host.updates()[0];
	let buttons = update.buttons.as_ref().unwrap();
	assert_eq!(buttons[1].handle, 1);
	assert_eq!(buttons[1].tooltip.as_deref(), Some("Reload"));

	proxy.on_did_trigger_button(input.id(), 1);
	proxy.on_did_trigger_button(input.id(), 7);
	assert_eq!(triggered.try_recv(), Ok(refresh));
	assert!(triggered.try_recv().is_err());
}

#[tokio::test]
async fn input_box_properties_flush_together() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let input = proxy.create_input_box();

	input.set_value("draft");
	input.set_password(true);
	input.set_prompt(Some("Token".into()));
	input.set_value_selection(Some((0, 5)));
	input.show();
	input.set_validation_message(Some("required".into()));
	settle().await;

	let updates = host.updates();
	assert_eq!(updates.len(), 1);
	assert_eq!(
		serde_json::to_value(&updates[0]).unwrap(),
		json!({
			"id": input.id().0,
			"type": "inputBox",
			"visible": true,
			"value": "draft",
			"password": true,
			"prompt": "Token",
			"validationMessage": "required",
			"valueSelection": [0, 5],
		})
	);
	assert!(input.password());
	assert_eq!(input.validation_message().as_deref(), Some("required"));
}

#[tokio::test]
async fn host_hide_keeps_session_alive() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let pick = proxy.create_quick_pick::<&'static str>();
	let mut hidden = pick.on_did_hide();

	pick.show();
	settle().await;
	proxy.on_did_hide(pick.id());
	assert_eq!(hidden.try_recv(), Ok(()));
	assert!(!pick.is_visible());
	assert!(!pick.is_disposed());

	pick.set_title(Some("offscreen".into()));
	settle().await;
	assert_eq!(host.updates().len(), 1);
	assert!(host.calls().iter().all(|call| !matches!(call, HostCall::Dispose(_))));
	pick.dispose();
}

#[tokio::test]
async fn dispose_after_host_hide_does_not_hide_again() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let pick = proxy.create_quick_pick::<&'static str>();
	let mut hidden = pick.on_did_hide();

	pick.show();
	settle().await;
	proxy.on_did_hide(pick.id());
	pick.dispose();

	assert_eq!(hidden.try_recv(), Ok(()));
	assert!(hidden.try_recv().is_err());
}

#[tokio::test]
async fn disposing_a_never_shown_session_stays_silent() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let input = proxy.create_input_box();
	let mut hidden = input.on_did_hide();

	input.dispose();
	settle().await;

	assert!(hidden.try_recv().is_err());
	assert_eq!(host.dispose_count(input.id()), 1);
}

#[tokio::test]
async fn reassigning_items_drops_staged_selection() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let pick = proxy.create_quick_pick::<&'static str>();

	pick.set_items(["a", "b"]);
	pick.set_active_items(vec!["a"]);
	pick.set_selected_items(vec!["b"]);
	pick.set_items(["c"]);
	pick.show();
	settle().await;

	let update = &host.updates()[0];
	assert_eq!(update.active_items, None);
	assert_eq!(update.selected_items, None);
	assert_eq!(update.items.as_ref().unwrap()[0].handle, 2);
	assert!(pick.active_items().is_empty());
	assert!(pick.selected_items().is_empty());
}
