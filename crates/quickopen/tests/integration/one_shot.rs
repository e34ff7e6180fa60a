use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use quickopen::{
	CancellationToken, Error, HostEvent, InputRequest, PickRequest, Picked, ProxyConfig, QuickOpenProxy, SessionId,
	ShowResult, TransferQuickPickItem, WorkspaceFolder, WorkspaceFolderPickOptions,
};
use tokio::sync::oneshot;
use url::Url;

use crate::support::{HostCall, MockHost, init_tracing, settle};

fn folder(path: &str, name: &str, index: usize) -> WorkspaceFolder {
	WorkspaceFolder {
		uri: Url::parse(path).unwrap(),
		name: name.to_string(),
		index,
	}
}

#[tokio::test]
async fn ready_items_are_sent_with_positional_handles() {
	init_tracing();
	let host = MockHost::new();
	host.reply_show(ShowResult::One(1));
	let proxy = QuickOpenProxy::new(host.clone());

	let picked = proxy
		.show_quick_pick(PickRequest::new(["alpha", "beta"]).with_placeholder("pick one"))
		.await
		.unwrap();
	assert_eq!(picked, Some(Picked::One("beta")));

	let id = host.request_ids()[0];
	let items = host.calls().into_iter().find_map(|call| match call {
		HostCall::SetItems(call_id, items) if call_id == id => Some(items),
		_ => None,
	});
	assert_eq!(
		items,
		Some(vec![
			TransferQuickPickItem {
				handle: 0,
				label: "alpha".into(),
				description: None,
				detail: None,
				picked: false,
			},
			TransferQuickPickItem {
				handle: 1,
				label: "beta".into(),
				description: None,
				detail: None,
				picked: false,
			},
		])
	);
}

#[tokio::test]
async fn many_result_maps_every_handle() {
	let host = MockHost::new();
	host.reply_show(ShowResult::Many(vec![2, 0, 9]));
	let proxy = QuickOpenProxy::new(host.clone());

	let picked = proxy
		.show_quick_pick(PickRequest::new(["a", "b", "c"]).can_pick_many(true))
		.await
		.unwrap();
	assert_eq!(picked, Some(Picked::Many(vec!["c", "a"])));
}

#[tokio::test]
async fn dismissed_pick_resolves_to_none() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());

	let picked = proxy.show_quick_pick(PickRequest::new(["a"])).await.unwrap();
	assert_eq!(picked, None);
}

#[tokio::test]
async fn live_selection_reaches_listener_once() {
	init_tracing();
	let host = MockHost::new();
	host.hold();
	let proxy = Arc::new(QuickOpenProxy::new(host.clone()));

	let seen = Arc::new(Mutex::new(Vec::new()));
	let request = PickRequest::new(["eins", "zwei", "drei"]).on_did_select_item({
		let seen = Arc::clone(&seen);
		move |item| seen.lock().push(item)
	});
	let task = tokio::spawn({
		let proxy = Arc::clone(&proxy);
		async move { proxy.show_quick_pick(request).await }
	});
	settle().await;

	let id = host.request_ids()[0];
	proxy.on_item_selected(id, 0);
	assert_eq!(*seen.lock(), vec!["eins"]);

	host.reply_show(ShowResult::Dismissed);
	host.release();
	assert_eq!(task.await.unwrap().unwrap(), None);

	proxy.on_item_selected(id, 1);
	assert_eq!(*seen.lock(), vec!["eins"]);
}

#[tokio::test]
async fn failing_item_source_reports_error_to_host() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());

	let request = PickRequest::<&'static str>::deferred(async { Err(anyhow::anyhow!("index unavailable")) });
	let err = proxy.show_quick_pick(request).await.unwrap_err();
	assert!(matches!(err, Error::Items(_)));

	let reported = host.calls().into_iter().find_map(|call| match call {
		HostCall::SetError(_, message) => Some(message),
		_ => None,
	});
	assert_eq!(reported.as_deref(), Some("index unavailable"));
	assert!(!host.calls().iter().any(|call| matches!(call, HostCall::SetItems(..))));
}

#[tokio::test]
async fn cancellation_before_host_reply_resolves_to_none() {
	let host = MockHost::new();
	host.hold();
	let proxy = Arc::new(QuickOpenProxy::new(host.clone()));
	let token = CancellationToken::new();

	let task = tokio::spawn({
		let proxy = Arc::clone(&proxy);
		let request = PickRequest::new(["a", "b"]).with_cancellation(token.clone());
		async move { proxy.show_quick_pick(request).await }
	});
	settle().await;
	assert_eq!(host.request_ids().len(), 1);

	token.cancel();
	assert_eq!(task.await.unwrap().unwrap(), None);
}

#[tokio::test]
async fn cancelled_token_skips_the_host() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let token = CancellationToken::new();
	token.cancel();

	let picked = proxy
		.show_quick_pick(PickRequest::new(["a"]).with_cancellation(token.clone()))
		.await
		.unwrap();
	assert_eq!(picked, None);
	let input = proxy
		.show_input(InputRequest::new().with_cancellation(token))
		.await
		.unwrap();
	assert_eq!(input, None);
	settle().await;
	assert!(host.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn request_timeout_from_config() {
	let host = MockHost::new();
	host.hold();
	let config = ProxyConfig::from_toml_str("request_timeout_secs = 5").unwrap();
	let proxy = QuickOpenProxy::with_config(host.clone(), config);

	let err = proxy.show_quick_pick(PickRequest::new(["a"])).await.unwrap_err();
	assert!(matches!(err, Error::Timeout("show")));
}

#[tokio::test]
async fn input_returns_accepted_text() {
	let host = MockHost::new();
	host.reply_input(Some("feature/x"));
	let proxy = QuickOpenProxy::new(host.clone());

	let value = proxy
		.show_input(InputRequest::new().with_prompt("Branch name").with_value("feature/"))
		.await
		.unwrap();
	assert_eq!(value.as_deref(), Some("feature/x"));

	match &host.calls()[0] {
		HostCall::Input(_, options, validate) => {
			assert_eq!(options.prompt.as_deref(), Some("Branch name"));
			assert_eq!(options.value.as_deref(), Some("feature/"));
			assert!(!validate);
		}
		other => panic!("unexpected call {other:?}"),
	}
}

#[tokio::test]
async fn concurrent_inputs_keep_their_own_validators() {
	let host = MockHost::new();
	host.hold();
	host.reply_input(Some("done"));
	let proxy = Arc::new(QuickOpenProxy::new(host.clone()));

	let first = tokio::spawn({
		let proxy = Arc::clone(&proxy);
		let request = InputRequest::new().validate_with(|value: String| async move {
			Ok((value.len() < 3).then(|| "too short".to_string()))
		});
		async move { proxy.show_input(request).await }
	});
	let second = tokio::spawn({
		let proxy = Arc::clone(&proxy);
		let request = InputRequest::new()
			.validate_with(|value: String| async move { Ok(value.contains(' ').then(|| "no spaces".to_string())) });
		async move { proxy.show_input(request).await }
	});
	settle().await;

	let ids = host.request_ids();
	assert_eq!(ids.len(), 2);
	assert!(host.calls().iter().all(|call| matches!(call, HostCall::Input(_, _, true))));

	let messages = [
		proxy.validate_input(ids[0], "ab".into()).await.unwrap(),
		proxy.validate_input(ids[1], "ab".into()).await.unwrap(),
		proxy.validate_input(ids[0], "a b".into()).await.unwrap(),
		proxy.validate_input(ids[1], "a b".into()).await.unwrap(),
	];
	let short = messages[0].as_deref().or(messages[1].as_deref());
	assert_eq!(short, Some("too short"));
	let spaced = messages[2].as_deref().or(messages[3].as_deref());
	assert_eq!(spaced, Some("no spaces"));

	host.release();
	host.release();
	assert_eq!(first.await.unwrap().unwrap().as_deref(), Some("done"));
	assert_eq!(second.await.unwrap().unwrap().as_deref(), Some("done"));

	assert_eq!(proxy.validate_input(ids[0], "x".into()).await.unwrap(), None);
	assert_eq!(proxy.validate_input(ids[1], "x y".into()).await.unwrap(), None);
}

#[tokio::test]
async fn failing_validator_surfaces_as_validation_error() {
	let host = MockHost::new();
	host.hold();
	let proxy = Arc::new(QuickOpenProxy::new(host.clone()));

	let task = tokio::spawn({
		let proxy = Arc::clone(&proxy);
		let request = InputRequest::new().validate_with(|_| async { Err(anyhow::anyhow!("lookup failed")) });
		async move { proxy.show_input(request).await }
	});
	settle().await;

	let id = host.request_ids()[0];
	let err = proxy.validate_input(id, "x".into()).await.unwrap_err();
	assert!(matches!(err, Error::Validation(_)));

	host.release();
	assert_eq!(task.await.unwrap().unwrap(), None);
}

#[tokio::test]
async fn dispatch_routes_validation_requests() {
	let host = MockHost::new();
	host.hold();
	let proxy = Arc::new(QuickOpenProxy::new(host.clone()));

	let task = tokio::spawn({
		let proxy = Arc::clone(&proxy);
		let request = InputRequest::new().validate_with(|value: String| async move { Ok(Some(format!("got {value}"))) });
		async move { proxy.show_input(request).await }
	});
	settle().await;

	let id = host.request_ids()[0];
	let event: HostEvent = serde_json::from_value(serde_json::json!({
		"method": "validateInput",
		"params": { "id": id.0, "value": "abc" },
	}))
	.unwrap();
	assert_eq!(proxy.dispatch(event).await.unwrap().as_deref(), Some("got abc"));

	host.release();
	task.await.unwrap().unwrap();
}

#[tokio::test]
async fn events_for_unknown_ids_are_dropped() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());
	let stale = SessionId(404);

	proxy.on_item_selected(stale, 0);
	proxy.on_did_hide(stale);
	proxy.on_did_change_value(stale, "x".into());
	assert_eq!(proxy.validate_input(stale, "x".into()).await.unwrap(), None);
	assert_eq!(proxy.dispatch(HostEvent::DidAccept { id: stale }).await.unwrap(), None);
	assert!(host.calls().is_empty());
}

#[tokio::test]
async fn workspace_folder_pick_returns_chosen_folder() {
	let host = MockHost::new();
	host.reply_show(ShowResult::One(1));
	let proxy = QuickOpenProxy::new(host.clone());
	proxy.set_workspace_folders(vec![
		folder("file:///work/alpha/", "alpha", 0),
		folder("file:///work/beta/", "beta", 1),
	]);

	let picked = proxy
		.show_workspace_folder_pick(
			WorkspaceFolderPickOptions {
				placeholder: Some("Select workspace folder".into()),
				ignore_focus_out: false,
			},
			None,
		)
		.await
		.unwrap();
	assert_eq!(picked, Some(folder("file:///work/beta/", "beta", 1)));

	let options = host.calls().into_iter().find_map(|call| match call {
		HostCall::Show(_, options) => Some(options),
		_ => None,
	});
	let options = options.unwrap();
	assert!(options.match_on_description);
	assert_eq!(options.placeholder.as_deref(), Some("Select workspace folder"));
}

#[tokio::test]
async fn workspace_folder_pick_without_folders_skips_the_host() {
	let host = MockHost::new();
	let proxy = QuickOpenProxy::new(host.clone());

	let picked = proxy
		.show_workspace_folder_pick(WorkspaceFolderPickOptions::default(), None)
		.await
		.unwrap();
	assert_eq!(picked, None);
	assert!(host.calls().is_empty());
}

#[tokio::test]
async fn out_of_range_selection_is_ignored() {
	let host = MockHost::new();
	host.hold();
	let proxy = Arc::new(QuickOpenProxy::new(host.clone()));

	let seen = Arc::new(Mutex::new(Vec::new()));
	let request = PickRequest::new(["eins", "zwei"]).on_did_select_item({
		let seen = Arc::clone(&seen);
		move |item| seen.lock().push(item)
	});
	let task = tokio::spawn({
		let proxy = Arc::clone(&proxy);
		async move { proxy.show_quick_pick(request).await }
	});
	settle().await;

	let id = host.request_ids()[0];
	proxy.on_item_selected(id, 2);
	proxy.on_item_selected(id, usize::MAX);
	assert!(seen.lock().is_empty());
	proxy.on_item_selected(id, 1);
	assert_eq!(*seen.lock(), vec!["zwei"]);

	host.release();
	assert_eq!(task.await.unwrap().unwrap(), None);
}

#[tokio::test]
async fn deferred_items_follow_the_opened_widget() {
	let host = MockHost::new();
	host.hold();
	host.reply_show(ShowResult::One(1));
	let proxy = Arc::new(QuickOpenProxy::new(host.clone()));
	let (items_tx, items_rx) = oneshot::channel::<Vec<&'static str>>();

	let task = tokio::spawn({
		let proxy = Arc::clone(&proxy);
		let request = PickRequest::deferred(async move { items_rx.await.map_err(anyhow::Error::from) });
		async move { proxy.show_quick_pick(request).await }
	});
	settle().await;

	assert_eq!(host.request_ids().len(), 1);
	assert!(!host.calls().iter().any(|call| matches!(call, HostCall::SetItems(..))));

	items_tx.send(vec!["slow", "slower"]).unwrap();
	settle().await;
	let sent = host.calls().into_iter().find_map(|call| match call {
		HostCall::SetItems(_, items) => Some(items),
		_ => None,
	});
	let labels: Vec<_> = sent.unwrap().into_iter().map(|item| item.label).collect();
	assert_eq!(labels, vec!["slow", "slower"]);

	host.release();
	assert_eq!(task.await.unwrap().unwrap(), Some(Picked::One("slower")));
}

#[tokio::test]
async fn input_cancelled_while_host_is_pending() {
	let host = MockHost::new();
	host.hold();
	let proxy = Arc::new(QuickOpenProxy::new(host.clone()));
	let token = CancellationToken::new();

	let task = tokio::spawn({
		let proxy = Arc::clone(&proxy);
		let request = InputRequest::new()
			.validate_with(|_| async { Ok(Some("never valid".to_string())) })
			.with_cancellation(token.clone());
		async move { proxy.show_input(request).await }
	});
	settle().await;

	let id = host.request_ids()[0];
	assert_eq!(
		proxy.validate_input(id, "x".into()).await.unwrap().as_deref(),
		Some("never valid")
	);

	token.cancel();
	assert_eq!(task.await.unwrap().unwrap(), None);
	assert_eq!(proxy.validate_input(id, "x".into()).await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn slow_validator_times_out() {
	let host = MockHost::new();
	host.hold();
	let config = ProxyConfig::from_toml_str("validation_timeout_secs = 2").unwrap();
	let proxy = Arc::new(QuickOpenProxy::with_config(host.clone(), config));

	let task = tokio::spawn({
		let proxy = Arc::clone(&proxy);
		let request = InputRequest::new().validate_with(|_| async {
			tokio::time::sleep(Duration::from_secs(60)).await;
			Ok(None)
		});
		async move { proxy.show_input(request).await }
	});
	settle().await;

	let id = host.request_ids()[0];
	let err = proxy.validate_input(id, "x".into()).await.unwrap_err();
	assert!(matches!(err, Error::Timeout("validateInput")));

	host.release();
	assert_eq!(task.await.unwrap().unwrap(), None);
}
