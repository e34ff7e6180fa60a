//! Extension-side entry point for quick-open widgets.

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use quickopen_rpc::{HostEvent, QuickOpenHost, QuickPickShowOptions, SessionId, SessionIdGen, ShowResult};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::ProxyConfig;
use crate::item::{PickItem, Picked, transfer_items};
use crate::registry::{RequestGuard, SessionEvents, SessionRegistry};
use crate::request::{InputRequest, ItemSource, PickRequest};
use crate::scheduler::Scheduler;
use crate::session::{InputBox, QuickPick, SessionContext};
use crate::workspace::{WorkspaceFolder, WorkspaceFolderPickOptions};
use crate::{Error, Result};

/// Extension-side proxy for the host's quick-open service.
///
/// Outbound requests go through the [`QuickOpenHost`] given at construction.
/// The embedder forwards host messages to the `on_*` methods, to
/// [`Self::validate_input`], or wholesale to [`Self::dispatch`].
///
/// Deferred work (flushes, fire-and-forget host calls) runs on the tokio runtime
/// that was current when the proxy was created.
pub struct QuickOpenProxy {
	host: Arc<dyn QuickOpenHost>,
	registry: Arc<SessionRegistry>,
	ids: SessionIdGen,
	scheduler: Scheduler,
	config: ProxyConfig,
	workspace_folders: RwLock<Vec<WorkspaceFolder>>,
}

impl std::fmt::Debug for QuickOpenProxy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("QuickOpenProxy")
			.field("config", &self.config)
			.field("sessions", &self.registry.session_count())
			.finish_non_exhaustive()
	}
}

impl QuickOpenProxy {
	/// Create a proxy with default configuration.
	pub fn new(host: Arc<dyn QuickOpenHost>) -> Self {
		Self::with_config(host, ProxyConfig::default())
	}

	/// Create a proxy with explicit configuration.
	pub fn with_config(host: Arc<dyn QuickOpenHost>, config: ProxyConfig) -> Self {
		Self {
			host,
			registry: Arc::new(SessionRegistry::new()),
			ids: SessionIdGen::new(),
			scheduler: Scheduler::current(),
			config,
			workspace_folders: RwLock::new(Vec::new()),
		}
	}

	/// Active configuration.
	pub fn config(&self) -> &ProxyConfig {
		&self.config
	}

	/// Number of live sessions.
	pub fn session_count(&self) -> usize {
		self.registry.session_count()
	}

	fn session_context(&self) -> SessionContext {
		SessionContext {
			host: Arc::clone(&self.host),
			registry: Arc::clone(&self.registry),
			scheduler: self.scheduler.clone(),
		}
	}

	async fn with_request_timeout<R>(&self, method: &'static str, fut: impl Future<Output = Result<R>>) -> Result<R> {
		match self.config.request_timeout() {
			Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| Error::Timeout(method))?,
			None => fut.await,
		}
	}

	/// Show a one-shot pick list.
	///
	/// Resolves to `None` when the user dismisses the widget or the request's
	/// cancellation token fires first. Cancelling does not close a widget the host
	/// already opened.
	///
	/// # Errors
	///
	/// - [`Error::Items`] when a deferred item list fails. The host is told via
	///   `set_error` before this returns.
	/// - [`Error::Rpc`] when a host call fails.
	/// - [`Error::Timeout`] when the configured request deadline passes.
	pub async fn show_quick_pick<T: PickItem>(&self, request: PickRequest<T>) -> Result<Option<Picked<T>>> {
		let PickRequest {
			items,
			options,
			on_did_select_item,
			cancellation,
		} = request;
		let cancellation = cancellation.unwrap_or_default();
		if cancellation.is_cancelled() {
			return Ok(None);
		}

		let id = self.ids.next();
		let _guard = RequestGuard::new(Arc::clone(&self.registry), id);
		debug!(id = %id, can_pick_many = options.can_pick_many, "quick pick requested");

		let host = Arc::clone(&self.host);
		let shown = self.scheduler.spawn(async move { host.show(id, options).await });
		let pick = self.run_pick(id, items, on_did_select_item, shown);

		tokio::select! {
			biased;
			() = cancellation.cancelled() => {
				debug!(id = %id, "quick pick cancelled");
				Ok(None)
			}
			result = pick => result,
		}
	}

	async fn run_pick<T: PickItem>(
		&self,
		id: SessionId,
		items: ItemSource<T>,
		on_did_select_item: Option<Arc<dyn Fn(T) + Send + Sync>>,
		shown: JoinHandle<quickopen_rpc::Result<ShowResult>>,
	) -> Result<Option<Picked<T>>> {
		let items = match items.resolve().await {
			Ok(items) => items,
			Err(err) => {
				if let Err(host_err) = self.host.set_error(id, format!("{err:#}")).await {
					warn!(id = %id, error = %host_err, "failed to report item error to host");
				}
				return Err(Error::Items(err));
			}
		};

		if let Some(listener) = on_did_select_item {
			let snapshot = items.clone();
			self.registry.insert_selection_listener(
				id,
				Arc::new(move |handle: usize| match snapshot.get(handle) {
					Some(item) => listener(item.clone()),
					None => trace!(handle, "stale selection handle dropped"),
				}),
			);
		}

		self.host.set_items(id, transfer_items(&items, 0)).await?;

		let result = self
			.with_request_timeout("show", async {
				match shown.await {
					Ok(result) => result.map_err(Error::from),
					Err(err) => {
						warn!(id = %id, error = %err, "quick pick show task failed");
						Err(Error::from(quickopen_rpc::Error::HostStopped))
					}
				}
			})
			.await?;

		Ok(match result {
			ShowResult::One(handle) => items.get(handle).cloned().map(Picked::One),
			ShowResult::Many(handles) => Some(Picked::Many(
				handles.iter().filter_map(|&handle| items.get(handle).cloned()).collect(),
			)),
			ShowResult::Dismissed => None,
		})
	}

	/// Show a one-shot text input.
	///
	/// Resolves to `None` when the user dismisses the widget or the request's
	/// cancellation token fires first.
	///
	/// # Errors
	///
	/// - [`Error::Rpc`] when the host call fails.
	/// - [`Error::Timeout`] when the configured request deadline passes.
	pub async fn show_input(&self, request: InputRequest) -> Result<Option<String>> {
		let InputRequest {
			options,
			validator,
			cancellation,
		} = request;
		let cancellation = cancellation.unwrap_or_default();
		if cancellation.is_cancelled() {
			return Ok(None);
		}

		let id = self.ids.next();
		let _guard = RequestGuard::new(Arc::clone(&self.registry), id);
		let validate = validator.is_some();
		if let Some(validator) = validator {
			self.registry.insert_validator(id, validator);
		}
		debug!(id = %id, validate, "input requested");

		let input = self.with_request_timeout("input", async {
			self.host.input(id, options, validate).await.map_err(Error::from)
		});

		tokio::select! {
			biased;
			() = cancellation.cancelled() => {
				debug!(id = %id, "input cancelled");
				Ok(None)
			}
			result = input => result,
		}
	}

	/// Replace the workspace folders offered by [`Self::show_workspace_folder_pick`].
	pub fn set_workspace_folders(&self, folders: Vec<WorkspaceFolder>) {
		*self.workspace_folders.write() = folders;
	}

	/// Current workspace folders.
	pub fn workspace_folders(&self) -> Vec<WorkspaceFolder> {
		self.workspace_folders.read().clone()
	}

	/// Let the user pick one of the workspace folders.
	///
	/// Resolves to `None` without contacting the host when there are no folders.
	///
	/// # Errors
	///
	/// Same as [`Self::show_quick_pick`].
	pub async fn show_workspace_folder_pick(
		&self,
		options: WorkspaceFolderPickOptions,
		cancellation: Option<CancellationToken>,
	) -> Result<Option<WorkspaceFolder>> {
		let folders = self.workspace_folders();
		if folders.is_empty() {
			debug!("workspace folder pick without folders");
			return Ok(None);
		}

		let mut request = PickRequest::new(folders).with_options(QuickPickShowOptions {
			placeholder: options.placeholder,
			ignore_focus_out: options.ignore_focus_out,
			match_on_description: true,
			..QuickPickShowOptions::default()
		});
		if let Some(token) = cancellation {
			request = request.with_cancellation(token);
		}
		Ok(self.show_quick_pick(request).await?.and_then(Picked::into_one))
	}

	/// Create a long-lived pick list. It stays hidden until [`QuickPick::show`].
	pub fn create_quick_pick<T: PickItem>(&self) -> QuickPick<T> {
		QuickPick::new(self.ids.next(), self.session_context())
	}

	/// Create a long-lived text field. It stays hidden until [`InputBox::show`].
	pub fn create_input_box(&self) -> InputBox {
		InputBox::new(self.ids.next(), self.session_context())
	}

	/// Host: live selection changed in a one-shot pick.
	pub fn on_item_selected(&self, id: SessionId, handle: usize) {
		match self.registry.selection_listener(id) {
			Some(listener) => listener(handle),
			None => trace!(id = %id, handle, "selection for unknown request dropped"),
		}
	}

	/// Host: validate a candidate value of a one-shot input.
	///
	/// Returns the message to display, or `None` when the value is acceptable or
	/// no validator is registered for `id`.
	///
	/// # Errors
	///
	/// - [`Error::Validation`] when the validator fails.
	/// - [`Error::Timeout`] when the configured validation deadline passes.
	pub async fn validate_input(&self, id: SessionId, value: String) -> Result<Option<String>> {
		let Some(validator) = self.registry.validator(id) else {
			trace!(id = %id, "validation for unknown request dropped");
			return Ok(None);
		};

		let validation = validator(value);
		let result = match self.config.validation_timeout() {
			Some(limit) => tokio::time::timeout(limit, validation)
				.await
				.map_err(|_| Error::Timeout("validateInput"))?,
			None => validation.await,
		};
		result.map_err(|err| {
			warn!(id = %id, error = %format!("{err:#}"), "input validator failed");
			Error::Validation(err)
		})
	}

	/// Host: the user typed in a session's field.
	pub fn on_did_change_value(&self, id: SessionId, value: String) {
		if let Some(session) = self.session(id) {
			session.did_change_value(value);
		}
	}

	/// Host: the user committed a session.
	pub fn on_did_accept(&self, id: SessionId) {
		if let Some(session) = self.session(id) {
			session.did_accept();
		}
	}

	/// Host: focus moved within a quick-pick session.
	pub fn on_did_change_active(&self, id: SessionId, handles: &[usize]) {
		if let Some(session) = self.session(id) {
			session.did_change_active(handles);
		}
	}

	/// Host: checked items changed within a quick-pick session.
	pub fn on_did_change_selection(&self, id: SessionId, handles: &[usize]) {
		if let Some(session) = self.session(id) {
			session.did_change_selection(handles);
		}
	}

	/// Host: a toolbar button was pressed.
	pub fn on_did_trigger_button(&self, id: SessionId, handle: usize) {
		if let Some(session) = self.session(id) {
			session.did_trigger_button(handle);
		}
	}

	/// Host: a session's widget was hidden.
	pub fn on_did_hide(&self, id: SessionId) {
		if let Some(session) = self.session(id) {
			session.did_hide();
		}
	}

	fn session(&self, id: SessionId) -> Option<Arc<dyn SessionEvents>> {
		let session = self.registry.session(id);
		if session.is_none() {
			trace!(id = %id, "event for unknown session dropped");
		}
		session
	}

	/// Route one inbound host message.
	///
	/// Returns the validation message for [`HostEvent::ValidateInput`] and `None`
	/// for every notification.
	///
	/// # Errors
	///
	/// Only [`HostEvent::ValidateInput`] can fail; see [`Self::validate_input`].
	pub async fn dispatch(&self, event: HostEvent) -> Result<Option<String>> {
		match event {
			HostEvent::ItemSelected { id, handle } => self.on_item_selected(id, handle),
			HostEvent::ValidateInput { id, value } => return self.validate_input(id, value).await,
			HostEvent::DidChangeValue { id, value } => self.on_did_change_value(id, value),
			HostEvent::DidAccept { id } => self.on_did_accept(id),
			HostEvent::DidChangeActive { id, handles } => self.on_did_change_active(id, &handles),
			HostEvent::DidChangeSelection { id, handles } => self.on_did_change_selection(id, &handles),
			HostEvent::DidTriggerButton { id, handle } => self.on_did_trigger_button(id, handle),
			HostEvent::DidHide { id } => self.on_did_hide(id),
		}
		Ok(None)
	}
}
