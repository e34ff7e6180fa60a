//! Routing table from host-side ids to extension-side listeners.
//!
//! The host only knows session and request ids. Every inbound notification is
//! resolved here; ids without an entry belong to requests that already finished
//! or sessions that were disposed, and their events are dropped.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use quickopen_rpc::SessionId;

/// Async input validator.
///
/// Resolves to the message to show under the field, or `None` when the value is
/// acceptable.
pub type Validator = Arc<dyn Fn(String) -> BoxFuture<'static, anyhow::Result<Option<String>>> + Send + Sync>;

/// Live-selection listener of a one-shot pick, keyed by handle.
pub(crate) type SelectionListener = Arc<dyn Fn(usize) + Send + Sync>;

/// Boxes a validator closure.
pub(crate) fn validator_fn<F, Fut>(validate: F) -> Validator
where
	F: Fn(String) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
{
	Arc::new(move |value| validate(value).boxed())
}

/// Inbound notification sink of a long-lived session.
pub(crate) trait SessionEvents: Send + Sync {
	fn did_change_value(&self, value: String);
	fn did_accept(&self);
	fn did_change_active(&self, handles: &[usize]);
	fn did_change_selection(&self, handles: &[usize]);
	fn did_trigger_button(&self, handle: usize);
	fn did_hide(&self);
}

#[derive(Default)]
struct RegistryState {
	sessions: HashMap<SessionId, Arc<dyn SessionEvents>>,
	selection_listeners: HashMap<SessionId, SelectionListener>,
	validators: HashMap<SessionId, Validator>,
}

/// Id-keyed table of sessions, one-shot selection listeners and validators.
///
/// Validators are keyed per id so that concurrent input requests never replace
/// each other's validator.
#[derive(Default)]
pub(crate) struct SessionRegistry {
	state: RwLock<RegistryState>,
}

impl SessionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert_session(&self, id: SessionId, session: Arc<dyn SessionEvents>) {
		self.state.write().sessions.insert(id, session);
	}

	/// Removes a session, returning whether it was registered.
	pub fn remove_session(&self, id: SessionId) -> bool {
		self.state.write().sessions.remove(&id).is_some()
	}

	pub fn session(&self, id: SessionId) -> Option<Arc<dyn SessionEvents>> {
		self.state.read().sessions.get(&id).cloned()
	}

	pub fn session_count(&self) -> usize {
		self.state.read().sessions.len()
	}

	pub fn insert_selection_listener(&self, id: SessionId, listener: SelectionListener) {
		self.state.write().selection_listeners.insert(id, listener);
	}

	pub fn selection_listener(&self, id: SessionId) -> Option<SelectionListener> {
		self.state.read().selection_listeners.get(&id).cloned()
	}

	pub fn insert_validator(&self, id: SessionId, validator: Validator) {
		self.state.write().validators.insert(id, validator);
	}

	pub fn validator(&self, id: SessionId) -> Option<Validator> {
		self.state.read().validators.get(&id).cloned()
	}

	/// Drops everything keyed by a finished one-shot request.
	fn release_request(&self, id: SessionId) {
		let mut state = self.state.write();
		state.selection_listeners.remove(&id);
		state.validators.remove(&id);
	}
}

/// Releases a one-shot request's listeners when the request future completes or is dropped.
pub(crate) struct RequestGuard {
	registry: Arc<SessionRegistry>,
	id: SessionId,
}

impl RequestGuard {
	pub fn new(registry: Arc<SessionRegistry>, id: SessionId) -> Self {
		Self { registry, id }
	}
}

impl Drop for RequestGuard {
	fn drop(&mut self) {
		self.registry.release_request(self.id);
	}
}
