use std::sync::Arc;

use parking_lot::Mutex;
use quickopen_rpc::{QuickInputKind, SessionId};
use tracing::trace;

use super::{SessionContext, SessionCore};
use crate::registry::SessionEvents;

#[derive(Default)]
struct InputState {
	password: bool,
	prompt: Option<String>,
	validation_message: Option<String>,
	value_selection: Option<(usize, usize)>,
}

struct InputBoxInner {
	core: Arc<SessionCore>,
	state: Mutex<InputState>,
}

impl SessionEvents for InputBoxInner {
	fn did_change_value(&self, value: String) {
		self.core.handle_value(value);
	}

	fn did_accept(&self) {
		self.core.on_did_accept.fire(());
	}

	fn did_change_active(&self, handles: &[usize]) {
		trace!(id = %self.core.id(), ?handles, "active items reported for input box");
	}

	fn did_change_selection(&self, handles: &[usize]) {
		trace!(id = %self.core.id(), ?handles, "selection reported for input box");
	}

	fn did_trigger_button(&self, handle: usize) {
		self.core.handle_button(handle);
	}

	fn did_hide(&self) {
		self.core.handle_hide();
	}
}

/// A long-lived text field whose properties can change while shown.
///
/// Validation is driven by the caller: listen on
/// [`InputBox::on_did_change_value`] and set [`InputBox::set_validation_message`].
#[derive(Clone)]
pub struct InputBox {
	inner: Arc<InputBoxInner>,
}

impl std::fmt::Debug for InputBox {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("InputBox")
			.field("id", &self.inner.core.id())
			.finish_non_exhaustive()
	}
}

impl InputBox {
	pub(crate) fn new(id: SessionId, ctx: SessionContext) -> Self {
		let core = SessionCore::new(id, QuickInputKind::InputBox, ctx);
		let inner = Arc::new(InputBoxInner {
			core: Arc::clone(&core),
			state: Mutex::new(InputState::default()),
		});
		core.registry().insert_session(id, inner.clone());
		trace!(id = %id, "input box created");
		Self { inner }
	}

	fn core(&self) -> &Arc<SessionCore> {
		&self.inner.core
	}

	/// Releases the session. Safe to call more than once.
	pub fn dispose(&self) {
		self.core().dispose();
	}

	/// Whether typed characters are masked.
	pub fn password(&self) -> bool {
		self.inner.state.lock().password
	}

	/// Masks typed characters.
	pub fn set_password(&self, password: bool) {
		if self.is_disposed() {
			return;
		}
		self.inner.state.lock().password = password;
		self.core().update(|core| core.pending.password = Some(password));
	}

	/// Text shown under the field.
	pub fn prompt(&self) -> Option<String> {
		self.inner.state.lock().prompt.clone()
	}

	/// Sets the text shown under the field.
	pub fn set_prompt(&self, prompt: Option<String>) {
		if self.is_disposed() {
			return;
		}
		self.inner.state.lock().prompt.clone_from(&prompt);
		self.core().update(|core| core.pending.prompt = Some(prompt));
	}

	/// Error shown under the field.
	pub fn validation_message(&self) -> Option<String> {
		self.inner.state.lock().validation_message.clone()
	}

	/// Shows or clears an error under the field.
	pub fn set_validation_message(&self, message: Option<String>) {
		if self.is_disposed() {
			return;
		}
		self.inner.state.lock().validation_message.clone_from(&message);
		self.core().update(|core| core.pending.validation_message = Some(message));
	}

	/// Selected range of the value.
	pub fn value_selection(&self) -> Option<(usize, usize)> {
		self.inner.state.lock().value_selection
	}

	/// Selects a range of the value as `(start, end)` character offsets.
	pub fn set_value_selection(&self, selection: Option<(usize, usize)>) {
		if self.is_disposed() {
			return;
		}
		self.inner.state.lock().value_selection = selection;
		self.core().update(|core| core.pending.value_selection = Some(selection));
	}
}

quick_input_accessors!(impl[] InputBox);
