//! Long-lived quick-input sessions.
//!
//! A session mirrors one host widget. Property setters update the local copy at
//! once and stage the change in a pending [`TransferQuickInput`]. While the
//! session is visible, the first staged change schedules a flush on the next
//! scheduler turn; every further write before that flush merges into the same
//! message, later writes overriding earlier ones.
//!
//! Visibility transitions always flush. A hidden session only accumulates.

#[macro_use]
mod macros;
mod input_box;
mod quick_pick;

use std::sync::Arc;

use parking_lot::Mutex;
use quickopen_rpc::{QuickInputKind, QuickOpenHost, SessionId, TransferQuickInput};
use tokio::task::AbortHandle;
use tracing::{debug, trace, warn};

pub use input_box::InputBox;
pub use quick_pick::QuickPick;

use crate::event::Emitter;
use crate::item::{QuickInputButton, transfer_buttons};
use crate::registry::SessionRegistry;
use crate::scheduler::Scheduler;

/// Shared collaborators handed to every new session.
#[derive(Clone)]
pub(crate) struct SessionContext {
	pub host: Arc<dyn QuickOpenHost>,
	pub registry: Arc<SessionRegistry>,
	pub scheduler: Scheduler,
}

/// State common to both widget kinds.
pub(crate) struct CoreState {
	pub visible: bool,
	pub disposed: bool,
	pub pending: TransferQuickInput,
	flush: Option<AbortHandle>,
	/// Set by `show()`, cleared once `did_hide` has fired for that showing.
	expecting_hide: bool,
	pub title: Option<String>,
	pub step: Option<u32>,
	pub total_steps: Option<u32>,
	pub enabled: bool,
	pub busy: bool,
	pub ignore_focus_out: bool,
	pub value: String,
	pub placeholder: Option<String>,
	pub buttons: Vec<QuickInputButton>,
}

/// Update batcher and lifecycle shared by [`QuickPick`] and [`InputBox`].
pub(crate) struct SessionCore {
	id: SessionId,
	ctx: SessionContext,
	state: Mutex<CoreState>,
	pub on_did_hide: Emitter<()>,
	pub on_did_accept: Emitter<()>,
	pub on_did_change_value: Emitter<String>,
	pub on_did_trigger_button: Emitter<QuickInputButton>,
}

impl SessionCore {
	pub fn new(id: SessionId, kind: QuickInputKind, ctx: SessionContext) -> Arc<Self> {
		let mut pending = TransferQuickInput::new(id);
		pending.kind = Some(kind);
		Arc::new(Self {
			id,
			ctx,
			state: Mutex::new(CoreState {
				visible: false,
				disposed: false,
				pending,
				flush: None,
				expecting_hide: false,
				title: None,
				step: None,
				total_steps: None,
				enabled: true,
				busy: false,
				ignore_focus_out: true,
				value: String::new(),
				placeholder: None,
				buttons: Vec::new(),
			}),
			on_did_hide: Emitter::new(),
			on_did_accept: Emitter::new(),
			on_did_change_value: Emitter::new(),
			on_did_trigger_button: Emitter::new(),
		})
	}

	pub fn id(&self) -> SessionId {
		self.id
	}

	pub fn registry(&self) -> &Arc<SessionRegistry> {
		&self.ctx.registry
	}

	/// Reads local state.
	pub fn read<R>(&self, f: impl FnOnce(&CoreState) -> R) -> R {
		f(&self.state.lock())
	}

	/// Applies a write to local and pending state, scheduling a flush when visible.
	///
	/// No-op once disposed.
	pub fn update(self: &Arc<Self>, stage: impl FnOnce(&mut CoreState)) {
		let mut state = self.state.lock();
		if state.disposed {
			trace!(id = %self.id, "quick input write after dispose ignored");
			return;
		}
		stage(&mut state);
		if state.visible {
			self.schedule_flush(&mut state);
		}
	}

	/// Makes the session visible and flushes everything staged so far.
	pub fn show(self: &Arc<Self>) {
		let mut state = self.state.lock();
		if state.disposed {
			return;
		}
		state.visible = true;
		state.expecting_hide = true;
		state.pending.visible = Some(true);
		self.schedule_flush(&mut state);
	}

	/// Hides a visible session. Hiding a hidden session does nothing.
	pub fn hide(self: &Arc<Self>) {
		let mut state = self.state.lock();
		if state.disposed || !state.visible {
			return;
		}
		state.visible = false;
		state.pending.visible = Some(false);
		self.schedule_flush(&mut state);
	}

	fn schedule_flush(self: &Arc<Self>, state: &mut CoreState) {
		// A task dropped by the runtime never clears the slot itself.
		if state.flush.as_ref().is_some_and(|flush| !flush.is_finished()) {
			return;
		}
		let this = Arc::clone(self);
		state.flush = Some(self.ctx.scheduler.defer(this.flush()));
	}

	async fn flush(self: Arc<Self>) {
		let update = {
			let mut state = self.state.lock();
			state.flush = None;
			if state.disposed || !state.pending.has_changes() {
				return;
			}
			state.pending.take()
		};
		debug!(id = %self.id, visible = ?update.visible, "quick input flush");
		if let Err(err) = self.ctx.host.create_or_update(update).await {
			warn!(id = %self.id, error = %err, "quick input update failed");
		}
	}

	/// Disposes the session. Returns false if it was already disposed.
	///
	/// Fires `did_hide` if the widget is still showing, closes every core
	/// emitter, and releases the host-side widget.
	pub fn dispose(&self) -> bool {
		let fire_hide = {
			let mut state = self.state.lock();
			if state.disposed {
				return false;
			}
			state.disposed = true;
			state.visible = false;
			if let Some(flush) = state.flush.take() {
				flush.abort();
			}
			state.pending.take();
			std::mem::take(&mut state.expecting_hide)
		};

		let registered = self.ctx.registry.remove_session(self.id);
		debug!(id = %self.id, registered, "quick input disposed");

		if fire_hide {
			self.on_did_hide.fire(());
		}
		self.on_did_hide.dispose();
		self.on_did_accept.dispose();
		self.on_did_change_value.dispose();
		self.on_did_trigger_button.dispose();

		let host = Arc::clone(&self.ctx.host);
		let id = self.id;
		self.ctx.scheduler.defer(async move {
			if let Err(err) = host.dispose(id).await {
				warn!(id = %id, error = %err, "quick input host dispose failed");
			}
		});
		true
	}

	/// Host reported a new value typed by the user.
	pub fn handle_value(&self, value: String) {
		{
			let mut state = self.state.lock();
			if state.disposed {
				return;
			}
			state.value.clone_from(&value);
		}
		self.on_did_change_value.fire(value);
	}

	/// Host reported a toolbar button press.
	pub fn handle_button(&self, handle: usize) {
		let button = self.read(|state| state.buttons.get(handle).cloned());
		match button {
			Some(button) => {
				self.on_did_trigger_button.fire(button);
			}
			None => trace!(id = %self.id, handle, "unknown button handle dropped"),
		}
	}

	/// Host hid the widget. Fires `did_hide` once per showing.
	pub fn handle_hide(&self) {
		{
			let mut state = self.state.lock();
			if state.disposed || !state.expecting_hide {
				trace!(id = %self.id, "hide for a widget not showing dropped");
				return;
			}
			state.visible = false;
			state.expecting_hide = false;
		}
		self.on_did_hide.fire(());
	}

	pub fn set_title(self: &Arc<Self>, title: Option<String>) {
		self.update(|state| {
			state.pending.title = Some(title.clone());
			state.title = title;
		});
	}

	pub fn set_step(self: &Arc<Self>, step: Option<u32>) {
		self.update(|state| {
			state.step = step;
			state.pending.step = Some(step);
		});
	}

	pub fn set_total_steps(self: &Arc<Self>, total_steps: Option<u32>) {
		self.update(|state| {
			state.total_steps = total_steps;
			state.pending.total_steps = Some(total_steps);
		});
	}

	pub fn set_enabled(self: &Arc<Self>, enabled: bool) {
		self.update(|state| {
			state.enabled = enabled;
			state.pending.enabled = Some(enabled);
		});
	}

	pub fn set_busy(self: &Arc<Self>, busy: bool) {
		self.update(|state| {
			state.busy = busy;
			state.pending.busy = Some(busy);
		});
	}

	pub fn set_ignore_focus_out(self: &Arc<Self>, ignore_focus_out: bool) {
		self.update(|state| {
			state.ignore_focus_out = ignore_focus_out;
			state.pending.ignore_focus_out = Some(ignore_focus_out);
		});
	}

	pub fn set_value(self: &Arc<Self>, value: String) {
		self.update(|state| {
			state.pending.value = Some(value.clone());
			state.value = value;
		});
	}

	pub fn set_placeholder(self: &Arc<Self>, placeholder: Option<String>) {
		self.update(|state| {
			state.pending.placeholder = Some(placeholder.clone());
			state.placeholder = placeholder;
		});
	}

	pub fn set_buttons(self: &Arc<Self>, buttons: Vec<QuickInputButton>) {
		self.update(|state| {
			state.pending.buttons = Some(transfer_buttons(&buttons));
			state.buttons = buttons;
		});
	}
}
