use std::sync::Arc;

use parking_lot::Mutex;
use quickopen_rpc::{QuickInputKind, SessionId};
use tracing::trace;

use super::{SessionContext, SessionCore};
use crate::event::{Emitter, EventReceiver};
use crate::item::{PickItem, transfer_items};
use crate::registry::SessionEvents;

struct PickState<T> {
	items: Vec<T>,
	/// Handle of `items[0]`. Advances past the previous list on every
	/// assignment so handles from an older list never resolve.
	handle_base: usize,
	active_items: Vec<T>,
	selected_items: Vec<T>,
	can_select_many: bool,
	match_on_description: bool,
	match_on_detail: bool,
}

impl<T: Clone> PickState<T> {
	fn item(&self, handle: usize) -> Option<&T> {
		handle.checked_sub(self.handle_base).and_then(|index| self.items.get(index))
	}

	fn resolve(&self, handles: &[usize]) -> Vec<T> {
		handles.iter().filter_map(|&handle| self.item(handle)).cloned().collect()
	}

	fn handles_of(&self, items: &[T]) -> Vec<usize>
	where
		T: PartialEq,
	{
		items
			.iter()
			.filter_map(|item| self.items.iter().position(|candidate| candidate == item))
			.map(|index| self.handle_base + index)
			.collect()
	}
}

struct QuickPickInner<T> {
	core: Arc<SessionCore>,
	state: Mutex<PickState<T>>,
	on_did_change_active: Emitter<Vec<T>>,
	on_did_change_selection: Emitter<Vec<T>>,
}

impl<T: PickItem> SessionEvents for QuickPickInner<T> {
	fn did_change_value(&self, value: String) {
		self.core.handle_value(value);
	}

	fn did_accept(&self) {
		self.core.on_did_accept.fire(());
	}

	fn did_change_active(&self, handles: &[usize]) {
		let items = {
			let mut state = self.state.lock();
			let items = state.resolve(handles);
			state.active_items.clone_from(&items);
			items
		};
		self.on_did_change_active.fire(items);
	}

	fn did_change_selection(&self, handles: &[usize]) {
		let items = {
			let mut state = self.state.lock();
			let items = state.resolve(handles);
			state.selected_items.clone_from(&items);
			items
		};
		self.on_did_change_selection.fire(items);
	}

	fn did_trigger_button(&self, handle: usize) {
		self.core.handle_button(handle);
	}

	fn did_hide(&self) {
		self.core.handle_hide();
	}
}

/// A long-lived pick list whose items and properties can change while shown.
///
/// Cloning yields another handle to the same session. Call
/// [`QuickPick::dispose`] when done; the session stays registered until then.
pub struct QuickPick<T> {
	inner: Arc<QuickPickInner<T>>,
}

impl<T> Clone for QuickPick<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> std::fmt::Debug for QuickPick<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("QuickPick")
			.field("id", &self.inner.core.id())
			.finish_non_exhaustive()
	}
}

impl<T: PickItem> QuickPick<T> {
	pub(crate) fn new(id: SessionId, ctx: SessionContext) -> Self {
		let core = SessionCore::new(id, QuickInputKind::QuickPick, ctx);
		let inner = Arc::new(QuickPickInner {
			core: Arc::clone(&core),
			state: Mutex::new(PickState {
				items: Vec::new(),
				handle_base: 0,
				active_items: Vec::new(),
				selected_items: Vec::new(),
				can_select_many: false,
				match_on_description: false,
				match_on_detail: false,
			}),
			on_did_change_active: Emitter::new(),
			on_did_change_selection: Emitter::new(),
		});
		core.registry().insert_session(id, inner.clone());
		trace!(id = %id, "quick pick created");
		Self { inner }
	}

	fn core(&self) -> &Arc<SessionCore> {
		&self.inner.core
	}

	/// Releases the session. Safe to call more than once.
	pub fn dispose(&self) {
		if self.core().dispose() {
			self.inner.on_did_change_active.dispose();
			self.inner.on_did_change_selection.dispose();
		}
	}

	/// Current item list.
	pub fn items(&self) -> Vec<T> {
		self.inner.state.lock().items.clone()
	}

	/// Replaces the item list.
	///
	/// Handles reported by the host for the previous list stop resolving, and
	/// the active and selected items are cleared along with it.
	pub fn set_items(&self, items: impl IntoIterator<Item = T>) {
		if self.is_disposed() {
			return;
		}
		let items: Vec<T> = items.into_iter().collect();
		let transfer = {
			let mut state = self.inner.state.lock();
			state.handle_base += state.items.len();
			let transfer = transfer_items(&items, state.handle_base);
			state.items = items;
			state.active_items.clear();
			state.selected_items.clear();
			transfer
		};
		self.core().update(|core| {
			core.pending.items = Some(transfer);
			// Staged handles point into the replaced list.
			core.pending.active_items = None;
			core.pending.selected_items = None;
		});
	}

	/// Whether several items can be checked.
	pub fn can_select_many(&self) -> bool {
		self.inner.state.lock().can_select_many
	}

	/// Allows checking several items.
	pub fn set_can_select_many(&self, can_select_many: bool) {
		if self.is_disposed() {
			return;
		}
		self.inner.state.lock().can_select_many = can_select_many;
		self.core().update(|core| core.pending.can_select_many = Some(can_select_many));
	}

	/// Whether the host filters on descriptions too.
	pub fn match_on_description(&self) -> bool {
		self.inner.state.lock().match_on_description
	}

	/// Lets the host filter on descriptions too.
	pub fn set_match_on_description(&self, match_on_description: bool) {
		if self.is_disposed() {
			return;
		}
		self.inner.state.lock().match_on_description = match_on_description;
		self.core()
			.update(|core| core.pending.match_on_description = Some(match_on_description));
	}

	/// Whether the host filters on details too.
	pub fn match_on_detail(&self) -> bool {
		self.inner.state.lock().match_on_detail
	}

	/// Lets the host filter on details too.
	pub fn set_match_on_detail(&self, match_on_detail: bool) {
		if self.is_disposed() {
			return;
		}
		self.inner.state.lock().match_on_detail = match_on_detail;
		self.core().update(|core| core.pending.match_on_detail = Some(match_on_detail));
	}

	/// Focused items, as last set locally or reported by the host.
	pub fn active_items(&self) -> Vec<T> {
		self.inner.state.lock().active_items.clone()
	}

	/// Focuses the given items. Items not in the current list are ignored by the host.
	pub fn set_active_items(&self, items: Vec<T>)
	where
		T: PartialEq,
	{
		if self.is_disposed() {
			return;
		}
		let handles = {
			let mut state = self.inner.state.lock();
			let handles = state.handles_of(&items);
			state.active_items = items;
			handles
		};
		self.core().update(|core| core.pending.active_items = Some(handles));
	}

	/// Checked items, as last set locally or reported by the host.
	pub fn selected_items(&self) -> Vec<T> {
		self.inner.state.lock().selected_items.clone()
	}

	/// Checks the given items.
	pub fn set_selected_items(&self, items: Vec<T>)
	where
		T: PartialEq,
	{
		if self.is_disposed() {
			return;
		}
		let handles = {
			let mut state = self.inner.state.lock();
			let handles = state.handles_of(&items);
			state.selected_items = items;
			handles
		};
		self.core().update(|core| core.pending.selected_items = Some(handles));
	}

	/// Fires with the focused items whenever focus moves.
	pub fn on_did_change_active(&self) -> EventReceiver<Vec<T>> {
		self.inner.on_did_change_active.subscribe()
	}

	/// Fires with the checked items whenever they change.
	pub fn on_did_change_selection(&self) -> EventReceiver<Vec<T>> {
		self.inner.on_did_change_selection.subscribe()
	}
}

quick_input_accessors!(impl[T: PickItem] QuickPick<T>);
