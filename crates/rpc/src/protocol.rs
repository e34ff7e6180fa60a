//! Wire types exchanged with the host.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identifier of one quick-input session or one-shot request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Monotonic session identifier generator.
///
/// Clones share the same counter, so every id handed out by any clone is unique
/// for the lifetime of the process.
#[derive(Debug, Default, Clone)]
pub struct SessionIdGen {
	next: Arc<AtomicU64>,
}

impl SessionIdGen {
	/// Creates a generator whose first id is 1.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next unique id.
	#[allow(clippy::should_implement_trait, reason = "convention")]
	pub fn next(&self) -> SessionId {
		SessionId(self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1))
	}
}

/// Widget flavour of a long-lived session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuickInputKind {
	/// A selectable list with a filter box.
	QuickPick,
	/// A single free-text field.
	InputBox,
}

/// Host view of one pick item.
///
/// Only presentation fields travel; caller-side data stays on the extension side
/// and is recovered through `handle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferQuickPickItem {
	/// Position-derived identity of the item within its list.
	pub handle: usize,
	/// Primary text.
	pub label: String,
	/// Secondary text shown on the same line.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Secondary text shown on a separate line.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
	/// Initial checked state in multi-select lists.
	#[serde(default)]
	pub picked: bool,
}

/// Host view of a toolbar button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferQuickInputButton {
	/// Position of the button in the session's button list.
	pub handle: usize,
	/// Icon identifier understood by the host.
	pub icon: String,
	/// Hover text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tooltip: Option<String>,
}

/// Display options of a one-shot pick request.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickPickShowOptions {
	/// Widget title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Hint shown in the empty filter box.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub placeholder: Option<String>,
	/// Let the host filter on descriptions too.
	#[serde(default)]
	pub match_on_description: bool,
	/// Let the host filter on details too.
	#[serde(default)]
	pub match_on_detail: bool,
	/// Keep the widget open when focus moves elsewhere.
	#[serde(default)]
	pub ignore_focus_out: bool,
	/// Allow checking several items.
	#[serde(default)]
	pub can_pick_many: bool,
}

/// Display options of a one-shot input request.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBoxShowOptions {
	/// Widget title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Pre-filled value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	/// Pre-selected range of `value` as `(start, end)` character offsets.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value_selection: Option<(usize, usize)>,
	/// Text shown under the field.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub prompt: Option<String>,
	/// Hint shown in the empty field.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub placeholder: Option<String>,
	/// Mask the typed characters.
	#[serde(default)]
	pub password: bool,
	/// Keep the widget open when focus moves elsewhere.
	#[serde(default)]
	pub ignore_focus_out: bool,
}

/// Resolution of a one-shot pick as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShowResult {
	/// A single committed handle.
	One(usize),
	/// Committed handles of a multi-select pick.
	Many(Vec<usize>),
	/// The widget closed without a choice.
	Dismissed,
}

/// Partial state of a long-lived session.
///
/// Every field other than `id` is optional: `None` means "unchanged". Fields whose
/// value can itself be absent use a nested option so that clearing is
/// distinguishable from leaving alone; a cleared field serializes as `null`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferQuickInput {
	/// Session this update belongs to.
	pub id: SessionId,
	/// Widget flavour, staged once on creation.
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<QuickInputKind>,
	/// Widget title.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<Option<String>>,
	/// Current wizard step.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub step: Option<Option<u32>>,
	/// Number of wizard steps.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub total_steps: Option<Option<u32>>,
	/// Whether the widget accepts input.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	/// Whether a progress indicator is shown.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub busy: Option<bool>,
	/// Whether the widget is shown.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub visible: Option<bool>,
	/// Keep the widget open when focus moves elsewhere.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ignore_focus_out: Option<bool>,
	/// Text in the filter box or input field.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	/// Hint shown in the empty field.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub placeholder: Option<Option<String>>,
	/// Toolbar buttons.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub buttons: Option<Vec<TransferQuickInputButton>>,
	/// Full replacement of the item list.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub items: Option<Vec<TransferQuickPickItem>>,
	/// Handles of the focused items.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub active_items: Option<Vec<usize>>,
	/// Handles of the checked items.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub selected_items: Option<Vec<usize>>,
	/// Allow checking several items.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub can_select_many: Option<bool>,
	/// Let the host filter on descriptions too.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub match_on_description: Option<bool>,
	/// Let the host filter on details too.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub match_on_detail: Option<bool>,
	/// Mask the typed characters.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub password: Option<bool>,
	/// Text shown under the field.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub prompt: Option<Option<String>>,
	/// Error shown under the field.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub validation_message: Option<Option<String>>,
	/// Selected range of `value`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value_selection: Option<Option<(usize, usize)>>,
}

impl TransferQuickInput {
	/// Creates an update carrying only the session id.
	#[must_use]
	pub fn new(id: SessionId) -> Self {
		Self { id, ..Self::default() }
	}

	/// Returns true if any field besides `id` is staged.
	pub fn has_changes(&self) -> bool {
		*self != Self::new(self.id)
	}

	/// Moves the staged fields out, leaving an empty update for the same session.
	pub fn take(&mut self) -> Self {
		std::mem::replace(self, Self::new(self.id))
	}
}

/// Message sent by the host to the extension side.
///
/// All variants except [`HostEvent::ValidateInput`] are notifications;
/// `ValidateInput` expects the validation message as its reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum HostEvent {
	/// Live selection in a one-shot pick.
	ItemSelected {
		/// Request id.
		id: SessionId,
		/// Handle of the hovered item.
		handle: usize,
	},
	/// Candidate value awaiting validation.
	ValidateInput {
		/// Request or session id.
		id: SessionId,
		/// Current text.
		value: String,
	},
	/// The user typed in a session's field.
	DidChangeValue {
		/// Session id.
		id: SessionId,
		/// Current text.
		value: String,
	},
	/// The user committed a session.
	DidAccept {
		/// Session id.
		id: SessionId,
	},
	/// Focus moved within a quick-pick session.
	DidChangeActive {
		/// Session id.
		id: SessionId,
		/// Handles of the focused items.
		handles: Vec<usize>,
	},
	/// Checked items changed within a quick-pick session.
	DidChangeSelection {
		/// Session id.
		id: SessionId,
		/// Handles of the checked items.
		handles: Vec<usize>,
	},
	/// A toolbar button was pressed.
	DidTriggerButton {
		/// Session id.
		id: SessionId,
		/// Handle of the button.
		handle: usize,
	},
	/// The host hid a session's widget.
	DidHide {
		/// Session id.
		id: SessionId,
	},
}

impl HostEvent {
	/// Returns the session or request the event targets.
	pub fn id(&self) -> SessionId {
		match self {
			Self::ItemSelected { id, .. }
			| Self::ValidateInput { id, .. }
			| Self::DidChangeValue { id, .. }
			| Self::DidAccept { id }
			| Self::DidChangeActive { id, .. }
			| Self::DidChangeSelection { id, .. }
			| Self::DidTriggerButton { id, .. }
			| Self::DidHide { id } => *id,
		}
	}
}
