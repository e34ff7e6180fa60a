//! Caller-side pick items and their host projections.

use quickopen_rpc::{TransferQuickInputButton, TransferQuickPickItem};
use serde::{Deserialize, Serialize};

/// A pick list entry.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPickItem {
	/// Primary text.
	pub label: String,
	/// Secondary text shown on the same line.
	#[serde(default)]
	pub description: Option<String>,
	/// Secondary text shown on a separate line.
	#[serde(default)]
	pub detail: Option<String>,
	/// Caller-side identifier. Never sent to the host.
	#[serde(default)]
	pub id: Option<String>,
	/// Initial checked state in multi-select lists.
	#[serde(default)]
	pub picked: bool,
}

impl QuickPickItem {
	/// Creates an item with only a label.
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			..Self::default()
		}
	}

	/// Sets the description.
	#[must_use]
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Sets the detail line.
	#[must_use]
	pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
		self.detail = Some(detail.into());
		self
	}

	/// Sets the caller-side identifier.
	#[must_use]
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = Some(id.into());
		self
	}

	/// Sets the initial checked state.
	#[must_use]
	pub fn with_picked(mut self, picked: bool) -> Self {
		self.picked = picked;
		self
	}
}

impl From<&str> for QuickPickItem {
	fn from(label: &str) -> Self {
		Self::new(label)
	}
}

impl From<String> for QuickPickItem {
	fn from(label: String) -> Self {
		Self::new(label)
	}
}

/// Anything that can be offered in a pick list.
///
/// The value itself stays on the extension side; the host only receives the
/// presentation returned by [`PickItem::to_quick_pick_item`].
pub trait PickItem: Clone + Send + Sync + 'static {
	/// Presentation of this value.
	fn to_quick_pick_item(&self) -> QuickPickItem;
}

impl PickItem for QuickPickItem {
	fn to_quick_pick_item(&self) -> QuickPickItem {
		self.clone()
	}
}

impl PickItem for String {
	fn to_quick_pick_item(&self) -> QuickPickItem {
		QuickPickItem::new(self.as_str())
	}
}

impl PickItem for &'static str {
	fn to_quick_pick_item(&self) -> QuickPickItem {
		QuickPickItem::new(*self)
	}
}

/// Projects `items` for the host, numbering handles from `base`.
pub(crate) fn transfer_items<T: PickItem>(items: &[T], base: usize) -> Vec<TransferQuickPickItem> {
	items
		.iter()
		.enumerate()
		.map(|(index, item)| {
			let QuickPickItem {
				label,
				description,
				detail,
				picked,
				..
			} = item.to_quick_pick_item();
			TransferQuickPickItem {
				handle: base + index,
				label,
				description,
				detail,
				picked,
			}
		})
		.collect()
}

/// A toolbar button on a long-lived session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickInputButton {
	/// Icon identifier understood by the host.
	pub icon: String,
	/// Hover text.
	#[serde(default)]
	pub tooltip: Option<String>,
}

impl QuickInputButton {
	/// Creates a button without tooltip.
	pub fn new(icon: impl Into<String>) -> Self {
		Self {
			icon: icon.into(),
			tooltip: None,
		}
	}

	/// Sets the hover text.
	#[must_use]
	pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
		self.tooltip = Some(tooltip.into());
		self
	}
}

pub(crate) fn transfer_buttons(buttons: &[QuickInputButton]) -> Vec<TransferQuickInputButton> {
	buttons
		.iter()
		.enumerate()
		.map(|(handle, button)| TransferQuickInputButton {
			handle,
			icon: button.icon.clone(),
			tooltip: button.tooltip.clone(),
		})
		.collect()
}

/// Committed result of a one-shot pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Picked<T> {
	/// Single-select result.
	One(T),
	/// Multi-select result, possibly empty.
	Many(Vec<T>),
}

impl<T> Picked<T> {
	/// Returns the single pick, or `None` for a multi-select result.
	pub fn into_one(self) -> Option<T> {
		match self {
			Self::One(item) => Some(item),
			Self::Many(_) => None,
		}
	}

	/// Flattens either shape into a list.
	pub fn into_vec(self) -> Vec<T> {
		match self {
			Self::One(item) => vec![item],
			Self::Many(items) => items,
		}
	}
}
