//! One-shot request builders.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use quickopen_rpc::{InputBoxShowOptions, QuickPickShowOptions};
use tokio_util::sync::CancellationToken;

use crate::item::PickItem;
use crate::registry::{Validator, validator_fn};

/// Items of a one-shot pick, available now or produced later.
pub enum ItemSource<T> {
	/// Items known up front.
	Ready(Vec<T>),
	/// Items still being computed. The widget opens immediately and shows them
	/// once the future resolves.
	Deferred(BoxFuture<'static, anyhow::Result<Vec<T>>>),
}

impl<T> ItemSource<T> {
	pub(crate) async fn resolve(self) -> anyhow::Result<Vec<T>> {
		match self {
			Self::Ready(items) => Ok(items),
			Self::Deferred(fut) => fut.await,
		}
	}
}

impl<T> std::fmt::Debug for ItemSource<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Ready(items) => f.debug_tuple("Ready").field(&items.len()).finish(),
			Self::Deferred(_) => f.write_str("Deferred"),
		}
	}
}

/// One-shot pick request.
pub struct PickRequest<T> {
	pub(crate) items: ItemSource<T>,
	pub(crate) options: QuickPickShowOptions,
	pub(crate) on_did_select_item: Option<Arc<dyn Fn(T) + Send + Sync>>,
	pub(crate) cancellation: Option<CancellationToken>,
}

impl<T: PickItem> PickRequest<T> {
	/// Construct a request over a known list.
	pub fn new(items: impl IntoIterator<Item = T>) -> Self {
		Self::from_source(ItemSource::Ready(items.into_iter().collect()))
	}

	/// Construct a request whose items are still being computed.
	pub fn deferred(items: impl Future<Output = anyhow::Result<Vec<T>>> + Send + 'static) -> Self {
		Self::from_source(ItemSource::Deferred(items.boxed()))
	}

	fn from_source(items: ItemSource<T>) -> Self {
		Self {
			items,
			options: QuickPickShowOptions::default(),
			on_did_select_item: None,
			cancellation: None,
		}
	}

	/// Replace all display options.
	#[must_use]
	pub fn with_options(mut self, options: QuickPickShowOptions) -> Self {
		self.options = options;
		self
	}

	/// Set the widget title.
	#[must_use]
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.options.title = Some(title.into());
		self
	}

	/// Set the filter box hint.
	#[must_use]
	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.options.placeholder = Some(placeholder.into());
		self
	}

	/// Allow checking several items.
	#[must_use]
	pub fn can_pick_many(mut self, can_pick_many: bool) -> Self {
		self.options.can_pick_many = can_pick_many;
		self
	}

	/// Observe live selection before the user commits.
	#[must_use]
	pub fn on_did_select_item(mut self, listener: impl Fn(T) + Send + Sync + 'static) -> Self {
		self.on_did_select_item = Some(Arc::new(listener));
		self
	}

	/// Resolve to `None` as soon as `token` is cancelled.
	#[must_use]
	pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
		self.cancellation = Some(token);
		self
	}
}

/// One-shot text input request.
#[derive(Default)]
pub struct InputRequest {
	pub(crate) options: InputBoxShowOptions,
	pub(crate) validator: Option<Validator>,
	pub(crate) cancellation: Option<CancellationToken>,
}

impl InputRequest {
	/// Construct a request with default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace all display options.
	#[must_use]
	pub fn with_options(mut self, options: InputBoxShowOptions) -> Self {
		self.options = options;
		self
	}

	/// Set the text shown under the field.
	#[must_use]
	pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
		self.options.prompt = Some(prompt.into());
		self
	}

	/// Pre-fill the field.
	#[must_use]
	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.options.value = Some(value.into());
		self
	}

	/// Mask the typed characters.
	#[must_use]
	pub fn password(mut self, password: bool) -> Self {
		self.options.password = password;
		self
	}

	/// Validate candidate values while the user types.
	#[must_use]
	pub fn validate_with<F, Fut>(mut self, validate: F) -> Self
	where
		F: Fn(String) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
	{
		self.validator = Some(validator_fn(validate));
		self
	}

	/// Resolve to `None` as soon as `token` is cancelled.
	#[must_use]
	pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
		self.cancellation = Some(token);
		self
	}
}

impl std::fmt::Debug for InputRequest {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("InputRequest")
			.field("options", &self.options)
			.field("has_validator", &self.validator.is_some())
			.finish_non_exhaustive()
	}
}
