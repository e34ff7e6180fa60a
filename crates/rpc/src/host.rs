//! Outbound calls into the host process.

use async_trait::async_trait;

use crate::Result;
use crate::protocol::{
	InputBoxShowOptions, QuickPickShowOptions, SessionId, ShowResult, TransferQuickInput, TransferQuickPickItem,
};

/// RPC surface of the host editor's quick-open service.
///
/// Implementations forward each call over whatever channel connects the
/// extension process to the host. The channel is assumed reliable and ordered;
/// no call is retried or batched at this boundary.
#[async_trait]
pub trait QuickOpenHost: Send + Sync + 'static {
	/// Opens a one-shot pick widget and resolves once the user commits or dismisses it.
	///
	/// Items follow separately through [`Self::set_items`] or [`Self::set_error`].
	async fn show(&self, id: SessionId, options: QuickPickShowOptions) -> Result<ShowResult>;

	/// Populates a one-shot pick widget.
	async fn set_items(&self, id: SessionId, items: Vec<TransferQuickPickItem>) -> Result<()>;

	/// Reports that the item list for a one-shot pick could not be produced.
	async fn set_error(&self, id: SessionId, message: String) -> Result<()>;

	/// Opens a one-shot input widget and resolves with the accepted text.
	///
	/// When `validate_input` is set the host asks for validation of candidate
	/// values under the same `id`.
	async fn input(&self, id: SessionId, options: InputBoxShowOptions, validate_input: bool) -> Result<Option<String>>;

	/// Creates a long-lived widget on first sight of `update.id`, otherwise merges
	/// the staged fields into it.
	async fn create_or_update(&self, update: TransferQuickInput) -> Result<()>;

	/// Releases the host-side widget of a long-lived session.
	async fn dispose(&self, id: SessionId) -> Result<()>;
}
