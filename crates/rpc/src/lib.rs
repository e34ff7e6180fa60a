//! Host-facing RPC surface for remote quick-open widgets.
//!
//! This crate defines the contract between an isolated extension process and the
//! host editor that owns the actual widgets:
//! * [`QuickOpenHost`]: Outbound calls the extension side makes into the host
//! * [`HostEvent`]: Inbound notifications and requests the host sends back
//! * [`TransferQuickInput`]: Partial widget state, merged and flushed in batches
//! * [`SessionIdGen`]: Process-unique session identifiers
//!
//! The transport itself is owned by the embedder; nothing here reads or writes bytes.

#![warn(missing_docs)]

pub mod error;
pub mod host;
pub mod protocol;

pub use error::{Error, Result};
pub use host::QuickOpenHost;
pub use protocol::{
	HostEvent, InputBoxShowOptions, QuickInputKind, QuickPickShowOptions, SessionId, SessionIdGen,
	ShowResult, TransferQuickInput, TransferQuickInputButton, TransferQuickPickItem,
};
