//! Extension-side proxy for quick-pick and input widgets owned by a host editor.
//!
//! An isolated extension process cannot draw UI. It asks the host to show widgets
//! through a [`QuickOpenHost`] implementation and receives user interaction back
//! through the inbound methods on [`QuickOpenProxy`].
//!
//! Two flavours are offered:
//! - One-shot requests ([`QuickOpenProxy::show_quick_pick`], [`QuickOpenProxy::show_input`])
//!   that resolve once the user commits, dismisses, or the caller cancels.
//! - Long-lived sessions ([`QuickPick`], [`InputBox`]) whose properties can be changed
//!   while visible. Property writes made within one scheduler turn are coalesced
//!   into a single [`TransferQuickInput`] sent to the host on the next turn.
//!
//! Item identity is positional: the host only ever sees handles, and every handle
//! reported back is translated to the caller's original item.

#![warn(missing_docs)]

mod config;
mod error;
mod event;
mod item;
mod proxy;
mod registry;
mod request;
mod scheduler;
mod session;
mod workspace;

pub use config::ProxyConfig;
pub use error::{Error, Result};
pub use event::EventReceiver;
pub use item::{PickItem, Picked, QuickInputButton, QuickPickItem};
pub use proxy::QuickOpenProxy;
pub use quickopen_rpc::{
	HostEvent, InputBoxShowOptions, QuickInputKind, QuickOpenHost, QuickPickShowOptions, SessionId, ShowResult,
	TransferQuickInput, TransferQuickInputButton, TransferQuickPickItem,
};
pub use registry::Validator;
pub use request::{InputRequest, ItemSource, PickRequest};
pub use session::{InputBox, QuickPick};
pub use tokio_util::sync::CancellationToken;
pub use workspace::{WorkspaceFolder, WorkspaceFolderPickOptions};
