//! Workspace folders offered by [`QuickOpenProxy::show_workspace_folder_pick`](crate::QuickOpenProxy::show_workspace_folder_pick).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::item::{PickItem, QuickPickItem};

/// One root folder of the open workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceFolder {
	/// Location of the folder.
	pub uri: Url,
	/// Display name, usually the last path component.
	pub name: String,
	/// Position in the workspace's folder list.
	pub index: usize,
}

impl WorkspaceFolder {
	/// Builds a folder from an absolute directory path.
	///
	/// Returns `None` for relative paths.
	pub fn from_path(path: &Path, index: usize) -> Option<Self> {
		let uri = Url::from_directory_path(path).ok()?;
		let name = path
			.file_name()
			.map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
		Some(Self { uri, name, index })
	}

	fn location(&self) -> String {
		self.uri
			.to_file_path()
			.map_or_else(|()| self.uri.to_string(), |path| path.components().collect::<PathBuf>().display().to_string())
	}
}

impl PickItem for WorkspaceFolder {
	fn to_quick_pick_item(&self) -> QuickPickItem {
		QuickPickItem::new(self.name.as_str()).with_description(self.location())
	}
}

/// Options of a workspace folder pick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WorkspaceFolderPickOptions {
	/// Hint shown in the empty filter box.
	pub placeholder: Option<String>,
	/// Keep the widget open when focus moves elsewhere.
	pub ignore_focus_out: bool,
}
