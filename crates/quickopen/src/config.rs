//! Proxy configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Tunables for a [`QuickOpenProxy`](crate::QuickOpenProxy).
///
/// A zero timeout disables the corresponding deadline.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyConfig {
	/// Deadline in seconds for one-shot `show` and `input` requests.
	pub request_timeout_secs: u64,
	/// Deadline in seconds for a single validator run.
	pub validation_timeout_secs: u64,
}

impl ProxyConfig {
	/// Parses a configuration from TOML text. Missing keys keep their defaults.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Returns the one-shot request deadline, if any.
	pub fn request_timeout(&self) -> Option<Duration> {
		non_zero_secs(self.request_timeout_secs)
	}

	/// Returns the validator deadline, if any.
	pub fn validation_timeout(&self) -> Option<Duration> {
		non_zero_secs(self.validation_timeout_secs)
	}
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
	(secs > 0).then(|| Duration::from_secs(secs))
}
