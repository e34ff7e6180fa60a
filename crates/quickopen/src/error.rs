/// A convenient type alias for `Result` with `E` = [`enum@Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// A host call failed.
	#[error(transparent)]
	Rpc(#[from] quickopen_rpc::Error),
	/// The caller's item supplier failed. The host has been told to close the widget.
	#[error("failed to resolve quick pick items: {0:#}")]
	Items(anyhow::Error),
	/// An input validator failed.
	#[error("input validation failed: {0:#}")]
	Validation(anyhow::Error),
	/// A host request or validator exceeded its configured deadline.
	#[error("{0} timed out")]
	Timeout(&'static str),
	/// Configuration could not be parsed.
	#[error("invalid configuration: {0}")]
	Config(#[from] toml::de::Error),
}
