//! Errors surfaced by host RPC calls.

/// A convenient type alias for `Result` with `E` = [`enum@Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures reported by a [`QuickOpenHost`](crate::QuickOpenHost) implementation.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The host side of the connection went away.
	#[error("host stopped")]
	HostStopped,
	/// The host replied with an error.
	#[error("host error: {0}")]
	Host(String),
	/// The host sent a message this side cannot interpret.
	#[error("protocol error: {0}")]
	Protocol(String),
}
