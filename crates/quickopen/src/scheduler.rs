//! Deferred task execution for flushes and fire-and-forget host calls.

use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Handle, Runtime};
use tokio::task::{AbortHandle, JoinHandle};

fn fallback_handle() -> Handle {
	static FALLBACK_RT: OnceLock<Runtime> = OnceLock::new();
	let runtime = FALLBACK_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("quickopen-scheduler")
			.build()
			.expect("failed to build quickopen fallback tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns work onto the runtime the proxy was created on.
///
/// Spawned tasks only run once the spawning task yields. On a current-thread
/// runtime this means everything done synchronously in one turn is observed by
/// the task as a whole, which is what update coalescing relies on.
#[derive(Debug, Clone)]
pub(crate) struct Scheduler {
	handle: Handle,
}

impl Scheduler {
	/// Captures the ambient tokio runtime.
	///
	/// Outside a runtime a process-wide single-worker runtime is used instead.
	pub fn current() -> Self {
		let handle = Handle::try_current().unwrap_or_else(|_| fallback_handle());
		Self { handle }
	}

	/// Spawns a task and returns its join handle.
	pub fn spawn<F>(&self, fut: F) -> JoinHandle<F::Output>
	where
		F: Future + Send + 'static,
		F::Output: Send + 'static,
	{
		tracing::trace!("quickopen.spawn");
		self.handle.spawn(fut)
	}

	/// Spawns a detached task for a later turn, returning a handle to cancel it.
	pub fn defer<F>(&self, fut: F) -> AbortHandle
	where
		F: Future<Output = ()> + Send + 'static,
	{
		tracing::trace!("quickopen.defer");
		self.handle.spawn(fut).abort_handle()
	}
}
