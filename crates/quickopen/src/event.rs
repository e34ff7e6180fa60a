//! Session-local publish/subscribe channels.

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Receiving end of a session event subscription.
///
/// Yields `None` once the owning session is disposed.
pub type EventReceiver<T> = mpsc::UnboundedReceiver<T>;

/// Fan-out channel for one kind of event.
///
/// Every subscriber gets its own unbounded queue. Dropped receivers are pruned
/// on the next [`Emitter::fire`]. After [`Emitter::dispose`] new subscriptions
/// are closed from the start and firing is a no-op.
#[derive(Debug)]
pub(crate) struct Emitter<T> {
	subscribers: Mutex<Option<Vec<mpsc::UnboundedSender<T>>>>,
}

impl<T> Default for Emitter<T> {
	fn default() -> Self {
		Self {
			subscribers: Mutex::new(Some(Vec::new())),
		}
	}
}

impl<T: Clone> Emitter<T> {
	/// Creates an emitter without subscribers.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a new subscriber.
	pub fn subscribe(&self) -> EventReceiver<T> {
		let (tx, rx) = mpsc::unbounded_channel();
		if let Some(subscribers) = self.subscribers.lock().as_mut() {
			subscribers.push(tx);
		}
		rx
	}

	/// Delivers `event` to every live subscriber and returns how many received it.
	pub fn fire(&self, event: T) -> usize {
		let mut guard = self.subscribers.lock();
		let Some(subscribers) = guard.as_mut() else {
			return 0;
		};
		subscribers.retain(|tx| tx.send(event.clone()).is_ok());
		subscribers.len()
	}

	/// Closes every subscription.
	pub fn dispose(&self) {
		self.subscribers.lock().take();
	}
}
