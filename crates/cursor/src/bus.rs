use std::fmt;
use std::future::Future;
use std::sync::Arc;

use affix_primitives::{BoxFutureStatic, CursorNotification};
use futures::future::join_all;
use parking_lot::Mutex;

use crate::source::CursorSource;

/// Type-erased cursor notification handler.
pub type CursorHandler = Arc<dyn Fn(Arc<CursorNotification>) -> BoxFutureStatic<()> + Send + Sync>;

/// Handle returned by [`CursorBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct BusState {
	subscribers: Vec<(SubscriptionId, CursorHandler)>,
	next_id: u64,
	source: CursorSource,
	delivered: u64,
}

/// Fan-out dispatcher for cursor notifications.
///
/// Cheap to clone; clones share subscribers and the source. Handlers are
/// called in registration order, each returning a future; all futures are
/// created before any is awaited and [`notify`](Self::notify) returns once
/// every one of them has completed.
#[derive(Clone)]
pub struct CursorBus {
	state: Arc<Mutex<BusState>>,
}

impl CursorBus {
	pub fn new(source: CursorSource) -> Self {
		Self {
			state: Arc::new(Mutex::new(BusState {
				subscribers: Vec::new(),
				next_id: 0,
				source,
				delivered: 0,
			})),
		}
	}

	/// Subscribes an async handler.
	///
	/// The same handler subscribed twice runs twice per notification.
	pub fn subscribe<F, Fut>(&self, handler: F) -> SubscriptionId
	where
		F: Fn(Arc<CursorNotification>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = ()> + Send + 'static,
	{
		self.subscribe_handler(Arc::new(move |notification| Box::pin(handler(notification))))
	}

	/// Subscribes an already type-erased handler.
	///
	/// Starts observing the cursor marker if no observation is active.
	pub fn subscribe_handler(&self, handler: CursorHandler) -> SubscriptionId {
		let mut state = self.state.lock();
		let id = SubscriptionId(state.next_id);
		state.next_id += 1;
		state.subscribers.push((id, handler));
		if !state.source.is_observing() {
			state.source.observe();
		}
		tracing::debug!(subscription = id.0, subscribers = state.subscribers.len(), "cursor.subscribe");
		id
	}

	/// Removes one subscription; returns `false` if it was not present.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut state = self.state.lock();
		let before = state.subscribers.len();
		state.subscribers.retain(|(sid, _)| *sid != id);
		let removed = state.subscribers.len() != before;
		if removed {
			tracing::debug!(subscription = id.0, subscribers = state.subscribers.len(), "cursor.unsubscribe");
		}
		removed
	}

	/// Computes one notification and delivers it to every subscriber.
	///
	/// No-op without subscribers. Handlers subscribed or removed while a
	/// delivery is in flight take effect from the next notification.
	pub async fn notify(&self) {
		let (handlers, notification) = {
			let mut state = self.state.lock();
			if state.subscribers.is_empty() {
				return;
			}
			state.delivered += 1;
			let handlers: Vec<CursorHandler> = state.subscribers.iter().map(|(_, h)| h.clone()).collect();
			let notification = Arc::new(CursorNotification::new(state.source.current_line()));
			(handlers, notification)
		};

		tracing::trace!(
			line = notification.cursor_line_id.as_deref().unwrap_or("-"),
			handlers = handlers.len(),
			"cursor.notify"
		);
		let pending: Vec<_> = handlers.iter().map(|handler| handler(notification.clone())).collect();
		join_all(pending).await;
	}

	/// Entry point for the host's marker observer.
	///
	/// Mutations arriving while no observation is active are dropped.
	pub async fn on_marker_mutation(&self) {
		if !self.is_observing() {
			tracing::trace!("cursor.mutation.unobserved");
			return;
		}
		self.notify().await;
	}

	/// Clears every subscriber and stops observing the marker.
	pub fn disconnect_all(&self) {
		let mut state = self.state.lock();
		let dropped = state.subscribers.len();
		state.subscribers.clear();
		state.source.disconnect();
		tracing::debug!(dropped, "cursor.disconnect_all");
	}

	pub fn subscriber_count(&self) -> usize {
		self.state.lock().subscribers.len()
	}

	pub fn is_observing(&self) -> bool {
		self.state.lock().source.is_observing()
	}

	/// Current cursor line without notifying anyone.
	pub fn current_line(&self) -> Option<Arc<str>> {
		self.state.lock().source.current_line()
	}

	/// Number of notifications delivered to at least one subscriber.
	pub fn delivered(&self) -> u64 {
		self.state.lock().delivered
	}
}

impl fmt::Debug for CursorBus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.lock();
		f.debug_struct("CursorBus")
			.field("subscribers", &state.subscribers.len())
			.field("observing", &state.source.is_observing())
			.finish()
	}
}

#[cfg(test)]
mod tests;
