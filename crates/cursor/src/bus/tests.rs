use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use affix_primitives::CursorNotification;
use affix_primitives::testing::FakeCursorSurface;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::*;
use crate::source::CursorSource;

fn bus_with(surface: &Arc<FakeCursorSurface>) -> CursorBus {
	let _ = tracing_subscriber::fmt::try_init();
	CursorBus::new(CursorSource::new(surface.clone()))
}

fn recorder(log: &Arc<Mutex<Vec<Option<String>>>>) -> impl Fn(Arc<CursorNotification>) -> futures::future::Ready<()> + Send + Sync + 'static {
	let log = log.clone();
	move |n| {
		log.lock().push(n.cursor_line_id.as_deref().map(str::to_string));
		futures::future::ready(())
	}
}

#[tokio::test]
async fn notify_without_subscribers_is_noop() {
	let surface = Arc::new(FakeCursorSurface::new());
	let bus = bus_with(&surface);
	bus.notify().await;
	assert_eq!(bus.delivered(), 0);
	assert_eq!(surface.observe_calls(), 0);
}

#[tokio::test]
async fn first_subscriber_starts_observation() {
	let surface = Arc::new(FakeCursorSurface::new());
	let bus = bus_with(&surface);
	assert!(!bus.is_observing());

	let log = Arc::new(Mutex::new(Vec::new()));
	bus.subscribe(recorder(&log));
	assert!(bus.is_observing());
	bus.subscribe(recorder(&log));
	assert_eq!(surface.observe_calls(), 1);
	assert_eq!(surface.active_observations(), 1);
}

#[tokio::test]
async fn every_subscriber_sees_the_same_line() {
	let surface = Arc::new(FakeCursorSurface::new());
	surface.layout(&["a", "b"], Some("b"));
	let bus = bus_with(&surface);

	let log = Arc::new(Mutex::new(Vec::new()));
	bus.subscribe(recorder(&log));
	bus.subscribe(recorder(&log));
	bus.on_marker_mutation().await;

	assert_eq!(*log.lock(), vec![Some("b".to_string()), Some("b".to_string())]);
	assert_eq!(bus.delivered(), 1);
}

#[tokio::test]
async fn resubscribing_the_same_handler_is_not_deduplicated() {
	let surface = Arc::new(FakeCursorSurface::new());
	let bus = bus_with(&surface);
	let count = Arc::new(AtomicUsize::new(0));
	let handler: CursorHandler = {
		let count = count.clone();
		Arc::new(move |_| {
			count.fetch_add(1, Ordering::SeqCst);
			Box::pin(async {})
		})
	};
	bus.subscribe_handler(handler.clone());
	bus.subscribe_handler(handler);
	bus.notify().await;
	assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unsubscribe_by_id() {
	let surface = Arc::new(FakeCursorSurface::new());
	let bus = bus_with(&surface);
	let log = Arc::new(Mutex::new(Vec::new()));
	let first = bus.subscribe(recorder(&log));
	let _second = bus.subscribe(recorder(&log));

	assert!(bus.unsubscribe(first));
	assert!(!bus.unsubscribe(first));
	bus.notify().await;
	assert_eq!(log.lock().len(), 1);
}

#[tokio::test]
async fn handlers_start_before_any_is_awaited() {
	let surface = Arc::new(FakeCursorSurface::new());
	let bus = bus_with(&surface);

	// The first handler cannot finish until the second one has started.
	let (tx, rx) = oneshot::channel::<()>();
	let rx = Arc::new(Mutex::new(Some(rx)));
	let tx = Arc::new(Mutex::new(Some(tx)));
	let order = Arc::new(Mutex::new(Vec::new()));

	{
		let order = order.clone();
		bus.subscribe(move |_| {
			let rx = rx.lock().take();
			let order = order.clone();
			async move {
				order.lock().push("first:start");
				if let Some(rx) = rx {
					let _ = rx.await;
				}
				order.lock().push("first:end");
			}
		});
	}
	{
		let order = order.clone();
		bus.subscribe(move |_| {
			let tx = tx.lock().take();
			let order = order.clone();
			async move {
				order.lock().push("second:start");
				if let Some(tx) = tx {
					let _ = tx.send(());
				}
				order.lock().push("second:end");
			}
		});
	}

	bus.notify().await;
	assert_eq!(*order.lock(), vec!["first:start", "second:start", "second:end", "first:end"]);
}

#[tokio::test]
async fn mutations_are_ignored_after_disconnect() {
	let surface = Arc::new(FakeCursorSurface::new());
	surface.layout(&["a"], Some("a"));
	let bus = bus_with(&surface);
	let log = Arc::new(Mutex::new(Vec::new()));
	bus.subscribe(recorder(&log));

	bus.disconnect_all();
	assert_eq!(bus.subscriber_count(), 0);
	assert!(!bus.is_observing());
	assert_eq!(surface.active_observations(), 0);

	bus.on_marker_mutation().await;
	assert!(log.lock().is_empty());

	// Teardown twice is harmless.
	bus.disconnect_all();
}

#[tokio::test]
async fn resubscribe_after_teardown_observes_again() {
	let surface = Arc::new(FakeCursorSurface::new());
	surface.layout(&["a"], Some("a"));
	let bus = bus_with(&surface);
	let log = Arc::new(Mutex::new(Vec::new()));
	bus.subscribe(recorder(&log));
	bus.disconnect_all();

	bus.subscribe(recorder(&log));
	assert!(bus.is_observing());
	assert_eq!(surface.observe_calls(), 2);
	bus.on_marker_mutation().await;
	assert_eq!(*log.lock(), vec![Some("a".to_string())]);
}

#[tokio::test]
async fn missing_marker_defers_observation_but_keeps_subscriber() {
	let surface = Arc::new(FakeCursorSurface::new());
	surface.set_marker(false);
	let bus = bus_with(&surface);
	let log = Arc::new(Mutex::new(Vec::new()));
	bus.subscribe(recorder(&log));
	assert!(!bus.is_observing());
	assert_eq!(bus.subscriber_count(), 1);

	// Synthetic notifications still reach subscribers.
	bus.notify().await;
	assert_eq!(*log.lock(), vec![None]);
}

#[tokio::test]
async fn subscribing_inside_a_handler_applies_next_time() {
	let surface = Arc::new(FakeCursorSurface::new());
	let bus = bus_with(&surface);
	let count = Arc::new(AtomicUsize::new(0));
	{
		let bus2 = bus.clone();
		let count = count.clone();
		bus.subscribe(move |_| {
			let count = count.clone();
			bus2.subscribe(move |_| {
				count.fetch_add(1, Ordering::SeqCst);
				async {}
			});
			async {}
		});
	}
	bus.notify().await;
	assert_eq!(count.load(Ordering::SeqCst), 0);
	assert_eq!(bus.subscriber_count(), 2);
}
