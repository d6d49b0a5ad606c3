/* tests/async_tests.rs */

#![cfg(feature = "async")]

use obcell::{Event, ObservableCell};
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_subscribe_on_preserves_order() {
	let cell = ObservableCell::new(0);
	let (tx, mut rx) = mpsc::unbounded_channel();

	let _h = cell.subscribe_on(&tokio::runtime::Handle::current(), move |event| {
		let _ = tx.send(event);
	});

	for i in 1..=50 {
		cell.set(i);
	}

	for expected in 1..=50 {
		let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
			.await
			.unwrap()
			.unwrap();
		assert_eq!(**event.value().unwrap(), expected);
	}
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_subscriber_does_not_block_writer() {
	let cell = ObservableCell::new(0);
	let (tx, mut rx) = mpsc::unbounded_channel();

	let _slow = cell.subscribe_on(&tokio::runtime::Handle::current(), move |event| {
		std::thread::sleep(Duration::from_millis(20));
		let _ = tx.send(event);
	});

	let started = std::time::Instant::now();
	for i in 1..=10 {
		cell.set(i);
	}
	assert!(started.elapsed() < Duration::from_millis(150));
	assert_eq!(cell.get(), 10);

	let mut received = Vec::new();
	while received.len() < 10 {
		match rx.recv().await {
			Some(Event::Next(v)) => received.push(*v),
			other => panic!("unexpected event: {other:?}"),
		}
	}
	assert_eq!(received, (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_subscribe_on_receives_completed() {
	let cell = ObservableCell::new("a".to_string());
	let (tx, mut rx) = mpsc::unbounded_channel();

	let handle = cell.subscribe_on(&tokio::runtime::Handle::current(), move |event| {
		let _ = tx.send(event);
	});

	cell.set("b".to_string());
	drop(cell);

	match rx.recv().await {
		Some(Event::Next(v)) => assert_eq!(*v, "b"),
		other => panic!("Expected Next, got {other:?}"),
	}
	match rx.recv().await {
		Some(Event::Completed) => (),
		other => panic!("Expected Completed, got {other:?}"),
	}
	// The task exits after the terminal event and drops its sender.
	assert!(rx.recv().await.is_none());
	drop(handle);
}
