/* demos/basic.rs */

use obcell::{Event, ObservableCell};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// 1. Setup cell with a delivery transform
	let cell = Arc::new(ObservableCell::builder().label("demo").build(0)?);
	cell.map(|x| x + 1);

	// 2. Synchronous subscriber, kept alive by its handle
	let printer = cell.subscribe(|v| println!("sync subscriber got {v}"));

	// 3. Asynchronous subscriber running on the tokio runtime
	let _async_sub = cell.subscribe_on(&tokio::runtime::Handle::current(), |event| match event {
		Event::Next(v) => println!("async subscriber got {v}"),
		Event::Completed => println!("async subscriber: cell completed"),
		Event::Error(e) => println!("async subscriber failed: {e}"),
	});

	// 4. Concurrent writers
	let writers: Vec<_> = (0..2)
		.map(|t| {
			let cell = cell.clone();
			thread::spawn(move || {
				for i in 1..=3 {
					cell.set(t * 10 + i);
				}
			})
		})
		.collect();
	for writer in writers {
		writer.join().map_err(|_| "writer panicked")?;
	}

	println!("Current value: {} (history: {:?})", cell.get(), cell.history());

	// 5. Dropping a handle unsubscribes
	drop(printer);
	let delivery = cell.set(100);
	println!("After unsubscribing: {delivery:?}");

	// 6. Dropping the cell completes remaining subscribers
	drop(cell);
	tokio::time::sleep(Duration::from_millis(100)).await;
	println!("Done.");
	Ok(())
}
