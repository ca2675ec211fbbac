//! Fan-out demo: two subscribers, a receiver producing payloads, and
//! dynamic unregistration, followed by a clean shutdown.
//!
//! Run with: `cargo run --example fanout`

use std::sync::Arc;
use std::time::Duration;

use datafan::{ConsumeError, ConsumeFn, LogConsumer, Payload, Publish, Registry, Subscriber};

/// Simulated message source: turns raw input into payloads and hands them to
/// whatever `Publish` implementation it was given.
struct Receiver {
    publisher: Arc<dyn Publish>,
}

impl Receiver {
    fn new(publisher: Arc<dyn Publish>) -> Self {
        Self { publisher }
    }

    fn receive(&self, id: u64, content: &str) {
        self.publisher.publish(Payload::new(id, content));
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let registry = Arc::new(Registry::new());

    let logger = Subscriber::spawn(Arc::new(LogConsumer));
    let processor = Subscriber::spawn(ConsumeFn::arc(
        "processor",
        |p: Arc<Payload>| async move {
            println!("[processor] id={} length={}", p.id, p.content.len());
            Ok::<_, ConsumeError>(())
        },
    ));

    registry.register(Arc::clone(&logger));
    registry.register(Arc::clone(&processor));

    let receiver = Receiver::new(Arc::clone(&registry) as Arc<dyn Publish>);

    println!("=== receiving message 1 ===");
    receiver.receive(1, "Hello, fan-out!");
    println!("=== receiving message 2 ===");
    receiver.receive(2, "Another data packet.");

    // Give the workers a moment to drain before changing the subscriber set.
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("\n=== removing the logger ===");
    registry.unregister(&logger);

    println!("=== receiving message 3 ===");
    receiver.receive(3, "Data after removing the logger.");

    logger.shutdown().await;
    processor.shutdown().await;

    println!("\n=== done ===");
}
