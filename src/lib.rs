//! # datafan
//!
//! **Datafan** is a minimal in-process publish/subscribe core for Rust.
//!
//! A [`Registry`] fans out each dispatched [`Payload`] to a dynamically
//! changing set of [`Subscriber`]s. Every subscriber owns an unbounded FIFO
//! queue drained by its own dedicated worker task, so a slow subscriber never
//! blocks the producer or other subscribers.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐
//!     │   Producer   │  (any execution context)
//!     └──────┬───────┘
//!            │ dispatch(Payload)
//!            ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  Registry                                                 │
//! │  - live set of SubscriberRef (insertion order)            │
//! │  - fan-out under a brief exclusive critical section       │
//! └──────┬──────────────────────┬───────────────────────┬─────┘
//!        │ enqueue(Arc clone)   │                       │
//!        ▼                      ▼                       ▼
//!   [queue S1]             [queue S2]              [queue SN]
//!        │                      │                       │
//!        ▼                      ▼                       ▼
//!    worker S1              worker S2               worker SN
//!        │                      │                       │
//!        ▼                      ▼                       ▼
//!   consume()               consume()               consume()
//!        └── Err/panic ─► FaultSink (observable, never fatal)
//! ```
//!
//! ## Guarantees
//! - **Per-subscriber FIFO**: payloads reach each handler in enqueue order;
//!   nothing is guaranteed across different subscribers.
//! - **Non-blocking dispatch**: [`Registry::dispatch`] returns in bounded
//!   time; it never waits on handler execution.
//! - **Fault isolation**: a handler error or panic is reported through the
//!   subscriber's [`FaultSink`] and processing continues with the next item.
//! - **Strict drain on stop**: payloads enqueued before
//!   [`Subscriber::stop`] are delivered before the worker exits; payloads
//!   enqueued after `STOPPED` are discarded.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use datafan::{ConsumeError, ConsumeFn, Payload, Registry, Subscriber};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let registry = Registry::new();
//!
//!     let printer = Subscriber::spawn(ConsumeFn::arc(
//!         "printer",
//!         |p: Arc<Payload>| async move {
//!             println!("id={} content={}", p.id, p.content);
//!             Ok::<_, ConsumeError>(())
//!         },
//!     ));
//!     registry.register(Arc::clone(&printer));
//!
//!     registry.dispatch(Payload::new(1, "hello"));
//!     registry.dispatch(Payload::new(2, "world"));
//!
//!     registry.unregister(&printer);
//!     printer.shutdown().await;
//! }
//! ```

mod consumers;
mod error;
mod payload;
mod registry;
mod subscriber;

// ---- Public re-exports ----

pub use consumers::LogConsumer;
pub use error::ConsumeError;
pub use payload::Payload;
pub use registry::{Publish, Registry};
pub use subscriber::{
    Consume, ConsumeFn, Fault, FaultKind, FaultSink, Subscriber, SubscriberBuilder,
    SubscriberRef, SubscriberState, log_faults,
};
