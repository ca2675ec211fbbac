//! # Subscriber: per-handler queue and dedicated worker task.
//!
//! A [`Subscriber`] owns an unbounded FIFO queue and a single worker task that
//! drains it, invoking the handler once per payload. Enqueueing never blocks
//! and never waits on handler execution, so a slow handler only delays its own
//! queue.
//!
//! ## Lifecycle
//! ```text
//! RUNNING ──stop()──► STOPPING ──final flush──► STOPPED
//! ```
//! A subscriber is a one-shot resource: there is no way back from `STOPPED`.
//! [`Subscriber::stop`] is an idempotent request and does not wait; the owner
//! must [`Subscriber::join`] before releasing resources the handler captured.
//!
//! ## Stop semantics (strict drain)
//! On stop, the worker closes the queue, delivers everything that was already
//! enqueued, then exits. An enqueue racing with the close fails and its
//! payload is discarded, exactly like an enqueue after `STOPPED`.
//!
//! ## Fault isolation
//! Handler errors and panics are caught per payload and reported through the
//! subscriber's [`FaultSink`]; the worker always continues with the next item.

use std::borrow::Cow;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::payload::Payload;

use super::consume::Consume;
use super::fault::{self, Fault, FaultKind, FaultSink};

const RUNNING: u8 = 0;
const STOPPING: u8 = 1;
const STOPPED: u8 = 2;

/// Observable lifecycle state of a [`Subscriber`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    /// Worker is accepting and processing payloads.
    Running,
    /// Stop was requested; the worker is flushing already-enqueued payloads.
    Stopping,
    /// Worker has exited. Enqueued payloads are discarded from here on.
    Stopped,
}

/// Shared handle to a [`Subscriber`].
///
/// The registry removes subscribers by handle identity (`Arc::ptr_eq`), so
/// keep the same `SubscriberRef` around for register/unregister pairs.
pub type SubscriberRef = Arc<Subscriber>;

/// State shared between the handle and the worker task.
struct Shared {
    name: String,
    tx: mpsc::UnboundedSender<Arc<Payload>>,
    token: CancellationToken,
    state: AtomicU8,
}

impl Shared {
    fn state(&self) -> SubscriberState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => SubscriberState::Running,
            STOPPING => SubscriberState::Stopping,
            _ => SubscriberState::Stopped,
        }
    }
}

/// A registered consumer with its own queue and dedicated worker task.
pub struct Subscriber {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Subscriber {
    /// Spawns a subscriber for `consumer` with default name and fault sink.
    ///
    /// The worker task starts immediately; state is `Running` on return.
    pub fn spawn(consumer: Arc<dyn Consume>) -> SubscriberRef {
        Self::builder(consumer).spawn()
    }

    /// Returns a builder to override the subscriber name or fault sink.
    pub fn builder(consumer: Arc<dyn Consume>) -> SubscriberBuilder {
        SubscriberBuilder {
            consumer,
            name: None,
            sink: fault::log_faults(),
        }
    }

    /// Returns the subscriber name used in logs and fault reports.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SubscriberState {
        self.shared.state()
    }

    /// Appends a payload to the subscriber's queue.
    ///
    /// O(1), never blocks, never waits on handler execution. Payloads are
    /// retained while the subscriber is `Running` or `Stopping` (the final
    /// flush still delivers them); after `Stopped` the payload is discarded.
    pub fn enqueue(&self, payload: Arc<Payload>) {
        if self.shared.state.load(Ordering::Acquire) == STOPPED {
            tracing::debug!(
                subscriber = %self.shared.name,
                payload_id = payload.id,
                "discarding payload: subscriber stopped",
            );
            return;
        }
        // A failed send means the queue was already closed by the final
        // flush; the payload is discarded just like an enqueue after STOPPED.
        let _ = self.shared.tx.send(payload);
    }

    /// Requests termination. Idempotent; does not wait for the worker.
    ///
    /// The worker flushes already-enqueued payloads and exits; use
    /// [`Subscriber::join`] to wait for that.
    pub fn stop(&self) {
        let _ = self.shared.state.compare_exchange(
            RUNNING,
            STOPPING,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        self.shared.token.cancel();
    }

    /// Waits for the worker task to exit. Idempotent.
    ///
    /// Returns immediately if the worker was already joined.
    pub async fn join(&self) {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Convenience for `stop()` followed by `join().await`.
    pub async fn shutdown(&self) {
        self.stop();
        self.join().await;
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        // Lets the worker drain and exit if the owner never called stop().
        self.shared.token.cancel();
    }
}

/// Builder for [`Subscriber`] with optional name and fault sink overrides.
pub struct SubscriberBuilder {
    consumer: Arc<dyn Consume>,
    name: Option<Cow<'static, str>>,
    sink: FaultSink,
}

impl SubscriberBuilder {
    /// Overrides the subscriber name (default: [`Consume::name`]).
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Overrides the fault sink (default: log via `tracing`).
    pub fn with_fault_sink(mut self, sink: FaultSink) -> Self {
        self.sink = sink;
        self
    }

    /// Spawns the worker task and returns the subscriber handle.
    pub fn spawn(self) -> SubscriberRef {
        let name = match self.name {
            Some(name) => name.into_owned(),
            None => self.consumer.name().to_string(),
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            name,
            tx,
            token: CancellationToken::new(),
            state: AtomicU8::new(RUNNING),
        });
        let worker = tokio::spawn(run_worker(
            rx,
            Arc::clone(&shared),
            self.consumer,
            self.sink,
        ));
        Arc::new(Subscriber {
            shared,
            worker: Mutex::new(Some(worker)),
        })
    }
}

/// Worker loop: suspend on the empty queue, deliver FIFO, flush on stop.
async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Arc<Payload>>,
    shared: Arc<Shared>,
    consumer: Arc<dyn Consume>,
    sink: FaultSink,
) {
    loop {
        tokio::select! {
            _ = shared.token.cancelled() => {
                // Final flush: closing the receiver fails concurrent sends,
                // then recv() yields the remaining buffered payloads.
                rx.close();
                while let Some(payload) = rx.recv().await {
                    deliver(&consumer, &shared.name, &sink, payload).await;
                }
                break;
            }
            next = rx.recv() => match next {
                Some(payload) => deliver(&consumer, &shared.name, &sink, payload).await,
                None => break,
            },
        }
    }
    shared.state.store(STOPPED, Ordering::Release);
    tracing::debug!(subscriber = %shared.name, "worker exited");
}

/// Invokes the handler for one payload; errors and panics become faults.
async fn deliver(
    consumer: &Arc<dyn Consume>,
    name: &str,
    sink: &FaultSink,
    payload: Arc<Payload>,
) {
    let fut = consumer.consume(Arc::clone(&payload));
    match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => sink(Fault {
            subscriber: name.to_string(),
            payload,
            kind: FaultKind::Error(err),
        }),
        Err(panic) => sink(Fault {
            subscriber: name.to_string(),
            payload,
            kind: FaultKind::Panic(panic_message(panic.as_ref())),
        }),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
