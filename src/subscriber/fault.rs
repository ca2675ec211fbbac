//! # Observable handler faults.
//!
//! A handler that returns [`ConsumeError`] or panics produces a [`Fault`].
//! Faults are pushed through the subscriber's [`FaultSink`] rather than
//! swallowed, so failures are testable: the default sink logs via `tracing`,
//! and tests install a channel-backed sink to assert isolation.
//!
//! ```text
//! worker ─► consume(payload)
//!              ├─ Ok(())          → next item
//!              ├─ Err(e)          → sink(Fault { kind: Error(e) })  → next item
//!              └─ panic           → sink(Fault { kind: Panic(msg) }) → next item
//! ```

use std::sync::Arc;

use crate::error::ConsumeError;
use crate::payload::Payload;

/// A single handler failure, with enough context to identify the subscriber
/// and the failing payload.
#[derive(Debug)]
pub struct Fault {
    /// Name of the subscriber whose handler faulted.
    pub subscriber: String,
    /// The payload the handler was invoked with.
    pub payload: Arc<Payload>,
    /// What went wrong.
    pub kind: FaultKind,
}

/// Classification of handler faults.
#[derive(Debug)]
pub enum FaultKind {
    /// Handler returned an error.
    Error(ConsumeError),
    /// Handler panicked; the panic was caught at the invocation site.
    Panic(String),
}

impl FaultKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FaultKind::Error(_) => "handler_error",
            FaultKind::Panic(_) => "handler_panic",
        }
    }

    /// Returns a human-readable message with details about the fault.
    pub fn as_message(&self) -> String {
        match self {
            FaultKind::Error(err) => err.as_message(),
            FaultKind::Panic(msg) => format!("panic: {msg}"),
        }
    }
}

/// Callback invoked by a subscriber worker for every handler fault.
///
/// Must not block; it runs on the subscriber's worker task between payloads.
pub type FaultSink = Arc<dyn Fn(Fault) + Send + Sync>;

/// Default sink: reports faults through `tracing` at `warn` level.
pub fn log_faults() -> FaultSink {
    Arc::new(|fault: Fault| {
        tracing::warn!(
            subscriber = %fault.subscriber,
            payload_id = fault.payload.id,
            kind = fault.kind.as_label(),
            "{}",
            fault.kind.as_message(),
        );
    })
}
