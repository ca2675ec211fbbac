//! # Payload handler trait.
//!
//! Provides [`Consume`], the extension point for plugging user handlers into
//! a [`Subscriber`](crate::Subscriber) worker.
//!
//! Each handler gets:
//! - **Dedicated worker task** (runs independently of other subscribers)
//! - **Per-subscriber unbounded FIFO queue**
//! - **Fault isolation** (errors and panics are reported, never fatal)
//!
//! ## Rules
//! - Payloads are delivered in FIFO order per subscriber.
//! - A slow handler only delays its own queue; it never blocks the producer
//!   or other subscribers.
//! - Return [`ConsumeError`] for failures; panics are caught as a fallback.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use datafan::{Consume, ConsumeError, Payload};
//!
//! struct Counter;
//!
//! #[async_trait]
//! impl Consume for Counter {
//!     async fn consume(&self, payload: Arc<Payload>) -> Result<(), ConsumeError> {
//!         // count payload.content.len(), export a metric, etc.
//!         let _ = payload;
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str { "counter" }
//! }
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ConsumeError;
use crate::payload::Payload;

/// Payload handler invoked once per payload delivered to a subscriber.
///
/// Called from the subscriber's dedicated worker task, never in the
/// producer context. The payload is shared and must be treated as
/// read-only.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Prefer returning [`ConsumeError`] over panicking; both are isolated.
#[async_trait]
pub trait Consume: Send + Sync + 'static {
    /// Processes a single payload.
    ///
    /// Payloads arrive in the order they were enqueued for this subscriber.
    async fn consume(&self, payload: Arc<Payload>) -> Result<(), ConsumeError>;

    /// Returns the handler name used in logs and fault reports.
    ///
    /// Prefer short, descriptive names (e.g., "log", "metrics", "audit").
    /// The default uses `type_name::<Self>()`, which can be verbose -
    /// override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Function-backed handler implementation.
///
/// Wraps a closure `F: Fn(Arc<Payload>) -> Fut`, producing a fresh future per
/// payload. Shared state, if any, goes into the closure via an explicit
/// `Arc<...>`.
pub struct ConsumeFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ConsumeFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`ConsumeFn::arc`] when you immediately need an `Arc<dyn Consume>`.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler and returns it as a shared handle.
    ///
    /// ## Example
    /// ```rust
    /// use std::sync::Arc;
    /// use datafan::{ConsumeError, ConsumeFn, Payload};
    ///
    /// let h = ConsumeFn::arc("printer", |p: Arc<Payload>| async move {
    ///     println!("id={} content={}", p.id, p.content);
    ///     Ok::<_, ConsumeError>(())
    /// });
    /// ```
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Consume for ConsumeFn<F>
where
    F: Fn(Arc<Payload>) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), ConsumeError>> + Send + 'static,
{
    async fn consume(&self, payload: Arc<Payload>) -> Result<(), ConsumeError> {
        (self.f)(payload).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
