//! # Asynchronous per-subscriber delivery.
//!
//! This module provides the subscriber side of the fan-out core:
//!
//! - [`Consume`] — the handler trait a subscriber invokes per payload,
//!   with [`ConsumeFn`] as a closure adapter.
//! - [`Subscriber`] — the queue + dedicated worker task + lifecycle.
//! - [`Fault`] / [`FaultSink`] — observable handler failures.
//!
//! ## Architecture
//! ```text
//! Registry::dispatch(payload)
//!        │                          (Arc clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► consume()
//!        ├────────────────► [queue S2] ─► worker S2 ─► consume()
//!        └────────────────► [queue SN] ─► worker SN ─► consume()
//!                                            │
//!                                            └─ Err/panic → FaultSink
//! ```

mod consume;
mod fault;
mod worker;

pub use consume::{Consume, ConsumeFn};
pub use fault::{Fault, FaultKind, FaultSink, log_faults};
pub use worker::{Subscriber, SubscriberBuilder, SubscriberRef, SubscriberState};
