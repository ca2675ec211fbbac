//! # Payload: the unit of data distributed to subscribers.
//!
//! A [`Payload`] is created once by a producer and never mutated afterwards.
//! The registry wraps it in an [`Arc`](std::sync::Arc) at dispatch time; every
//! subscriber queue holds its own owning clone, so the payload stays alive
//! until the last queue entry referencing it has been consumed.

/// Immutable unit of data carried from a producer to subscribers.
///
/// Handlers receive payloads behind a shared reference-counted handle and must
/// treat them as read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Producer-assigned identifier.
    pub id: u64,
    /// Message body.
    pub content: String,
}

impl Payload {
    /// Creates a new payload.
    ///
    /// ## Example
    /// ```rust
    /// use datafan::Payload;
    ///
    /// let p = Payload::new(1, "hello");
    /// assert_eq!(p.id, 1);
    /// assert_eq!(p.content, "hello");
    /// ```
    pub fn new(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}
