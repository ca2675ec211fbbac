//! # Simple logging consumer for debugging and demos.
//!
//! [`LogConsumer`] reports every payload through `tracing` at `info` level.
//! This is primarily useful for development, debugging, and examples.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ConsumeError;
use crate::payload::Payload;
use crate::subscriber::Consume;

/// Logs the id and content of every payload it receives.
///
/// Not intended for production use - implement a custom [`Consume`] for
/// structured processing or metrics collection.
pub struct LogConsumer;

#[async_trait]
impl Consume for LogConsumer {
    async fn consume(&self, payload: Arc<Payload>) -> Result<(), ConsumeError> {
        tracing::info!(id = payload.id, content = %payload.content, "payload received");
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
