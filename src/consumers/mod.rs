//! Built-in [`Consume`](crate::Consume) implementations.

mod log;

pub use log::LogConsumer;
