//! Background task distribution and processing.
//!
//! Registration hands a send-verify-email task to the [`TaskDistributor`]
//! while its transaction is open; the [`TaskProcessor`] picks tasks up on a
//! background tokio task after the registration has (normally) committed.
//!
//! The queue is an in-process bounded channel. Tasks are not persisted and
//! not retried.

pub mod distributor;
pub mod processor;

pub use distributor::{DistributeError, PayloadSendVerifyEmail, TaskDistributor};
pub use processor::TaskProcessor;
