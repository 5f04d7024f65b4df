//! Application layer containing the charge lifecycle orchestration.
//!
//! `ChargeProcessor` is the entry point for opening, executing and reporting
//! charges. Queued charges are consumed by a `ChargeWorker`, which runs the
//! authorizer calls off the caller's path using a `tokio` channel.

pub mod processor;
pub mod worker;
