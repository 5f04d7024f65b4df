//! Adapters for the domain ports.

pub mod authorizer;
pub mod in_memory;
pub mod notifier;
