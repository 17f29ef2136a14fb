//! Outbound adapters implementing the domain ports.

pub mod memory;

pub use memory::{InMemoryContactStore, InMemoryUserDirectory};
