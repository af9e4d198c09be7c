//! Infrastructure layer - MongoDB connection, collection names and sequences.

pub mod collections;
mod counters;
mod db;

pub use counters::CounterStore;
pub use db::{Database, HealthCheck};

#[cfg(any(test, feature = "test-utils"))]
pub use db::MockHealthCheck;
