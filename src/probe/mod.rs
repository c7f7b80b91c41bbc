//! Concurrent HTTP probing
//!
//! A fixed pool of workers drains a shared queue of targets. Each target gets
//! one GET request. Outcomes are collected by a single aggregator, and a
//! cooperative stop signal lets a run end early.

pub mod aggregator;
pub mod cancel;
pub mod pool;
pub mod prober;

// Re-export commonly used items
pub use aggregator::ResultAggregator;
pub use cancel::Cancellation;
pub use pool::{PoolReport, RunState, WorkQueue, WorkerPool};
pub use prober::{HttpProber, ProbeUrl, ProbeVerdict};
