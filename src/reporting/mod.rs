//! Report building and structured logging
//!
//! This module turns the outcomes of a run into an ordered, renderable report
//! and carries the logging helpers used across the application.

pub mod logging;
pub mod report;

// Re-export commonly used items
pub use report::Report;
