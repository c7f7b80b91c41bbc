//! User interface and interaction
//!
//! This module contains all components related to user interaction,
//! including CLI parsing, output formatting and progress reporting.

pub mod cli;
pub mod color;
pub mod output;
pub mod progress;

// Re-export commonly used items
pub use cli::{Cli, cli_to_config};
pub use progress::ProgressReporter;
