//! Check which historically archived URLs of a domain are still alive.
//!
//! wayprobe asks the Wayback Machine CDX index for every URL it has archived
//! under a domain, drops static assets, and probes the rest concurrently with
//! a single GET each. The result is a report of status codes and declared
//! response sizes, largest first.

// Core modules
pub mod core;

// Feature modules
pub mod config;
pub mod discovery;
pub mod probe;
pub mod reporting;
pub mod scanner;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::{CliConfig, Config};
pub use crate::core::{
    EventSink, ProbeOutcome, Result, RunEvent, RunRequest, RunStatus, WayprobeError,
};
pub use discovery::{UrlSource, WaybackCdx};
pub use probe::{Cancellation, HttpProber, ProbeUrl, ProbeVerdict, WorkerPool};
pub use reporting::Report;
pub use scanner::{RunSummary, Scanner};
