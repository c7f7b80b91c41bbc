//! URL discovery and filtering
//!
//! This module queries the archive index for historical URLs of a domain
//! and removes entries that are not worth probing.

pub mod archive;
pub mod filter;

// Re-export commonly used items
pub use archive::{UrlSource, WaybackCdx};
pub use filter::{apply_exclude_patterns, filter_urls, normalize_target};
