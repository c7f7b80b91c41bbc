/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes the fixed probe parameters, archive query settings,
/// default filters and report formatting tokens.
/// Output format constants
pub mod output_formats {
    /// Text output format - the fixed-width report table
    pub const TEXT: &str = "text";
    /// JSON output format - structured output for automation
    pub const JSON: &str = "json";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 2] = [TEXT, JSON];
}

/// HTTP constants used by the probe task
pub mod http {
    /// Desktop browser user agent sent with every probe
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/93.0.4577.82 Safari/537.36";

    /// HTTP 400 Bad Request
    pub const BAD_REQUEST: u16 = 400;
    /// HTTP 404 Not Found
    pub const NOT_FOUND: u16 = 404;

    /// Status codes whose outcomes are dropped instead of reported
    pub const DISCARDED_STATUS_CODES: [u16; 2] = [BAD_REQUEST, NOT_FOUND];

    /// Scheme prepended to targets that have none
    pub const DEFAULT_SCHEME: &str = "http://";
}

/// Timeout constants in milliseconds
pub mod timeouts {
    /// Probe connect timeout
    pub const PROBE_CONNECT_MS: u64 = 5_000;
    /// Probe read timeout
    pub const PROBE_READ_MS: u64 = 10_000;
    /// Archive index connect timeout
    pub const ARCHIVE_CONNECT_MS: u64 = 15_000;
    /// Archive index read timeout
    pub const ARCHIVE_READ_MS: u64 = 30_000;
    /// Largest timeout accepted from configuration (10 minutes)
    pub const MAX_TIMEOUT_MS: u64 = 600_000;
}

/// Archive index query settings
pub mod archive {
    /// Wayback Machine CDX search endpoint
    pub const CDX_ENDPOINT: &str = "http://web.archive.org/cdx/search/cdx";
    /// Match every host under the domain
    pub const MATCH_TYPE: &str = "domain";
    /// Only return the original URL column
    pub const FIELDS: &str = "original";
    /// Collapse captures of the same URL key
    pub const COLLAPSE: &str = "urlkey";
}

/// Default run parameters
pub mod defaults {
    /// Default number of archived URLs to request
    pub const LIMIT: u64 = 10_000;
    /// Default number of concurrent workers
    pub const THREADS: usize = 5;
    /// Minimum number of workers
    pub const MIN_THREADS: usize = 1;
    /// Maximum number of workers
    pub const MAX_THREADS: usize = 10;
    /// Config file looked up in the working directory and its parents
    pub const CONFIG_FILE_NAME: &str = ".wayprobe.toml";
}

/// Static asset suffixes removed before probing
pub mod filters {
    /// Suffixes (compared against the lowercased URL) that are never probed
    pub const EXCLUDED_EXTENSIONS: [&str; 10] = [
        ".eot", ".svg", ".woff", ".woff2", ".css", ".ttf", ".png", ".jpg", ".jpeg", ".gif",
    ];
}

/// Report sentinels and formatting tokens
pub mod report {
    /// Status code recorded for transport failures
    pub const ERROR_STATUS: i32 = -1;
    /// Response size recorded when no length was declared
    pub const UNKNOWN_SIZE: i64 = -1;
    /// Shown in the size column when the size is unknown
    pub const SIZE_PLACEHOLDER: &str = "N/A";
    /// Width of the status column
    pub const STATUS_WIDTH: usize = 8;
    /// Width of the response size column
    pub const SIZE_WIDTH: usize = 15;
}

/// Error message constants
pub mod error_messages {
    /// Reported for connect and read timeouts
    pub const OPERATION_TIMED_OUT: &str = "operation timed out";
}

/// Narrative and error message constants
pub mod messages {
    pub const EMPTY_DOMAIN: &str = "Please enter a domain name.";
    pub const INVALID_LIMIT: &str = "Invalid limit. Please enter a number.";
    pub const EMPTY_ARCHIVE_RESPONSE: &str = "The response was empty.";
    pub const STOP_ACKNOWLEDGED: &str = "[*] Stop request received. Finishing current checks...";
    pub const RUN_COMPLETE: &str = "[*] All checks complete.";
    pub const RUN_STOPPED: &str = "[*] Process stopped by user.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_formats_constants() {
        assert_eq!(output_formats::TEXT, "text");
        assert_eq!(output_formats::JSON, "json");
        assert_eq!(output_formats::DEFAULT, "text");
        assert_eq!(output_formats::ALL.len(), 2);
    }

    #[test]
    fn test_probe_timeouts() {
        assert_eq!(timeouts::PROBE_CONNECT_MS, 5000);
        assert_eq!(timeouts::PROBE_READ_MS, 10000);
    }

    #[test]
    fn test_discarded_status_codes() {
        assert!(http::DISCARDED_STATUS_CODES.contains(&400));
        assert!(http::DISCARDED_STATUS_CODES.contains(&404));
        assert!(!http::DISCARDED_STATUS_CODES.contains(&403));
        assert!(!http::DISCARDED_STATUS_CODES.contains(&500));
    }

    #[test]
    fn test_excluded_extensions_are_lowercase_suffixes() {
        for ext in filters::EXCLUDED_EXTENSIONS {
            assert!(ext.starts_with('.'));
            assert_eq!(ext, ext.to_lowercase());
        }
    }

    #[test]
    fn test_thread_bounds() {
        assert!(defaults::MIN_THREADS <= defaults::THREADS);
        assert!(defaults::THREADS <= defaults::MAX_THREADS);
    }
}
