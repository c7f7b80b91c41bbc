use crate::config::Config;
use log::{debug, error, info, warn};

/// Initialize the logger with appropriate level based on verbosity
pub fn init_logger(verbose: bool, quiet: bool) {
    let level = if quiet {
        log::LevelFilter::Off
    } else if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off // Only show structured logs in verbose mode
    };

    // try_init: a second initialization (tests, embedding) is not an error
    let _ = logger_builder(level).try_init();

    debug!("Logger initialized with level: {level:?}");
}

/// Plain `LEVEL message` lines: no timestamp, module path or target
fn logger_builder(level: log::LevelFilter) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_default_env();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);
    builder
}

/// Log configuration information
pub fn log_config_info(config: &Config) {
    let skip_ssl_verification = config.skip_ssl_verification.unwrap_or(false);

    info!(
        "Configuration: threads={}, limit={}, connect_timeout={}ms, read_timeout={}ms",
        config.threads(),
        config.limit(),
        config.connect_timeout_duration().as_millis(),
        config.read_timeout_duration().as_millis()
    );
    info!(
        "HTTP: archive={}, proxy={}, skip_ssl={skip_ssl_verification}",
        config.archive_url(),
        config.proxy.as_deref().unwrap_or("none")
    );
    debug!("Excluded extensions: {:?}", config.excluded_extensions());
}

/// Log the archive query about to be issued
pub fn log_archive_query(domain: &str, query: &str) {
    info!("Querying archive index for {domain}");
    debug!("  {query}");
}

/// Log how many URLs survived each filtering stage
pub fn log_filtering(fetched: usize, after_extensions: usize, after_patterns: usize) {
    info!(
        "Filtering: {fetched} fetched, {} static assets removed, {} excluded by pattern",
        fetched - after_extensions,
        after_extensions - after_patterns
    );
}

/// Log check start
pub fn log_checks_start(url_count: usize, workers: usize) {
    info!("Starting checks of {url_count} URLs with {workers} workers");
}

/// Log check completion
pub fn log_checks_complete(completed: usize, total: usize, recorded: usize, duration_ms: u128) {
    if completed == total {
        info!("✅ Checks complete: {completed}/{total} URLs, {recorded} recorded ({duration_ms}ms)");
    } else {
        warn!(
            "⏹ Checks stopped: {completed}/{total} URLs, {recorded} recorded ({duration_ms}ms)"
        );
    }
}

/// Log individual probe results for debugging
pub fn log_probe_result(url: &str, status: Option<i32>, detail: Option<&str>) {
    match (status, detail) {
        (Some(status), None) => debug!("✓ {url} -> {status}"),
        (Some(status), Some(desc)) => debug!("✗ {url} -> {status} ({desc})"),
        (None, Some(desc)) => debug!("✗ {url} -> {desc}"),
        (None, None) => debug!("? {url} -> unknown"),
    }
}

/// Log error information
pub fn log_error(message: &str, source: Option<&dyn std::error::Error>) {
    match source {
        Some(err) => error!("{message}: {err}"),
        None => error!("{message}"),
    }
}

/// Log warning information
pub fn log_warning(message: &str) {
    warn!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_logger_initialization_verbose() {
        init_logger(true, false);
        // Re-initialization is tolerated
        init_logger(false, false);
    }

    #[test]
    fn test_logger_builder_applies_level() {
        assert_eq!(
            logger_builder(log::LevelFilter::Debug).build().filter(),
            log::LevelFilter::Debug
        );
        assert_eq!(
            logger_builder(log::LevelFilter::Off).build().filter(),
            log::LevelFilter::Off
        );
    }

    #[test]
    fn test_logger_initialization_quiet() {
        init_logger(false, true);
    }

    #[test]
    fn test_log_config_info() {
        log_config_info(&Config::default());
        log_config_info(&Config {
            proxy: Some("http://proxy.local:8080".to_string()),
            skip_ssl_verification: Some(true),
            ..Default::default()
        });
    }

    #[test]
    fn test_log_filtering_and_checks() {
        log_archive_query("example.com", "http://web.archive.org/cdx/search/cdx?url=example.com");
        log_filtering(10, 7, 5);
        log_filtering(0, 0, 0);
        log_checks_start(5, 3);
        log_checks_complete(5, 5, 4, 120);
        log_checks_complete(2, 5, 2, 80);
    }

    #[test]
    fn test_log_probe_result_variations() {
        log_probe_result("http://example.com", Some(200), None);
        log_probe_result("http://example.com/x", Some(-1), Some("operation timed out"));
        log_probe_result("http://example.com/y", None, Some("discarded"));
        log_probe_result("http://example.com/z", None, None);
    }

    #[test]
    fn test_log_error_and_warning() {
        let err = io::Error::new(io::ErrorKind::NotFound, "missing");
        log_error("Could not write report", Some(&err));
        log_error("Plain failure", None);
        log_warning("Something odd");
    }
}
