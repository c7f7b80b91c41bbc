//! Configuration management
//!
//! This module handles loading and managing configuration from
//! TOML files and CLI arguments.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::constants::{archive, defaults, filters, http, output_formats, timeouts};
use crate::core::error::{Result, WayprobeError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of concurrent probe workers (1-10)
    pub threads: Option<usize>,

    /// Maximum number of archived URLs to request
    pub limit: Option<u64>,

    /// Probe connect timeout in milliseconds
    pub connect_timeout: Option<u64>,

    /// Probe read timeout in milliseconds
    pub read_timeout: Option<u64>,

    /// Custom User-Agent header for probes
    pub user_agent: Option<String>,

    /// URL suffixes that are never probed
    pub excluded_extensions: Option<Vec<String>>,

    /// Additional URL patterns to exclude (regex)
    pub exclude_patterns: Option<Vec<String>>,

    /// Archive index endpoint
    pub archive_url: Option<String>,

    /// HTTP/HTTPS proxy URL
    pub proxy: Option<String>,

    /// Skip SSL certificate verification
    pub skip_ssl_verification: Option<bool>,

    /// Output format (text, json)
    pub output_format: Option<String>,

    /// Write the rendered report to this file
    pub output_file: Option<String>,

    /// Enable verbose logging
    pub verbose: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: Some(defaults::THREADS),
            limit: Some(defaults::LIMIT),
            connect_timeout: Some(timeouts::PROBE_CONNECT_MS),
            read_timeout: Some(timeouts::PROBE_READ_MS),
            user_agent: None,
            excluded_extensions: None,
            exclude_patterns: None,
            archive_url: None,
            proxy: None,
            skip_ssl_verification: Some(false),
            output_format: Some(output_formats::DEFAULT.to_string()),
            output_file: None,
            verbose: Some(false),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            WayprobeError::Config(format!(
                "Could not read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            WayprobeError::Config(format!(
                "Invalid TOML in config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Try to find and load a config file in standard locations
    pub fn load_from_standard_locations() -> Self {
        if let Ok(config) = Self::load_from_file(defaults::CONFIG_FILE_NAME) {
            return config;
        }

        // Parent directories, up to 3 levels
        for i in 1..=3 {
            let path = format!("{}{}", "../".repeat(i), defaults::CONFIG_FILE_NAME);
            if let Ok(config) = Self::load_from_file(&path) {
                return config;
            }
        }

        Self::default()
    }

    /// Merge this config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli_config: &CliConfig) {
        // Run parameters
        if let Some(threads) = cli_config.threads {
            self.threads = Some(threads);
        }

        // Probe behaviour
        if let Some(connect_timeout) = cli_config.connect_timeout {
            self.connect_timeout = Some(connect_timeout);
        }
        if let Some(read_timeout) = cli_config.read_timeout {
            self.read_timeout = Some(read_timeout);
        }
        if let Some(ref user_agent) = cli_config.user_agent {
            self.user_agent = Some(user_agent.clone());
        }

        // Filtering
        if let Some(ref extensions) = cli_config.excluded_extensions {
            self.excluded_extensions = Some(extensions.clone());
        }
        if let Some(ref patterns) = cli_config.exclude_patterns {
            self.exclude_patterns = Some(patterns.clone());
        }

        // Network & security
        if let Some(ref archive_url) = cli_config.archive_url {
            self.archive_url = Some(archive_url.clone());
        }
        if let Some(ref proxy) = cli_config.proxy {
            self.proxy = Some(proxy.clone());
        }
        if cli_config.skip_ssl_verification {
            self.skip_ssl_verification = Some(true);
        }

        // Output
        if let Some(ref output_format) = cli_config.output_format {
            self.output_format = Some(output_format.clone());
        }
        if let Some(ref output_file) = cli_config.output_file {
            self.output_file = Some(output_file.clone());
        }
        if cli_config.verbose {
            self.verbose = Some(true);
        }
    }

    /// Compile exclude patterns into regex objects
    pub fn compile_exclude_patterns(&self) -> Result<Vec<Regex>> {
        let mut compiled = Vec::new();
        if let Some(ref patterns) = self.exclude_patterns {
            for pattern in patterns {
                compiled.push(Regex::new(pattern)?);
            }
        }
        Ok(compiled)
    }

    /// Suffix denylist, lowercased
    pub fn excluded_extensions(&self) -> Vec<String> {
        match self.excluded_extensions {
            Some(ref extensions) => extensions.iter().map(|ext| ext.to_lowercase()).collect(),
            None => filters::EXCLUDED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }

    pub fn threads(&self) -> usize {
        self.threads.unwrap_or(defaults::THREADS)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(defaults::LIMIT)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(http::USER_AGENT)
    }

    pub fn archive_url(&self) -> &str {
        self.archive_url.as_deref().unwrap_or(archive::CDX_ENDPOINT)
    }

    /// Get probe connect timeout as Duration
    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.connect_timeout.unwrap_or(timeouts::PROBE_CONNECT_MS))
    }

    /// Get probe read timeout as Duration
    pub fn read_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.read_timeout.unwrap_or(timeouts::PROBE_READ_MS))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(threads) = self.threads
            && !(defaults::MIN_THREADS..=defaults::MAX_THREADS).contains(&threads)
        {
            return Err(WayprobeError::Config(format!(
                "Thread count {threads} is out of range. Expected a value between {}-{}.",
                defaults::MIN_THREADS,
                defaults::MAX_THREADS
            )));
        }

        if let Some(0) = self.limit {
            return Err(WayprobeError::Config(
                "Limit cannot be 0. Expected a positive integer.".to_string(),
            ));
        }

        for (name, timeout) in [
            ("Connect timeout", self.connect_timeout),
            ("Read timeout", self.read_timeout),
        ] {
            match timeout {
                Some(0) => {
                    return Err(WayprobeError::Config(format!(
                        "{name} cannot be 0. Expected a positive integer representing milliseconds."
                    )));
                }
                Some(ms) if ms > timeouts::MAX_TIMEOUT_MS => {
                    return Err(WayprobeError::Config(format!(
                        "{name} of {ms}ms is extremely large. Expected at most {}ms.",
                        timeouts::MAX_TIMEOUT_MS
                    )));
                }
                _ => {}
            }
        }

        if let Some(ref extensions) = self.excluded_extensions {
            for ext in extensions {
                if ext.trim().is_empty() {
                    return Err(WayprobeError::Config(
                        "Excluded extensions cannot contain empty entries.".to_string(),
                    ));
                }
            }
        }

        if let Some(ref format) = self.output_format
            && !output_formats::ALL.contains(&format.as_str())
        {
            return Err(WayprobeError::Config(format!(
                "Invalid output format '{format}'. Expected one of: {}.",
                output_formats::ALL.join(", ")
            )));
        }

        // Validate exclude patterns by trying to compile them
        self.compile_exclude_patterns()?;

        Ok(())
    }
}

/// Configuration options that can come from CLI
#[derive(Debug, Default)]
pub struct CliConfig {
    // Run parameters
    pub threads: Option<usize>, // --threads

    // Probe behaviour
    pub connect_timeout: Option<u64>, // --connect-timeout
    pub read_timeout: Option<u64>,    // --read-timeout
    pub user_agent: Option<String>,   // --user-agent

    // Filtering
    pub excluded_extensions: Option<Vec<String>>, // --exclude-ext
    pub exclude_patterns: Option<Vec<String>>,    // --exclude-pattern

    // Network & security
    pub archive_url: Option<String>, // --archive-url
    pub proxy: Option<String>,       // --proxy
    pub skip_ssl_verification: bool, // --insecure

    // Output
    pub quiet: bool,                   // --quiet
    pub verbose: bool,                 // --verbose
    pub output_format: Option<String>, // --format
    pub output_file: Option<String>,   // --output
    pub no_progress: bool,             // --no-progress

    // Configuration
    pub config_file: Option<String>, // --config
    pub no_config: bool,             // --no-config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.threads(), 5);
        assert_eq!(config.limit(), 10000);
        assert_eq!(config.connect_timeout_duration(), Duration::from_millis(5000));
        assert_eq!(config.read_timeout_duration(), Duration::from_millis(10000));
        assert_eq!(config.user_agent(), http::USER_AGENT);
        assert_eq!(config.archive_url(), archive::CDX_ENDPOINT);
        assert_eq!(
            config.output_format,
            Some(output_formats::DEFAULT.to_string())
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_default_extensions() {
        let config = Config::default();
        let extensions = config.excluded_extensions();
        assert_eq!(extensions.len(), 10);
        assert!(extensions.contains(&".woff2".to_string()));
    }

    #[test]
    fn test_config_custom_extensions_are_lowercased() {
        let config = Config {
            excluded_extensions: Some(vec![".PDF".to_string(), ".Js".to_string()]),
            ..Default::default()
        };
        assert_eq!(config.excluded_extensions(), vec![".pdf", ".js"]);
    }

    #[test]
    fn test_config_load_from_file() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"threads = 8\nlimit = 500\nuser_agent = \"test-agent\"")?;

        let config = Config::load_from_file(file.path())?;
        assert_eq!(config.threads, Some(8));
        assert_eq!(config.limit, Some(500));
        assert_eq!(config.user_agent, Some("test-agent".to_string()));
        // Missing keys fall back to defaults
        assert_eq!(config.connect_timeout, Some(timeouts::PROBE_CONNECT_MS));

        Ok(())
    }

    #[test]
    fn test_config_load_from_file_rejects_invalid_values() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"threads = 50")?;

        let err = Config::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, WayprobeError::Config(_)));
        Ok(())
    }

    #[test]
    fn test_config_load_from_missing_file() {
        let err = Config::load_from_file("/nonexistent/wayprobe.toml").unwrap_err();
        assert!(format!("{err}").contains("Could not read config file"));
    }

    #[test]
    fn test_config_load_from_invalid_toml() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"threads = [")?;

        let err = Config::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, WayprobeError::Config(_)));
        assert!(format!("{err}").contains("Invalid TOML"));
        assert!(format!("{err}").contains(&file.path().display().to_string()));
        Ok(())
    }

    #[test]
    fn test_config_merge_with_cli() {
        let mut config = Config::default();
        let cli_config = CliConfig {
            threads: Some(2),
            read_timeout: Some(2500),
            skip_ssl_verification: true,
            output_format: Some("json".to_string()),
            verbose: true,
            ..Default::default()
        };

        config.merge_with_cli(&cli_config);

        assert_eq!(config.threads, Some(2));
        assert_eq!(config.read_timeout, Some(2500));
        assert_eq!(config.skip_ssl_verification, Some(true));
        assert_eq!(config.output_format, Some("json".to_string()));
        assert_eq!(config.verbose, Some(true));
        // Untouched values survive the merge
        assert_eq!(config.connect_timeout, Some(timeouts::PROBE_CONNECT_MS));
    }

    #[test]
    fn test_compile_exclude_patterns() -> Result<()> {
        let config = Config {
            exclude_patterns: Some(vec![r"\.js(\?.*)?$".to_string(), r"/static/".to_string()]),
            ..Default::default()
        };

        let patterns = config.compile_exclude_patterns()?;
        assert_eq!(patterns.len(), 2);
        assert!(patterns[0].is_match("http://example.com/app.js?v=2"));
        assert!(patterns[1].is_match("http://example.com/static/x"));
        assert!(!patterns[1].is_match("http://example.com/api"));
        Ok(())
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = vec![
            Config {
                threads: Some(0),
                ..Default::default()
            },
            Config {
                threads: Some(11),
                ..Default::default()
            },
            Config {
                limit: Some(0),
                ..Default::default()
            },
            Config {
                connect_timeout: Some(0),
                ..Default::default()
            },
            Config {
                read_timeout: Some(timeouts::MAX_TIMEOUT_MS + 1),
                ..Default::default()
            },
            Config {
                excluded_extensions: Some(vec![" ".to_string()]),
                ..Default::default()
            },
            Config {
                output_format: Some("xml".to_string()),
                ..Default::default()
            },
            Config {
                exclude_patterns: Some(vec!["[invalid".to_string()]),
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(config.validate().is_err(), "expected rejection: {config:?}");
        }
    }
}
