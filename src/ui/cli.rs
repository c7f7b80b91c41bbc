// Command-line interface definitions and parsing for wayprobe

use crate::config::CliConfig;
use crate::core::constants::output_formats;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Domain whose archived URLs should be checked (e.g. example.com)
    pub domain: String,

    // Core Options
    /// Maximum number of archived URLs to request [default: 10000]
    #[arg(short = 'l', long, value_name = "COUNT", help_heading = "Core Options")]
    pub limit: Option<String>,

    /// Concurrent probe workers, 1-10 [default: 5]
    #[arg(short = 't', long, value_name = "COUNT", help_heading = "Core Options")]
    pub threads: Option<usize>,

    /// Probe connect timeout in milliseconds [default: 5000]
    #[arg(long, value_name = "MS", help_heading = "Core Options")]
    pub connect_timeout: Option<u64>,

    /// Probe read timeout in milliseconds [default: 10000]
    #[arg(long, value_name = "MS", help_heading = "Core Options")]
    pub read_timeout: Option<u64>,

    // Filtering
    /// URL suffixes to skip, replacing the built-in list (e.g. .png,.css)
    #[arg(long, value_name = "SUFFIXES", help_heading = "Filtering")]
    pub exclude_ext: Option<String>,

    /// URL patterns to exclude (regex)
    #[arg(long, value_name = "REGEX", help_heading = "Filtering")]
    pub exclude_pattern: Vec<String>,

    // Output & Verbosity
    /// Suppress progress and narrative output
    #[arg(short = 'q', long, help_heading = "Output & Verbosity")]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long, help_heading = "Output & Verbosity")]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_name = "FORMAT", value_parser = output_formats::ALL, help_heading = "Output & Verbosity")]
    pub format: Option<String>,

    /// Also write the report to this file
    #[arg(short = 'o', long, value_name = "FILE", help_heading = "Output & Verbosity")]
    pub output: Option<String>,

    /// Disable the progress bar
    #[arg(long, help_heading = "Output & Verbosity")]
    pub no_progress: bool,

    // Network & Security
    /// Custom User-Agent header for probes
    #[arg(long, value_name = "AGENT", help_heading = "Network & Security")]
    pub user_agent: Option<String>,

    /// Archive index endpoint
    #[arg(long, value_name = "URL", help_heading = "Network & Security")]
    pub archive_url: Option<String>,

    /// HTTP/HTTPS proxy URL
    #[arg(long, value_name = "URL", help_heading = "Network & Security")]
    pub proxy: Option<String>,

    /// Skip SSL certificate verification
    #[arg(long, help_heading = "Network & Security")]
    pub insecure: bool,

    // Configuration
    /// Use specific config file
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Ignore config files
    #[arg(long, help_heading = "Configuration")]
    pub no_config: bool,
}

impl Cli {
    /// Raw limit text; non-numeric input is rejected by the run itself.
    pub fn limit_text(&self, configured: u64) -> String {
        self.limit
            .clone()
            .unwrap_or_else(|| configured.to_string())
    }
}

/// Convert derive-based CLI arguments directly to CliConfig structure
pub fn cli_to_config(cli: &Cli) -> CliConfig {
    let mut cli_config = CliConfig::default();

    // Run parameters
    cli_config.threads = cli.threads;

    // Probe behaviour
    cli_config.connect_timeout = cli.connect_timeout;
    cli_config.read_timeout = cli.read_timeout;
    cli_config.user_agent = cli.user_agent.clone();

    // Filtering
    if let Some(ref suffixes) = cli.exclude_ext {
        cli_config.excluded_extensions = Some(
            suffixes
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        );
    }
    if !cli.exclude_pattern.is_empty() {
        cli_config.exclude_patterns = Some(cli.exclude_pattern.clone());
    }

    // Network & security
    cli_config.archive_url = cli.archive_url.clone();
    cli_config.proxy = cli.proxy.clone();
    cli_config.skip_ssl_verification = cli.insecure;

    // Output
    cli_config.quiet = cli.quiet;
    cli_config.verbose = cli.verbose;
    cli_config.output_format = cli.format.clone();
    cli_config.output_file = cli.output.clone();
    cli_config.no_progress = cli.no_progress;

    // Configuration
    cli_config.config_file = cli.config.clone();
    cli_config.no_config = cli.no_config;

    cli_config
}
