use clap::Parser;
use std::io::IsTerminal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use wayprobe::config::{CliConfig, Config};
use wayprobe::core::constants::output_formats;
use wayprobe::core::types::{EventSink, RunEvent, RunStatus};
use wayprobe::probe::Cancellation;
use wayprobe::reporting::logging;
use wayprobe::scanner::Scanner;
use wayprobe::ui::output;
use wayprobe::ui::{Cli, ProgressReporter, cli_to_config};

/// Exit code of a process terminated by SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run_wayprobe(&cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Main fetch-and-check logic extracted from main() for testing
pub async fn run_wayprobe(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    // Parse CLI arguments into CliConfig using the derive-based CLI
    let cli_config = cli_to_config(cli);

    // Load and merge configuration
    let config = load_and_merge_config(&cli_config)?;
    config.validate()?;

    // Setup logging and output settings
    let output_settings = setup_output_settings(&cli_config, &config);
    logging::init_logger(output_settings.verbose, output_settings.quiet);
    logging::log_config_info(&config);
    if config.skip_ssl_verification.unwrap_or(false) {
        logging::log_warning("SSL certificate verification is disabled");
    }

    let scanner = Scanner::from_config(&config)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let events = EventSink::new(tx);
    let reporter = ProgressReporter::new(
        output_settings.show_progress,
        output_settings.show_messages(),
    )
    .spawn(rx);

    let cancellation = Cancellation::new();
    let stop_listener = spawn_stop_listener(cancellation.clone(), events.clone());

    let summary = scanner
        .run(
            &cli.domain,
            &cli.limit_text(config.limit()),
            config.threads(),
            cancellation,
            events,
        )
        .await;

    // The reporter drains until the last sender is gone
    stop_listener.abort();
    let _ = stop_listener.await;
    let _ = reporter.await;

    output::display_results(
        &summary,
        &output_settings.output_format,
        output_settings.quiet,
    )?;

    if let Some(ref path) = config.output_file
        && (summary.report.is_some() || output_settings.output_format == output_formats::JSON)
    {
        let contents = output::render_for_file(&summary, &output_settings.output_format)?;
        output::save_report(path, &contents)?;
        if !output_settings.quiet {
            eprintln!("Report saved to {path}");
        }
    }

    Ok(determine_exit_code(summary.status))
}

/// Load configuration from file or standard locations and merge with CLI config
pub fn load_and_merge_config(cli_config: &CliConfig) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if cli_config.no_config {
        Config::default()
    } else if let Some(ref config_file) = cli_config.config_file {
        Config::load_from_file(config_file).inspect_err(|e| {
            logging::log_error(
                &format!("Could not load config file '{config_file}'"),
                Some(e),
            );
        })?
    } else {
        Config::load_from_standard_locations()
    };

    // Merge CLI arguments with configuration (CLI takes precedence)
    config.merge_with_cli(cli_config);
    Ok(config)
}

/// Settings for output formatting and display
pub struct OutputSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub output_format: String,
    pub show_progress: bool,
}

impl OutputSettings {
    pub fn show_messages(&self) -> bool {
        !self.quiet
    }
}

/// Setup output settings based on CLI and config
pub fn setup_output_settings(cli_config: &CliConfig, config: &Config) -> OutputSettings {
    let quiet = cli_config.quiet;
    let verbose = config.verbose.unwrap_or(false);
    let output_format = config
        .output_format
        .as_deref()
        .unwrap_or(output_formats::DEFAULT)
        .to_string();
    let show_progress = !quiet
        && !cli_config.no_progress
        && output_format == output_formats::TEXT
        && std::io::stderr().is_terminal();

    OutputSettings {
        quiet,
        verbose,
        output_format,
        show_progress,
    }
}

/// Turn Ctrl-C into a stop request; a second Ctrl-C exits immediately.
fn spawn_stop_listener(cancellation: Cancellation, events: EventSink) -> JoinHandle<()> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if cancellation.cancel() {
                events.emit(RunEvent::StopAcknowledged);
            } else {
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        }
    })
}

/// Complete exits 0, Stopped exits 2, anything else exits 1
pub fn determine_exit_code(status: RunStatus) -> i32 {
    match status {
        RunStatus::Complete => 0,
        RunStatus::Stopped => 2,
        _ => 1,
    }
}
