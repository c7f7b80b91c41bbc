//! Output formatting and display logic for wayprobe
//!
//! The report goes to stdout and, on request, to a file. Footers and errors
//! go to stderr.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::constants::{messages, output_formats};
use crate::core::error::{Result, WayprobeError};
use crate::core::types::{ProbeOutcome, RunStatus};
use crate::scanner::RunSummary;
use crate::ui::color::{Colors, colorize};

/// Machine readable form of a finished run
#[derive(Debug, Serialize)]
struct JsonSummary<'a> {
    domain: &'a str,
    status: RunStatus,
    generated_at: String,
    fetched: usize,
    checked: usize,
    completed: usize,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    results: &'a [ProbeOutcome],
}

/// Render a finished run in the requested format.
///
/// Text output for a failed run is its explanation; otherwise it is the
/// report table.
pub fn render(summary: &RunSummary, format: &str) -> Result<String> {
    match format {
        output_formats::JSON => render_json(summary),
        _ => Ok(render_text(summary)),
    }
}

pub fn render_text(summary: &RunSummary) -> String {
    match (&summary.report, &summary.error) {
        (Some(report), _) => report.render(),
        (None, Some(error)) => format!("{error}\n"),
        (None, None) => String::new(),
    }
}

/// Render a finished run for `--output`.
///
/// Saved text reports end with the terminal status line, so a partial
/// report from a stopped run reads differently from a complete one.
pub fn render_for_file(summary: &RunSummary, format: &str) -> Result<String> {
    let mut rendered = render(summary, format)?;
    if format != output_formats::JSON
        && let Some(line) = terminal_status_line(summary.status)
    {
        rendered.push('\n');
        rendered.push_str(line);
        rendered.push('\n');
    }
    Ok(rendered)
}

/// `[*] All checks complete.` or `[*] Process stopped by user.`
pub fn terminal_status_line(status: RunStatus) -> Option<&'static str> {
    match status {
        RunStatus::Complete => Some(messages::RUN_COMPLETE),
        RunStatus::Stopped => Some(messages::RUN_STOPPED),
        _ => None,
    }
}

pub fn render_json(summary: &RunSummary) -> Result<String> {
    let results = summary
        .report
        .as_ref()
        .map(|r| r.entries())
        .unwrap_or_default();

    let json = JsonSummary {
        domain: &summary.domain,
        status: summary.status,
        generated_at: chrono::Utc::now().to_rfc3339(),
        fetched: summary.fetched,
        checked: summary.to_check,
        completed: summary.completed,
        elapsed_ms: u64::try_from(summary.elapsed.as_millis()).unwrap_or(u64::MAX),
        error: summary.error.as_deref(),
        results,
    };
    let mut rendered = serde_json::to_string_pretty(&json)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Print a finished run.
///
/// Failed text runs print their explanation to stderr so that stdout stays
/// empty; JSON always goes to stdout.
pub fn display_results(summary: &RunSummary, format: &str, quiet: bool) -> Result<()> {
    let rendered = render(summary, format)?;

    if format != output_formats::JSON && summary.status == RunStatus::Error {
        eprint!("{}", colorize(&rendered, Colors::BRIGHT_RED));
        return Ok(());
    }

    print!("{rendered}");
    if !quiet && format != output_formats::JSON {
        eprintln!("{}", summary_footer(summary));
    }
    Ok(())
}

/// One line recap shown under a text report
pub fn summary_footer(summary: &RunSummary) -> String {
    let (recorded, errors) = summary
        .report
        .as_ref()
        .map(|r| (r.len(), r.error_count()))
        .unwrap_or((0, 0));
    let seconds = summary.elapsed.as_secs_f64();

    let line = format!(
        "{}/{} checked, {recorded} recorded, {errors} errors in {seconds:.1}s",
        summary.completed, summary.to_check
    );
    match summary.status {
        RunStatus::Complete => colorize(&line, Colors::BRIGHT_GREEN),
        RunStatus::Stopped => colorize(&line, Colors::BRIGHT_YELLOW),
        _ => colorize(&line, Colors::BRIGHT_RED),
    }
}

/// Persist rendered output, replacing the file if it exists
pub fn save_report<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, contents).map_err(|e| {
        WayprobeError::Io(std::io::Error::new(
            e.kind(),
            format!("Could not write report to '{}': {e}", path.display()),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::Report;
    use std::time::Duration;

    fn summary(status: RunStatus, report: Option<Report>, error: Option<&str>) -> RunSummary {
        RunSummary {
            domain: "example.com".to_string(),
            status,
            report,
            error: error.map(String::from),
            fetched: 3,
            to_check: 1,
            completed: 1,
            elapsed: Duration::from_millis(1500),
        }
    }

    fn sample_report() -> Report {
        Report::build(vec![ProbeOutcome::response(
            "http://example.com/b".to_string(),
            200,
            Some(512),
        )])
    }

    #[test]
    fn test_render_text_report() {
        let rendered = render_text(&summary(RunStatus::Complete, Some(sample_report()), None));

        assert!(rendered.starts_with("Status   Response Size   URL\n"));
        assert!(rendered.contains("http://example.com/b"));
    }

    #[test]
    fn test_render_text_error() {
        let rendered = render_text(&summary(
            RunStatus::Error,
            None,
            Some("Error: Please enter a domain name."),
        ));

        assert_eq!(rendered, "Error: Please enter a domain name.\n");
    }

    #[test]
    fn test_render_json() -> Result<()> {
        let rendered = render(
            &summary(RunStatus::Complete, Some(sample_report()), None),
            output_formats::JSON,
        )?;
        let value: serde_json::Value = serde_json::from_str(&rendered)?;

        assert_eq!(value["domain"], "example.com");
        assert_eq!(value["status"], "Complete");
        assert!(value["generated_at"].as_str().is_some_and(|t| t.contains('T')));
        assert_eq!(value["fetched"], 3);
        assert_eq!(value["checked"], 1);
        assert_eq!(value["elapsed_ms"], 1500);
        assert!(value.get("error").is_none());
        assert_eq!(value["results"][0]["status_code"], 200);
        assert_eq!(value["results"][0]["response_size"], 512);
        Ok(())
    }

    #[test]
    fn test_render_json_error() -> Result<()> {
        let rendered = render_json(&summary(
            RunStatus::Error,
            None,
            Some("Error: Invalid limit. Please enter a number."),
        ))?;
        let value: serde_json::Value = serde_json::from_str(&rendered)?;

        assert_eq!(value["status"], "Error");
        assert_eq!(value["error"], "Error: Invalid limit. Please enter a number.");
        assert_eq!(value["results"], serde_json::json!([]));
        Ok(())
    }

    #[test]
    fn test_summary_footer() {
        let footer = summary_footer(&summary(RunStatus::Stopped, Some(sample_report()), None));
        assert_eq!(footer, "1/1 checked, 1 recorded, 0 errors in 1.5s");
    }

    #[test]
    fn test_render_for_file_complete_has_status_line() -> Result<()> {
        let rendered = render_for_file(
            &summary(RunStatus::Complete, Some(sample_report()), None),
            output_formats::TEXT,
        )?;

        assert!(rendered.starts_with("Status   Response Size   URL\n"));
        assert!(rendered.ends_with("\n[*] All checks complete.\n"));
        Ok(())
    }

    #[test]
    fn test_render_for_file_stopped_has_status_line() -> Result<()> {
        let rendered = render_for_file(
            &summary(RunStatus::Stopped, Some(sample_report()), None),
            output_formats::TEXT,
        )?;

        assert!(rendered.contains("http://example.com/b"));
        assert!(rendered.ends_with("\n[*] Process stopped by user.\n"));
        assert!(!rendered.contains("All checks complete."));
        Ok(())
    }

    #[test]
    fn test_render_for_file_json_unchanged() -> Result<()> {
        let run = summary(RunStatus::Stopped, Some(sample_report()), None);
        let rendered = render_for_file(&run, output_formats::JSON)?;
        let value: serde_json::Value = serde_json::from_str(&rendered)?;

        assert_eq!(value["status"], "Stopped");
        assert!(!rendered.contains("Process stopped by user."));
        Ok(())
    }

    #[test]
    fn test_terminal_status_line() {
        assert_eq!(
            terminal_status_line(RunStatus::Complete),
            Some(messages::RUN_COMPLETE)
        );
        assert_eq!(
            terminal_status_line(RunStatus::Stopped),
            Some(messages::RUN_STOPPED)
        );
        assert_eq!(terminal_status_line(RunStatus::Error), None);
    }

    #[test]
    fn test_save_report() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("report.txt");

        save_report(&path, "Status   Response Size   URL\n")?;
        assert_eq!(fs::read_to_string(&path)?, "Status   Response Size   URL\n");
        Ok(())
    }

    #[test]
    fn test_save_report_missing_directory() {
        let err = save_report("/nonexistent/dir/report.txt", "x").unwrap_err();
        assert!(format!("{err}").contains("Could not write report"));
    }
}
