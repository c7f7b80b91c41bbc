use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::core::types::{RunEvent, RunStatus};

/// Renders run events on the terminal.
///
/// Narrative lines go above the bar (or to stderr when the bar is off).
/// Nothing here ever writes to stdout, which is reserved for the report.
pub struct ProgressReporter {
    multi_progress: Arc<MultiProgress>,
    check_progress: Option<ProgressBar>,
    fetch_spinner: Option<ProgressBar>,
    enabled: bool,
    show_messages: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool, show_messages: bool) -> Self {
        Self {
            multi_progress: Arc::new(MultiProgress::new()),
            check_progress: None,
            fetch_spinner: None,
            enabled,
            show_messages,
        }
    }

    /// Consume events until every sender is gone.
    pub fn spawn(mut self, mut events: UnboundedReceiver<RunEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                self.handle_event(&event);
            }
            self.finish_and_clear();
        })
    }

    pub fn handle_event(&mut self, event: &RunEvent) {
        match event {
            RunEvent::Status(RunStatus::FetchingList) => {
                self.fetch_spinner = self.create_spinner("Fetching archived URL list");
            }
            RunEvent::Status(RunStatus::Checking) => self.finish_fetching(),
            RunEvent::Status(status) if status.is_terminal() => {
                self.finish_fetching();
                self.finish_checking(*status);
            }
            RunEvent::Status(_) => {}
            RunEvent::Message(message) => self.log_info(message),
            RunEvent::Progress { completed, total } => self.update(*completed, *total),
            RunEvent::StopAcknowledged => self.log_warning(&event.to_string()),
        }
    }

    fn start_checking(&mut self, total: usize) {
        if !self.enabled {
            return;
        }

        let pb = self.multi_progress.add(ProgressBar::new(total as u64));
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.yellow/red}] Checking: {pos} / {len} ({eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.enable_steady_tick(Duration::from_millis(120));
        self.check_progress = Some(pb);
    }

    fn update(&mut self, completed: usize, total: usize) {
        if self.check_progress.is_none() {
            self.start_checking(total);
        }
        if let Some(ref pb) = self.check_progress {
            pb.set_position(completed as u64);
        }
    }

    fn finish_fetching(&mut self) {
        if let Some(spinner) = self.fetch_spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn finish_checking(&mut self, status: RunStatus) {
        if let Some(pb) = self.check_progress.take() {
            let message = match status {
                RunStatus::Complete => "✓ All checks complete",
                RunStatus::Stopped => "⏹ Stopped",
                _ => "✗ Failed",
            };
            pb.finish_with_message(message);
        }
    }

    pub fn finish_and_clear(&self) {
        if self.enabled {
            self.multi_progress.clear().unwrap_or(());
        }
    }

    pub fn log_info(&self, message: &str) {
        if !self.show_messages {
            return;
        }
        if self.enabled {
            self.multi_progress.println(message).unwrap_or(());
        } else {
            eprintln!("{message}");
        }
    }

    pub fn log_warning(&self, message: &str) {
        if !self.show_messages {
            return;
        }
        if self.enabled {
            self.multi_progress
                .println(format!("⚠ {message}"))
                .unwrap_or(());
        } else {
            eprintln!("{message}");
        }
    }

    /// Create a simple spinner for indeterminate progress
    fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    }
}
