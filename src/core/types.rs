use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

use crate::core::constants::{defaults, messages, report};
use crate::core::error::{Result, WayprobeError};

/// The result of probing a single archived URL.
///
/// Created exactly once per probed target and never mutated afterwards.
/// Transport failures are recorded with the [`report::ERROR_STATUS`]
/// sentinel and carry a diagnostic in `error_detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    /// The probed URL, including its scheme
    pub url: String,
    /// HTTP status code, or `-1` for a transport failure
    pub status_code: i32,
    /// Declared content length, or `-1` when unknown
    pub response_size: i64,
    /// Present only when `status_code == -1`
    pub error_detail: Option<String>,
}

impl ProbeOutcome {
    /// Create an outcome for a response that produced a status line.
    pub fn response(url: String, status_code: u16, content_length: Option<u64>) -> Self {
        let response_size = content_length
            .map(|len| i64::try_from(len).unwrap_or(i64::MAX))
            .unwrap_or(report::UNKNOWN_SIZE);

        Self {
            url,
            status_code: i32::from(status_code),
            response_size,
            error_detail: None,
        }
    }

    /// Create an outcome for a request that never produced a response.
    pub fn transport_error(url: String, cause: &str) -> Self {
        let error_detail = format!("[!] Error on {url}: {cause}");
        Self {
            url,
            status_code: report::ERROR_STATUS,
            response_size: report::UNKNOWN_SIZE,
            error_detail: Some(error_detail),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status_code == report::ERROR_STATUS
    }

    /// Declared size, if the server sent one
    pub fn size(&self) -> Option<i64> {
        (self.response_size != report::UNKNOWN_SIZE).then_some(self.response_size)
    }
}

/// Lifecycle of a single fetch-and-check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    Idle,
    FetchingList,
    Checking,
    Complete,
    Stopped,
    Error,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Stopped | Self::Error)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "Idle",
            Self::FetchingList => "Fetching list",
            Self::Checking => "Checking",
            Self::Complete => "Complete",
            Self::Stopped => "Stopped",
            Self::Error => "Error",
        };
        f.write_str(label)
    }
}

/// Notifications sent from a run to whoever renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// The run moved to a new state
    Status(RunStatus),
    /// A narrative line for the log area
    Message(String),
    /// A probe finished; `completed` never exceeds `total`
    Progress { completed: usize, total: usize },
    /// A stop request was accepted
    StopAcknowledged,
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "Status: {status}"),
            Self::Message(message) => f.write_str(message),
            Self::Progress { completed, total } => write!(f, "Checking: {completed} / {total}"),
            Self::StopAcknowledged => f.write_str(messages::STOP_ACKNOWLEDGED),
        }
    }
}

/// Sending half of the run event channel.
///
/// A disabled sink swallows everything, as does a sink whose receiver is gone.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<UnboundedSender<RunEvent>>,
}

impl EventSink {
    pub fn new(sender: UnboundedSender<RunEvent>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: RunEvent) {
        if let Some(ref sender) = self.sender {
            let _ = sender.send(event);
        }
    }

    pub fn message(&self, message: impl Into<String>) {
        self.emit(RunEvent::Message(message.into()));
    }

    pub fn status(&self, status: RunStatus) {
        self.emit(RunEvent::Status(status));
    }
}

/// Validated parameters of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub domain: String,
    pub limit: u64,
    pub threads: usize,
}

impl RunRequest {
    /// Validate raw user input.
    ///
    /// The limit is taken as text so that non-numeric input is reported as a
    /// validation error of the run rather than rejected by argument parsing.
    ///
    /// # Examples
    /// ```
    /// use wayprobe::RunRequest;
    ///
    /// let request = RunRequest::new(" example.com ", "500", 5).unwrap();
    /// assert_eq!(request.domain, "example.com");
    /// assert_eq!(request.limit, 500);
    ///
    /// assert!(RunRequest::new("example.com", "abc", 5).is_err());
    /// ```
    pub fn new(domain: &str, limit: &str, threads: usize) -> Result<Self> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(WayprobeError::Validation(messages::EMPTY_DOMAIN.to_string()));
        }

        let limit = match limit.trim().parse::<u64>() {
            Ok(limit) if limit > 0 => limit,
            _ => {
                return Err(WayprobeError::Validation(
                    messages::INVALID_LIMIT.to_string(),
                ));
            }
        };

        if !(defaults::MIN_THREADS..=defaults::MAX_THREADS).contains(&threads) {
            return Err(WayprobeError::Validation(format!(
                "Thread count {threads} is out of range. Expected a value between {}-{}.",
                defaults::MIN_THREADS,
                defaults::MAX_THREADS
            )));
        }

        Ok(Self {
            domain: domain.to_string(),
            limit,
            threads,
        })
    }
}
