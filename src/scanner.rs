//! Fetch-and-check run orchestration
//!
//! A [`Scanner`] takes one run from raw user input to a terminal state:
//! validate the input, fetch the archived URL list, filter it, probe what is
//! left and build the report. Everything observable along the way is sent as
//! [`RunEvent`]s.

use regex::Regex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::core::constants::messages;
use crate::core::error::{Result, WayprobeError};
use crate::core::types::{EventSink, RunEvent, RunRequest, RunStatus};
use crate::discovery::{
    UrlSource, WaybackCdx, apply_exclude_patterns, filter_urls, normalize_target,
};
use crate::probe::{Cancellation, HttpProber, ProbeUrl, WorkerPool};
use crate::reporting::{Report, logging};

/// How a run ended, and what it produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub domain: String,
    pub status: RunStatus,
    /// Present for Complete and Stopped runs
    pub report: Option<Report>,
    /// User facing explanation, present for Error runs
    pub error: Option<String>,
    /// URLs returned by the archive
    pub fetched: usize,
    /// URLs left after filtering
    pub to_check: usize,
    /// Probes finished before the run ended
    pub completed: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    fn failed(domain: &str, error: &WayprobeError, fetched: usize, start: Instant) -> Self {
        Self {
            domain: domain.to_string(),
            status: RunStatus::Error,
            report: None,
            error: Some(explain_failure(error)),
            fetched,
            to_check: 0,
            completed: 0,
            elapsed: start.elapsed(),
        }
    }
}

/// User facing text for a run that ended in [`RunStatus::Error`].
pub fn explain_failure(error: &WayprobeError) -> String {
    match error {
        WayprobeError::Validation(msg) => format!("Error: {msg}"),
        WayprobeError::ListRetrieval(details) => format!(
            "[!] Error retrieving archived URLs.\n    \
             Please check the domain and your network connection.\n\n    \
             Error details: {details}"
        ),
        other => format!("[!] {other}"),
    }
}

pub struct Scanner<S: UrlSource, P: ProbeUrl + ?Sized> {
    source: S,
    prober: Arc<P>,
    excluded_extensions: Vec<String>,
    exclude_patterns: Vec<Regex>,
}

impl Scanner<WaybackCdx, HttpProber> {
    /// Scanner talking to the configured archive with a real HTTP prober
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = WaybackCdx::from_config(config)?;
        let prober = Arc::new(HttpProber::new(config)?);
        Self::new(source, prober, config)
    }
}

impl<S: UrlSource, P: ProbeUrl + ?Sized + 'static> Scanner<S, P> {
    pub fn new(source: S, prober: Arc<P>, config: &Config) -> Result<Self> {
        Ok(Self {
            source,
            prober,
            excluded_extensions: config.excluded_extensions(),
            exclude_patterns: config.compile_exclude_patterns()?,
        })
    }

    /// Execute one run to a terminal state.
    ///
    /// `limit` is the raw text the user entered. Invalid input ends the run
    /// in [`RunStatus::Error`] before any network activity. A stop requested
    /// through `cancellation` ends it in [`RunStatus::Stopped`] once the probes
    /// already in flight have finished.
    pub async fn run(
        &self,
        domain: &str,
        limit: &str,
        threads: usize,
        cancellation: Cancellation,
        events: EventSink,
    ) -> RunSummary {
        let start = Instant::now();

        let request = match RunRequest::new(domain, limit, threads) {
            Ok(request) => request,
            Err(err) => return self.fail(domain.trim(), &err, 0, start, &events),
        };
        let domain = request.domain.as_str();

        events.status(RunStatus::FetchingList);
        events.message(format!("[*] Preparing to fetch URLs for: {domain}"));

        let query = self.source.query_url(domain, request.limit);
        events.message(format!("[*] Contacting: {query}"));
        logging::log_archive_query(domain, &query);

        let raw = match self.source.fetch_urls(domain, request.limit).await {
            Ok(urls) => urls,
            Err(err) => return self.fail(domain, &err, 0, start, &events),
        };
        let fetched = raw.len();
        events.message(format!("[*] Found {fetched} total URLs."));

        let targets = self.prepare_targets(raw);
        let to_check = targets.len();
        events.message(format!(
            "[*] {to_check} URLs remain after filtering. Starting HTTP checks with {} threads...",
            request.threads
        ));

        events.status(RunStatus::Checking);
        events.emit(RunEvent::Progress {
            completed: 0,
            total: to_check,
        });

        let pool = match WorkerPool::new(Arc::clone(&self.prober), request.threads) {
            Ok(pool) => pool,
            Err(err) => return self.fail(domain, &err, fetched, start, &events),
        };
        let pool_report = match pool.run(targets, cancellation, events.clone()).await {
            Ok(report) => report,
            Err(err) => return self.fail(domain, &err, fetched, start, &events),
        };

        let status = if pool_report.cancelled {
            events.message(messages::RUN_STOPPED);
            RunStatus::Stopped
        } else {
            events.message(messages::RUN_COMPLETE);
            RunStatus::Complete
        };
        events.status(status);

        RunSummary {
            domain: domain.to_string(),
            status,
            report: Some(Report::build(pool_report.outcomes)),
            error: None,
            fetched,
            to_check,
            completed: pool_report.completed,
            elapsed: start.elapsed(),
        }
    }

    /// Static assets and user excluded URLs go, the rest gets a scheme.
    fn prepare_targets(&self, raw: Vec<String>) -> Vec<String> {
        let fetched = raw.len();
        let filtered = filter_urls(raw, &self.excluded_extensions);
        let after_extensions = filtered.len();
        let filtered = apply_exclude_patterns(filtered, &self.exclude_patterns);
        logging::log_filtering(fetched, after_extensions, filtered.len());

        filtered.iter().map(|url| normalize_target(url)).collect()
    }

    fn fail(
        &self,
        domain: &str,
        err: &WayprobeError,
        fetched: usize,
        start: Instant,
        events: &EventSink,
    ) -> RunSummary {
        // The explanation travels in the summary, not as an event
        logging::log_error("Run failed", Some(err));
        events.status(RunStatus::Error);
        RunSummary::failed(domain, err, fetched, start)
    }
}
