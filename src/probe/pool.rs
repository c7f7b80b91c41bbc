use futures::future::join_all;
use log::debug;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::core::constants::defaults;
use crate::core::error::{Result, WayprobeError};
use crate::core::types::{EventSink, ProbeOutcome};
use crate::probe::aggregator::{CompletionGuard, ResultAggregator};
use crate::probe::cancel::Cancellation;
use crate::probe::prober::{ProbeUrl, ProbeVerdict};
use crate::reporting::logging;

/// FIFO of targets shared by the workers of one run.
#[derive(Debug, Default)]
pub struct WorkQueue {
    inner: Mutex<QueueState>,
}

#[derive(Debug, Default)]
struct QueueState {
    targets: VecDeque<String>,
    dequeued: usize,
}

impl WorkQueue {
    pub fn new(targets: Vec<String>) -> Self {
        Self {
            inner: Mutex::new(QueueState {
                targets: targets.into(),
                dequeued: 0,
            }),
        }
    }

    /// Take the next target; each target is handed out exactly once.
    pub fn pop(&self) -> Option<String> {
        let mut state = self.lock();
        let target = state.targets.pop_front()?;
        state.dequeued += 1;
        Some(target)
    }

    pub fn len(&self) -> usize {
        self.lock().targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of targets handed out so far
    pub fn dequeued(&self) -> usize {
        self.lock().dequeued
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Everything the workers of one run share. Created fresh for every run.
#[derive(Debug)]
pub struct RunState {
    pub queue: WorkQueue,
    pub results: ResultAggregator,
    pub cancellation: Cancellation,
}

impl RunState {
    pub fn new(targets: Vec<String>, cancellation: Cancellation, events: EventSink) -> Self {
        let total = targets.len();
        Self {
            queue: WorkQueue::new(targets),
            results: ResultAggregator::new(total, events),
            cancellation,
        }
    }
}

/// What the pool hands back once every worker has exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolReport {
    /// Recorded outcomes in completion order
    pub outcomes: Vec<ProbeOutcome>,
    /// Probes finished, recorded or discarded
    pub completed: usize,
    /// Targets the run started with
    pub total: usize,
    /// Targets taken off the queue
    pub dequeued: usize,
    pub cancelled: bool,
}

/// Fixed-size set of workers draining a [`WorkQueue`].
pub struct WorkerPool<P: ProbeUrl + ?Sized> {
    prober: Arc<P>,
    workers: usize,
}

impl<P: ProbeUrl + ?Sized + 'static> WorkerPool<P> {
    /// A pool of `workers` concurrent probes, between
    /// [`defaults::MIN_THREADS`] and [`defaults::MAX_THREADS`].
    pub fn new(prober: Arc<P>, workers: usize) -> Result<Self> {
        if !(defaults::MIN_THREADS..=defaults::MAX_THREADS).contains(&workers) {
            return Err(WayprobeError::Validation(format!(
                "Worker count {workers} is out of range. Expected a value between {}-{}.",
                defaults::MIN_THREADS,
                defaults::MAX_THREADS
            )));
        }
        Ok(Self { prober, workers })
    }

    /// Probe every target, or as many as get taken before a stop request.
    ///
    /// Returns only after every worker has exited.
    pub async fn run(
        &self,
        targets: Vec<String>,
        cancellation: Cancellation,
        events: EventSink,
    ) -> Result<PoolReport> {
        let start = Instant::now();
        let state = Arc::new(RunState::new(targets, cancellation, events));
        let total = state.results.total();
        logging::log_checks_start(total, self.workers);

        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                let prober = Arc::clone(&self.prober);
                let state = Arc::clone(&state);
                tokio::spawn(worker(id, prober, state))
            })
            .collect();

        let mut failures = Vec::new();
        for (id, joined) in join_all(handles).await.into_iter().enumerate() {
            if let Err(err) = joined {
                failures.push(format!("worker {id}: {err}"));
            }
        }
        if !failures.is_empty() {
            return Err(WayprobeError::Worker(failures.join("; ")));
        }

        let outcomes = state.results.take_outcomes();
        let completed = state.results.completed();
        logging::log_checks_complete(
            completed,
            total,
            outcomes.len(),
            start.elapsed().as_millis(),
        );

        Ok(PoolReport {
            outcomes,
            completed,
            total,
            dequeued: state.queue.dequeued(),
            cancelled: state.cancellation.is_cancelled(),
        })
    }
}

async fn worker<P: ProbeUrl + ?Sized>(id: usize, prober: Arc<P>, state: Arc<RunState>) {
    loop {
        if state.cancellation.is_cancelled() {
            debug!("worker {id}: stop requested, exiting");
            break;
        }
        let Some(target) = state.queue.pop() else {
            break;
        };

        let mut completion = CompletionGuard::new(&state.results);
        let outcome = match prober.probe(&target).await {
            ProbeVerdict::Recorded(outcome) => {
                logging::log_probe_result(
                    &outcome.url,
                    Some(outcome.status_code),
                    outcome.error_detail.as_deref(),
                );
                Some(outcome)
            }
            ProbeVerdict::Discarded { status } => {
                logging::log_probe_result(&target, Some(i32::from(status)), Some("discarded"));
                None
            }
        };
        completion.set_outcome(outcome);
    }
}
