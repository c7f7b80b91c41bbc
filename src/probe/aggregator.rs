use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::types::{EventSink, ProbeOutcome, RunEvent};

#[derive(Debug, Default)]
struct Tally {
    outcomes: Vec<ProbeOutcome>,
    completed: usize,
}

/// Collects outcomes from every worker of one run.
///
/// The outcome list and the completed counter share one lock, and the
/// progress event is emitted while it is held, so observers only ever see
/// monotonically increasing counts that agree with the list.
#[derive(Debug)]
pub struct ResultAggregator {
    tally: Mutex<Tally>,
    total: usize,
    events: EventSink,
}

impl ResultAggregator {
    pub fn new(total: usize, events: EventSink) -> Self {
        Self {
            tally: Mutex::new(Tally::default()),
            total,
            events,
        }
    }

    /// Account for one finished probe, recording its outcome if it has one.
    ///
    /// Returns the completed count after this call.
    pub fn record(&self, outcome: Option<ProbeOutcome>) -> usize {
        let mut tally = self.lock();
        if let Some(outcome) = outcome {
            tally.outcomes.push(outcome);
        }
        tally.completed += 1;
        debug_assert!(tally.completed <= self.total);

        self.events.emit(RunEvent::Progress {
            completed: tally.completed,
            total: self.total,
        });
        tally.completed
    }

    pub fn completed(&self) -> usize {
        self.lock().completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Move the recorded outcomes out, in recording order.
    pub fn take_outcomes(&self) -> Vec<ProbeOutcome> {
        mem::take(&mut self.lock().outcomes)
    }

    // A worker that panicked mid-record leaves the tally consistent: both
    // fields are updated before anything can unwind.
    fn lock(&self) -> MutexGuard<'_, Tally> {
        self.tally.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Records the current probe when dropped, whatever way the probe ended.
pub(crate) struct CompletionGuard<'a> {
    aggregator: &'a ResultAggregator,
    outcome: Option<ProbeOutcome>,
}

impl<'a> CompletionGuard<'a> {
    pub(crate) fn new(aggregator: &'a ResultAggregator) -> Self {
        Self {
            aggregator,
            outcome: None,
        }
    }

    pub(crate) fn set_outcome(&mut self, outcome: Option<ProbeOutcome>) {
        self.outcome = outcome;
    }
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.aggregator.record(self.outcome.take());
    }
}
