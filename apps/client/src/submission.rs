//! Submission flow: Idle → Submitting → {Synced | LocalFallback}.
//!
//! Submissions are not de-duplicated. Each one overwrites the single
//! current-summary slot when it completes, so the last completion wins even
//! if it was started first. The flow reads as `Submitting` until every
//! pending submission has completed or been dropped.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::info;

use crate::models::assessment::AssessmentInput;
use crate::models::summary::ScoreSummary;
use crate::scoring::{EvaluationOutcome, ReadinessScorer};
use crate::session::ActiveSession;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Synced,
    LocalFallback,
}

impl SubmissionState {
    fn after(outcome: &EvaluationOutcome) -> Self {
        match outcome {
            EvaluationOutcome::Remote(_) => SubmissionState::Synced,
            EvaluationOutcome::Local { .. } => SubmissionState::LocalFallback,
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    summary: ScoreSummary,
    advisory: Option<&'static str>,
    last_ticket: Option<u64>,
    settled: SubmissionState,
}

/// Counts a submission as in flight until it completes or its future is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Result of one submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: u64,
    pub state: SubmissionState,
    pub outcome: EvaluationOutcome,
}

pub struct SubmissionFlow {
    scorer: ReadinessScorer,
    in_flight: AtomicUsize,
    slot: Mutex<Slot>,
    next_ticket: AtomicU64,
}

impl SubmissionFlow {
    pub fn new(scorer: ReadinessScorer) -> Self {
        Self {
            scorer,
            in_flight: AtomicUsize::new(0),
            slot: Mutex::new(Slot::default()),
            next_ticket: AtomicU64::new(1),
        }
    }

    /// `Submitting` while any submission is in flight, otherwise the state
    /// left by the last one to complete (`Idle` before the first).
    pub fn state(&self) -> SubmissionState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            return SubmissionState::Submitting;
        }
        lock(&self.slot).settled
    }

    /// The summary on display. Empty until the first submission completes.
    pub fn current_summary(&self) -> ScoreSummary {
        lock(&self.slot).summary.clone()
    }

    pub fn advisory(&self) -> Option<&'static str> {
        lock(&self.slot).advisory
    }

    /// Ticket of the submission whose result is currently displayed.
    pub fn displayed_ticket(&self) -> Option<u64> {
        lock(&self.slot).last_ticket
    }

    pub async fn submit(
        &self,
        input: &AssessmentInput,
        session: Option<&ActiveSession>,
    ) -> Submission {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst);
        let in_flight = InFlight::enter(&self.in_flight);

        let outcome = self.scorer.evaluate(input, session).await;
        let state = SubmissionState::after(&outcome);

        {
            let mut slot = lock(&self.slot);
            slot.summary = outcome.summary().clone();
            slot.advisory = Some(outcome.advisory());
            slot.last_ticket = Some(ticket);
            slot.settled = state;
        }
        drop(in_flight);

        info!(
            ticket,
            ?state,
            total_score = outcome.summary().total_score,
            "Submission complete"
        );

        Submission {
            ticket,
            state,
            outcome,
        }
    }
}

// A poisoned lock only means another submission panicked mid-write; the
// slot is still a whole summary, so keep using it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
