// src/core/flow.rs

//! Drives one assessment attempt against the backend and reports progress to
//! the UI over a channel. A single spawned task covers the whole attempt,
//! including the poll loop, so aborting its handle is enough to stop polling.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::core::assembler::assemble;
use crate::core::backend::{
    AssessmentBackend, AssessmentError, AssessmentStatus, CheckRequest,
};
use crate::core::models::Report;
use crate::core::validation::Submission;

/// Which backend path an attempt takes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CheckMode {
    /// `POST /api/smtp/check`, straight to the report.
    Quick,
    /// `POST /api/assessment`, then wait for the verification email.
    #[default]
    Verified,
}

impl CheckMode {
    pub fn toggle(self) -> Self {
        match self {
            CheckMode::Quick => CheckMode::Verified,
            CheckMode::Verified => CheckMode::Quick,
        }
    }
}

/// Messages sent from the assessment task to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// The backend accepted the assessment and waits for an inbound email.
    AwaitingVerification {
        assessment_id: String,
        verification_address: String,
        domain: Option<String>,
    },
    /// A non-terminal status seen while polling, sent once per change.
    Progress(AssessmentStatus),
    /// Terminal success. The report is absent when the backend has not attached one yet.
    Completed {
        status: AssessmentStatus,
        report: Option<Box<Report>>,
    },
    Failed(AssessmentError),
}

/// How a poll loop ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed(AssessmentStatus),
    Failed(AssessmentError),
    /// The receiving side went away.
    Abandoned,
}

/// Runs the synchronous check and assembles the report from the probe results.
pub async fn run_quick_check<B: AssessmentBackend>(
    backend: &B,
    submission: &Submission,
) -> Result<Report, AssessmentError> {
    let request = CheckRequest { email: submission.email.clone(), consent: submission.consent };
    let response = backend.check_smtp(&request).await?;
    let probe = response.results.unwrap_or_default();
    Ok(assemble(&probe))
}

/// Polls the assessment every `period` until a terminal status or the first error.
///
/// The first poll happens one period after the call. Errors are never retried.
pub async fn poll_assessment<B: AssessmentBackend>(
    backend: &B,
    assessment_id: &str,
    period: Duration,
    tx: &mpsc::Sender<FlowEvent>,
) -> PollOutcome {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_status: Option<AssessmentStatus> = None;

    loop {
        ticker.tick().await;
        let (event, outcome) = match backend.assessment_state(assessment_id).await {
            Ok(state) if state.status == AssessmentStatus::Timeout => {
                info!(assessment_id, "Assessment timed out.");
                (
                    FlowEvent::Failed(AssessmentError::TimedOut),
                    PollOutcome::Failed(AssessmentError::TimedOut),
                )
            }
            Ok(state) if state.status.is_terminal() => {
                info!(assessment_id, status = ?state.status, "Assessment reached a terminal status.");
                let status = state.status.clone();
                (
                    FlowEvent::Completed { status: state.status, report: state.report.map(Box::new) },
                    PollOutcome::Completed(status),
                )
            }
            Ok(state) => {
                if last_status.as_ref() != Some(&state.status) {
                    debug!(assessment_id, status = ?state.status, "Assessment still pending.");
                    last_status = Some(state.status.clone());
                    if tx.send(FlowEvent::Progress(state.status)).await.is_err() {
                        return PollOutcome::Abandoned;
                    }
                }
                continue;
            }
            Err(e) => {
                warn!(assessment_id, error = %e, "Polling stopped.");
                (FlowEvent::Failed(e.clone()), PollOutcome::Failed(e))
            }
        };
        if tx.send(event).await.is_err() {
            return PollOutcome::Abandoned;
        }
        return outcome;
    }
}

async fn run_attempt<B: AssessmentBackend>(
    backend: B,
    submission: Submission,
    mode: CheckMode,
    period: Duration,
    tx: mpsc::Sender<FlowEvent>,
) {
    match mode {
        CheckMode::Quick => {
            let event = match run_quick_check(&backend, &submission).await {
                Ok(report) => FlowEvent::Completed {
                    status: AssessmentStatus::Completed,
                    report: Some(Box::new(report)),
                },
                Err(e) => FlowEvent::Failed(e),
            };
            let _ = tx.send(event).await;
        }
        CheckMode::Verified => {
            let request =
                CheckRequest { email: submission.email.clone(), consent: submission.consent };
            let started = match backend.start_assessment(&request).await {
                Ok(started) => started,
                Err(e) => {
                    let _ = tx.send(FlowEvent::Failed(e)).await;
                    return;
                }
            };
            let Some(assessment_id) = started.assessment_id.filter(|id| !id.is_empty()) else {
                let error = AssessmentError::Rejected("Backend returned no assessment id".to_string());
                let _ = tx.send(FlowEvent::Failed(error)).await;
                return;
            };
            let event = FlowEvent::AwaitingVerification {
                assessment_id: assessment_id.clone(),
                verification_address: started.verification_address.unwrap_or_default(),
                domain: started.domain,
            };
            if tx.send(event).await.is_err() {
                return;
            }
            poll_assessment(&backend, &assessment_id, period, &tx).await;
        }
    }
}

/// Spawns the task that carries one attempt from submission to a terminal event.
pub fn spawn_attempt<B: AssessmentBackend>(
    backend: B,
    submission: Submission,
    mode: CheckMode,
    period: Duration,
    tx: mpsc::Sender<FlowEvent>,
) -> JoinHandle<()> {
    info!(%mode, "Starting assessment attempt.");
    tokio::spawn(run_attempt(backend, submission, mode, period, tx))
}
