// src/core/backend/mod.rs

// Wire contract of the assessment backend and the trait the flow talks to.
pub mod http_backend;

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

use crate::core::models::{ProbeResult, Report};
use crate::core::validation::ValidationError;

pub use self::http_backend::HttpBackend;

/// Everything that can end an assessment attempt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Backend unreachable. Check your network or try again. ({0})")]
    Unreachable(String),
    #[error("Invalid backend response (non-JSON). Status: {status}")]
    InvalidJson { status: u16 },
    #[error("Check failed: HTTP {status}")]
    Http { status: u16 },
    #[error("Error: {0}")]
    Rejected(String),
    #[error("Verification timed out. Start a new assessment.")]
    TimedOut,
}

/// Body of both POST endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRequest {
    pub email: String,
    pub consent: bool,
}

/// `POST /api/smtp/check`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SmtpCheckResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub results: Option<ProbeResult>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /api/assessment`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssessmentStarted {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub assessment_id: Option<String>,
    #[serde(default)]
    pub verification_address: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Lifecycle of an asynchronous assessment as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    WaitingEmail,
    Verified,
    Probing,
    ReportReady,
    Completed,
    Timeout,
    /// Unknown words, and error bodies that carry no status at all.
    #[default]
    #[serde(other)]
    Other,
}

impl AssessmentStatus {
    /// Polling stops once the backend reports one of these.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AssessmentStatus::WaitingEmail | AssessmentStatus::Other)
    }
}

/// `GET /api/assessment/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssessmentState {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub status: AssessmentStatus,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub report: Option<Report>,
    #[serde(default)]
    pub error: Option<String>,
}

/// The three backend calls the assessment flow needs.
pub trait AssessmentBackend: Clone + Send + Sync + 'static {
    fn check_smtp(
        &self,
        request: &CheckRequest,
    ) -> impl Future<Output = Result<SmtpCheckResponse, AssessmentError>> + Send;

    fn start_assessment(
        &self,
        request: &CheckRequest,
    ) -> impl Future<Output = Result<AssessmentStarted, AssessmentError>> + Send;

    fn assessment_state(
        &self,
        assessment_id: &str,
    ) -> impl Future<Output = Result<AssessmentState, AssessmentError>> + Send;
}
