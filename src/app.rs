// src/app.rs

use chrono::{DateTime, Local};
use ratatui::widgets::{ListState, ScrollbarState};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::core::backend::{AssessmentBackend, AssessmentStatus};
use crate::core::flow::{spawn_attempt, CheckMode, FlowEvent};
use crate::core::models::{Report, Severity};
use crate::core::normalizer::{normalize, PostureClasses, StatusClass};
use crate::core::validation::validate_submission;
use crate::export::export_report;
use crate::logging::{read_log_tail, LOG_TAIL_LINES};

/// Room for every message one attempt can send before the UI drains them.
const EVENT_CHANNEL_CAPACITY: usize = 16;

pub const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatus {
    Idle,
    Success(String),
    Error(String),
}

/// Where the assessment flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Input,
    VerifyWait,
    Report,
}

#[derive(Debug, Default)]
pub struct ScanSummary {
    pub score: u8,
    pub high_findings: usize,
    pub classes: Option<PostureClasses>,
}

impl ScanSummary {
    pub fn count(&self, class: StatusClass) -> usize {
        self.classes.map(|c| c.count(class)).unwrap_or(0)
    }
}

/// The assessment session: everything the UI and the event handlers share.
pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub consent: bool,
    pub mode: CheckMode,
    /// A request is in flight and no answer has arrived yet.
    pub pending: bool,
    pub assessment_id: Option<String>,
    pub verification_address: Option<String>,
    pub target_domain: Option<String>,
    attempt: Option<JoinHandle<()>>,
    /// Receiving end of the running attempt's channel. Each attempt gets its own.
    events: Option<mpsc::Receiver<FlowEvent>>,
    pub report: Option<Report>,
    pub completion_status: Option<AssessmentStatus>,
    pub summary: ScanSummary,
    pub displayed_score: u8,
    pub spinner_frame: usize,
    pub analysis_list_state: ListState,
    pub notice: Option<String>,
    pub export_status: ExportStatus,
    pub session_log: Vec<String>,
    pub show_logs: bool,
    pub log_content: Vec<String>,
    pub log_horizontal_scroll: usize,
    pub log_horizontal_scroll_state: ScrollbarState,
}

impl App {
    pub fn new(mode: CheckMode) -> Self {
        Self {
            should_quit: false,
            state: AppState::Input,
            input: String::new(),
            consent: false,
            mode,
            pending: false,
            assessment_id: None,
            verification_address: None,
            target_domain: None,
            attempt: None,
            events: None,
            report: None,
            completion_status: None,
            summary: ScanSummary::default(),
            displayed_score: 0,
            spinner_frame: 0,
            analysis_list_state: ListState::default(),
            notice: None,
            export_status: ExportStatus::Idle,
            session_log: Vec::new(),
            show_logs: false,
            log_content: Vec::new(),
            log_horizontal_scroll: 0,
            log_horizontal_scroll_state: ScrollbarState::default(),
        }
    }

    fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.session_log.push(format!("{} {}", Local::now().format("%H:%M:%S"), line));
    }

    /// Validates the form and, when valid, starts an attempt in the background.
    ///
    /// Validation problems become a notice and nothing is sent. Any previous
    /// attempt is aborted first, so at most one poll loop runs per session.
    pub fn submit<B: AssessmentBackend>(&mut self, backend: &B, poll_interval: Duration) -> bool {
        if self.pending {
            return false;
        }
        let submission = match validate_submission(&self.input, self.consent) {
            Ok(submission) => submission,
            Err(e) => {
                info!(error = %e, "Submission rejected by validation.");
                self.notice = Some(e.to_string());
                return false;
            }
        };
        self.cancel_attempt();
        self.session_log.clear();
        self.log(format!("Submitting {} check.", self.mode));
        self.pending = true;
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        self.events = Some(rx);
        self.attempt = Some(spawn_attempt(backend.clone(), submission, self.mode, poll_interval, tx));
        true
    }

    /// Aborts the running attempt and drops its channel, so nothing it already sent is applied.
    fn cancel_attempt(&mut self) {
        self.events = None;
        if let Some(handle) = self.attempt.take() {
            if !handle.is_finished() {
                info!("Aborting running assessment attempt.");
            }
            handle.abort();
        }
    }

    /// True while a background attempt task is alive.
    pub fn attempt_running(&self) -> bool {
        self.attempt.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Applies every message the current attempt has sent so far.
    pub fn poll_events(&mut self) {
        let mut received = Vec::new();
        if let Some(rx) = self.events.as_mut() {
            while let Ok(event) = rx.try_recv() {
                received.push(event);
            }
        }
        for event in received {
            self.apply_event(event);
        }
    }

    /// Applies one message from the assessment task.
    pub fn apply_event(&mut self, event: FlowEvent) {
        match event {
            FlowEvent::AwaitingVerification { assessment_id, verification_address, domain } => {
                self.pending = false;
                self.state = AppState::VerifyWait;
                self.log("Session Initialized.");
                self.log(format!("Target: {}", domain.as_deref().unwrap_or("unknown")));
                self.log(format!("Send an email to {}", verification_address));
                self.log("Waiting for inbound verification email...");
                self.assessment_id = Some(assessment_id);
                self.verification_address = Some(verification_address);
                self.target_domain = domain;
            }
            FlowEvent::Progress(status) => {
                self.log(format!("Status: {:?}", status));
            }
            FlowEvent::Completed { status, report } => {
                self.pending = false;
                self.attempt = None;
                self.log(format!("Assessment finished: {:?}", status));
                self.completion_status = Some(status);
                self.report = report.map(|r| *r);
                self.state = AppState::Report;
                self.update_summary();
            }
            FlowEvent::Failed(error) => {
                warn!(error = %error, "Assessment attempt failed.");
                self.cancel_attempt();
                self.pending = false;
                self.assessment_id = None;
                self.verification_address = None;
                self.log(format!("Stopped: {}", error));
                self.notice = Some(error.to_string());
                self.state = AppState::Input;
            }
        }
    }

    pub fn update_summary(&mut self) {
        self.displayed_score = 0;
        self.analysis_list_state = ListState::default();
        self.summary = match &self.report {
            Some(report) => {
                if !report.risk_breakdown.is_empty() {
                    self.analysis_list_state.select(Some(0));
                }
                ScanSummary {
                    score: report.risk_score.min(100),
                    high_findings: report
                        .risk_breakdown
                        .iter()
                        .filter(|f| f.severity == Severity::High)
                        .count(),
                    classes: Some(normalize(report)),
                }
            }
            None => ScanSummary::default(),
        };
    }

    pub fn export(&mut self, dir: &Path, now: DateTime<Local>) {
        let Some(report) = &self.report else {
            self.export_status = ExportStatus::Error("No report to export.".to_string());
            return;
        };
        self.export_status = match export_report(report, dir, now) {
            Ok(path) => ExportStatus::Success(path.display().to_string()),
            Err(e) => {
                warn!(error = %e, "Export failed.");
                ExportStatus::Error(e.to_string())
            }
        };
    }

    pub fn select_previous(&mut self) {
        let selected = self.analysis_list_state.selected().unwrap_or(0);
        self.analysis_list_state.select(Some(selected.saturating_sub(1)));
    }

    pub fn select_next(&mut self) {
        let len = self.report.as_ref().map(|r| r.risk_breakdown.len()).unwrap_or(0);
        if len == 0 {
            return;
        }
        let selected = self.analysis_list_state.selected().map(|i| i + 1).unwrap_or(0);
        self.analysis_list_state.select(Some(selected.min(len - 1)));
    }

    pub fn scroll_logs_left(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_sub(4);
        self.log_horizontal_scroll_state =
            self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    pub fn scroll_logs_right(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_add(4);
        self.log_horizontal_scroll_state =
            self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        if self.show_logs {
            self.log_content = read_log_tail(LOG_TAIL_LINES);
        }
    }

    pub fn on_tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        if self.displayed_score < self.summary.score {
            self.displayed_score = (self.displayed_score + 2).min(self.summary.score);
        }
        if self.show_logs {
            self.log_content = read_log_tail(LOG_TAIL_LINES);
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn quit(&mut self) {
        self.cancel_attempt();
        self.should_quit = true;
    }

    /// Starts over: stops any polling and clears every per-assessment field.
    pub fn reset(&mut self) {
        self.cancel_attempt();
        let mode = self.mode;
        let show_logs = self.show_logs;
        *self = App::new(mode);
        self.show_logs = show_logs;
    }
}
