// src/core/mod.rs

// Root of the `core` module: everything that does not touch the terminal.

/// Wire and report data structures, such as `ProbeResult`, `Report` and `Status`.
pub mod models;

/// Maps raw statuses onto the pass/warn/fail classes.
pub mod normalizer;

pub mod scorer;

/// Turns probe results into the report shape the renderers read.
pub mod assembler;

pub mod validation;

/// Static labels, fallbacks and guidance for every posture check and finding.
pub mod knowledge_base;

/// Display cards shared by the terminal view and the HTML renderers.
pub mod panel;

pub mod html_report;

/// The backend contract and its HTTP implementation.
pub mod backend;

/// The assessment attempt: quick check or verification plus polling.
pub mod flow;
