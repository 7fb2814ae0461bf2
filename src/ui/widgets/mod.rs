// src/ui/widgets/mod.rs

// Every widget of the terminal UI.
pub mod analysis_view; // Findings list, verification wait and placeholders.
pub mod footer;
pub mod input;
pub mod log_view;
pub mod notice_popup; // Modal for validation and backend messages.
pub mod summary;
