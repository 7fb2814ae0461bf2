// src/ui/widgets/footer.rs

use crate::app::{App, AppState, ExportStatus};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

fn key(label: &str) -> Span<'_> {
    Span::styled(label, Style::new().bold().fg(Color::Yellow))
}

/// Renders the footer widget, which displays the actions of the current state.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let spans = if app.notice.is_some() {
        Line::from(vec![key("Enter"), Span::raw(" to dismiss.")])
    } else {
        match app.state {
            AppState::Input if app.pending => Line::from("Checking... Press Esc to quit."),
            AppState::Input => Line::from(vec![
                key("Enter"),
                Span::raw(" submit, "),
                key("Tab"),
                Span::raw(" consent, "),
                key("F2"),
                Span::raw(" mode, "),
                key("Esc"),
                Span::raw(" quit."),
            ]),
            AppState::VerifyWait => Line::from(vec![
                key("[N]"),
                Span::raw("ew assessment, "),
                key("[L]"),
                Span::raw("ogs, "),
                key("[Q]"),
                Span::raw("uit"),
            ]),
            AppState::Report => {
                let mut spans = vec![
                    key("[N]"),
                    Span::raw("ew assessment, "),
                    key("[E]"),
                    Span::raw("xport, "),
                    key("[L]"),
                    Span::raw("ogs, "),
                    key("[Q]"),
                    Span::raw("uit"),
                ];
                match &app.export_status {
                    ExportStatus::Idle => {}
                    ExportStatus::Success(path) => {
                        spans.push(Span::styled(format!("  Saved {}", path), Style::new().fg(Color::Green)));
                    }
                    ExportStatus::Error(e) => {
                        spans.push(Span::styled(format!("  Export failed: {}", e), Style::new().fg(Color::Red)));
                    }
                }
                Line::from(spans)
            }
        }
    };

    let footer = Paragraph::new(spans).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
