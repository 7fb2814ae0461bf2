// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Defines the areas of the application's user interface.
///
/// Each `Rect` is a widget area on the terminal screen, computed once per frame.
pub struct AppLayout {
    pub input: Rect,
    pub report: Rect,
    pub summary: Rect,
    pub footer: Rect,
    pub log_panel: Rect,
}

/// Creates the complete application layout.
///
/// The frame is split vertically into the submission form, the content area and
/// a one-line footer. The content area holds the report and the posture summary
/// side by side, plus the log panel when `show_logs` is set.
pub fn create_layout(frame_size: Rect, show_logs: bool) -> AppLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame_size);

    let content_constraints = if show_logs {
        vec![Constraint::Percentage(40), Constraint::Percentage(30), Constraint::Percentage(30)]
    } else {
        vec![Constraint::Percentage(60), Constraint::Percentage(40)]
    };

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(content_constraints)
        .split(main_chunks[1]);

    AppLayout {
        input: main_chunks[0],
        report: content_chunks[0],
        summary: content_chunks[1],
        log_panel: if show_logs { content_chunks[2] } else { Rect::default() },
        footer: main_chunks[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_panel_only_when_shown() {
        let area = Rect::new(0, 0, 100, 40);
        let hidden = create_layout(area, false);
        assert_eq!(hidden.log_panel, Rect::default());
        assert_eq!(hidden.input.height, 4);
        assert_eq!(hidden.footer.height, 1);

        let shown = create_layout(area, true);
        assert!(shown.log_panel.width > 0);
        assert!(shown.report.width < hidden.report.width);
    }
}
