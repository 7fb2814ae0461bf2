// src/ui/widgets/log_view.rs

use crate::app::App;
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation},
};

/// Styles one log file line. Lines start with `DATE TIME`; the stamp is dimmed.
fn style_log_line(line: &str) -> Line<'_> {
    let mut parts = line.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(date), Some(time), Some(rest)) => Line::from(vec![
            Span::styled(format!("{} {}", date, time), Style::default().fg(Color::DarkGray)),
            Span::raw(format!(" {}", rest)),
        ]),
        _ => Line::from(line),
    }
}

/// Renders the tail of the application log with a horizontal scrollbar for long lines.
pub fn render_log_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title("Logs (scroll with ← →)")
        .borders(Borders::ALL);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let max_width = app.log_content.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    app.log_horizontal_scroll_state = app.log_horizontal_scroll_state.content_length(max_width);

    // Keep the newest lines visible.
    let visible = inner_area.height.saturating_sub(1) as usize;
    let start = app.log_content.len().saturating_sub(visible);
    let log_lines: Vec<Line> = app.log_content[start..].iter().map(|l| style_log_line(l)).collect();

    let log_paragraph = Paragraph::new(log_lines).scroll((0, app.log_horizontal_scroll as u16));
    frame.render_widget(log_paragraph, inner_area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::HorizontalBottom).thumb_symbol("■");
    let scrollbar_area = Rect {
        x: inner_area.x,
        y: inner_area.y + inner_area.height.saturating_sub(1),
        width: inner_area.width,
        height: 1,
    };
    frame.render_stateful_widget(scrollbar, scrollbar_area, &mut app.log_horizontal_scroll_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_is_split_off() {
        let line = style_log_line("2026-01-02 10:11:12  INFO Assessment started.");
        assert_eq!(line.spans[0].content, "2026-01-02 10:11:12");
        assert_eq!(line.spans[1].content, "  INFO Assessment started.");
    }

    #[test]
    fn test_short_line_is_kept_as_is() {
        let line = style_log_line("panic");
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content, "panic");
    }
}
