// src/ui/widgets/notice_popup.rs

use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Renders a message popup on top of the existing UI.
///
/// Used for validation problems and backend failures. The `Clear` widget wipes the
/// popup area first so the content underneath does not bleed through.
pub fn render_notice_popup(frame: &mut Frame, message: &str, area: Rect) {
    let text = Text::from(vec![
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from("Press ".bold() + "Enter".bold().yellow() + " to continue".bold()),
    ]);

    let block = Block::default()
        .title("Notice")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let popup_area = centered_rect(60, 30, area);

    let popup = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

/// Returns a `Rect` centered in `r`, sized as percentages of it.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 30, parent);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.x, 20);
        assert!(popup.y > 0 && popup.bottom() < parent.bottom());
    }
}
