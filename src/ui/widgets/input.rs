// src/ui/widgets/input.rs
use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Renders the submission form: email, consent and check mode.
pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let input_block = Block::default().borders(Borders::ALL).title("Corporate Email");

    let (consent_mark, consent_style) = if app.consent {
        ("[x]", Style::default().fg(Color::Green))
    } else {
        ("[ ]", Style::default().fg(Color::Red))
    };
    let text = Text::from(vec![
        Line::from(Span::styled(app.input.as_str(), Style::default().fg(Color::Yellow))),
        Line::from(vec![
            Span::styled(consent_mark, consent_style),
            Span::raw(" I am authorized to assess this domain   "),
            Span::styled("Mode: ", Style::default().fg(Color::DarkGray)),
            Span::styled(app.mode.to_string(), Style::default().fg(Color::Cyan).bold()),
        ]),
    ]);
    frame.render_widget(Paragraph::new(text).block(input_block), area);

    if app.state == AppState::Input && !app.pending && app.notice.is_none() {
        frame.set_cursor_position(Position::new(
            area.x + app.input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}
