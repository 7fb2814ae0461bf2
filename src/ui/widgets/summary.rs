// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use crate::core::knowledge_base::CheckSection;
use crate::core::normalizer::StatusClass;
use crate::core::panel::{build_cards, PanelCard};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

fn class_mark(class: Option<StatusClass>) -> (&'static str, Style) {
    match class {
        Some(StatusClass::Pass) => ("✓", Style::default().fg(Color::Green)),
        Some(StatusClass::Warn) => ("!", Style::default().fg(Color::Yellow)),
        Some(StatusClass::Fail) => ("✗", Style::default().fg(Color::Red)),
        None => ("•", Style::default().fg(Color::Cyan)),
    }
}

fn card_lines(card: &PanelCard) -> Vec<Line<'static>> {
    let (icon, style) = class_mark(card.class);
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{} ", icon), style),
        Span::raw(format!("{}: ", card.label)),
        Span::styled(card.value.clone(), style.bold()),
    ])];
    if let Some(gap) = card.gap_warning {
        lines.push(Line::from(Span::styled(
            format!("    ⚠ {}", gap),
            Style::default().fg(Color::Yellow).italic(),
        )));
    }
    lines
}

/// Renders the posture summary: score, gauge and one line per posture card.
///
/// Nothing but the frame is drawn until a report is available.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.report.as_ref().and_then(|r| r.domain.as_deref()) {
        Some(domain) => format!("Posture: {}", domain),
        None => "Posture".to_string(),
    };
    let summary_container = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Score & rating
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Spacer
            Constraint::Length(2), // Class counts
            Constraint::Min(0),    // Cards
        ])
        .split(area);

    let Some(report) = app.report.as_ref().filter(|_| app.state == AppState::Report) else {
        return;
    };

    // Higher is safer.
    let (rating_text, rating_style) = match app.summary.score {
        90..=100 => ("Hardened", Style::default().fg(Color::Green)),
        70..=89 => ("Good", Style::default().fg(Color::Cyan)),
        50..=69 => ("Needs Improvement", Style::default().fg(Color::Yellow)),
        _ => ("Exposed", Style::default().fg(Color::Red)),
    };
    let score_line =
        Line::from(format!("{}/100 ({})", app.summary.score, rating_text)).style(rating_style);
    let score_text = Text::from(vec![Line::from("Risk Score".bold()), score_line]);
    frame.render_widget(Paragraph::new(score_text).alignment(Alignment::Center), summary_chunks[0]);

    let score_gauge = Gauge::default()
        .percent(app.displayed_score as u16)
        .label("")
        .style(Style::default().fg(if app.displayed_score >= 80 {
            Color::Green
        } else if app.displayed_score >= 50 {
            Color::Yellow
        } else {
            Color::Red
        }));
    frame.render_widget(score_gauge, summary_chunks[1]);

    let counts = Text::from(vec![Line::from(vec![
        Span::styled(format!("Pass {}  ", app.summary.count(StatusClass::Pass)), Style::default().fg(Color::Green)),
        Span::styled(format!("Warn {}  ", app.summary.count(StatusClass::Warn)), Style::default().fg(Color::Yellow)),
        Span::styled(format!("Fail {}", app.summary.count(StatusClass::Fail)), Style::default().fg(Color::Red)),
    ])]);
    frame.render_widget(Paragraph::new(counts).alignment(Alignment::Center), summary_chunks[3]);

    let cards = build_cards(report);
    let mut lines = Vec::new();
    for section in [CheckSection::Authentication, CheckSection::Advanced] {
        lines.push(Line::from(Span::styled(
            section.to_string().to_uppercase(),
            Style::default().bold(),
        )));
        for card in cards.iter().filter(|c| c.section == section) {
            lines.extend(card_lines(card));
        }
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), summary_chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::PostureCheck;

    #[test]
    fn test_card_lines_include_gap_warning() {
        let card = PanelCard {
            check: PostureCheck::MtaSts,
            label: "MTA-STS",
            section: CheckSection::Advanced,
            value: "MISSING".to_string(),
            class: Some(StatusClass::Fail),
            gap_warning: Some("Policy Handshake Integrity Failed"),
        };
        let lines = card_lines(&card);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "✗ ");
        assert!(lines[1].spans[0].content.contains("Policy Handshake Integrity Failed"));
    }

    #[test]
    fn test_informational_card_has_neutral_mark() {
        assert_eq!(class_mark(None).0, "•");
        assert_eq!(class_mark(Some(StatusClass::Warn)).0, "!");
    }
}
