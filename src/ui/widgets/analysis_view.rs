// src/ui/widgets/analysis_view.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use crate::core::flow::CheckMode;
use crate::core::knowledge_base;
use crate::core::models::Severity;
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::High => Style::default().fg(Color::Red),
        Severity::Medium => Style::default().fg(Color::Yellow),
        Severity::Low => Style::default().fg(Color::Green),
        Severity::Unknown => Style::default().fg(Color::Cyan),
    }
}

pub fn render_analysis_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Risk Assessment (Navigate with ↑ ↓)");

    match app.state {
        AppState::Input => {
            let content = if app.pending {
                let action = match app.mode {
                    CheckMode::Quick => "Running quick check... Please wait.",
                    CheckMode::Verified => "Starting verified assessment... Please wait.",
                };
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{} ", SPINNER_CHARS[app.spinner_frame]), Style::default().fg(Color::Cyan)),
                    Span::raw(action),
                ]))
            } else {
                Paragraph::new("Enter a corporate email, confirm authorization and press Enter.")
            };
            frame.render_widget(content.alignment(Alignment::Center).block(main_block), area);
        }
        AppState::VerifyWait => render_verify_wait(frame, app, main_block, area),
        AppState::Report if app.report.is_none() => {
            let status = app
                .completion_status
                .as_ref()
                .map(|s| format!("{:?}", s))
                .unwrap_or_else(|| "Completed".to_string());
            let text = Text::from(vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("Assessment finished with status: {}", status),
                    Style::default().bold(),
                )),
                Line::from(""),
                Line::from("The backend has not attached a report to this assessment yet."),
                Line::from("Press N to start a new assessment."),
            ]);
            let p = Paragraph::new(text).alignment(Alignment::Center).wrap(Wrap { trim: true });
            frame.render_widget(p.block(main_block), area);
        }
        AppState::Report => render_findings(frame, app, main_block, area),
    }
}

fn render_verify_wait(frame: &mut Frame, app: &App, block: Block, area: Rect) {
    let address = app.verification_address.as_deref().unwrap_or("");
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", SPINNER_CHARS[app.spinner_frame]), Style::default().fg(Color::Cyan)),
            Span::raw("Waiting for your verification email."),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::raw("Send an email from "),
            Span::styled(app.input.as_str(), Style::default().fg(Color::Yellow)),
            Span::raw(" to:"),
        ]),
        Line::from(Span::styled(address, Style::default().fg(Color::Cyan).bold())),
        Line::from(""),
    ];
    lines.extend(
        app.session_log
            .iter()
            .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(Color::DarkGray)))),
    );
    let p = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(p, area);
}

fn render_findings(frame: &mut Frame, app: &mut App, block: Block, area: Rect) {
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Min(0)])
        .split(inner_area);

    let findings = app.report.as_ref().map(|r| r.risk_breakdown.as_slice()).unwrap_or(&[]);

    let items: Vec<ListItem> = findings
        .iter()
        .map(|f| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>4} ", format!("{:+}", f.score)), severity_style(f.severity)),
                Span::styled(format!("[{}] ", f.severity), Style::default().fg(Color::DarkGray)),
                Span::raw(f.item.clone()),
            ]))
        })
        .collect();

    let findings_list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let selected = app
        .analysis_list_state
        .selected()
        .and_then(|i| findings.get(i))
        .map(|f| f.item.clone());

    frame.render_stateful_widget(findings_list, chunks[0], &mut app.analysis_list_state);

    let detail_block = Block::default().borders(Borders::TOP).title("Details");
    let text = match selected.as_deref().and_then(knowledge_base::get_finding_detail) {
        Some(detail) => Text::from(vec![
            Line::from(""),
            Line::from("WHAT IT IS:".yellow().bold()),
            Line::from(detail.description),
            Line::from(""),
            Line::from("HOW TO FIX:".yellow().bold()),
            Line::from(detail.remediation),
        ]),
        None if findings.is_empty() => Text::from("No risk findings were reported."),
        None => Text::from("Select an item above to see details."),
    };
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }).block(detail_block), chunks[1]);
}
