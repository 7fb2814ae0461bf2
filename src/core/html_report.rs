// src/core/html_report.rs

//! HTML renderers for a `Report`: the inline panel fragment and the standalone
//! downloadable document that embeds it. Every value coming from the report is
//! escaped, since domain names and statuses come from the network.

use chrono::{DateTime, Local};
use std::fmt::Write;

use crate::core::knowledge_base::CheckSection;
use crate::core::models::Report;
use crate::core::panel::{build_cards, PanelCard};

const DOCUMENT_STYLE: &str = r#"
        :root { --green: #00ff41; --fail: #ff0055; --warn: #ffaa00; --bg: #0a0a0a; --card: #111; --border: #333; --text: #e0e0e0; }
        body { background: var(--bg); color: var(--text); font-family: 'Courier New', Courier, monospace; padding: 40px; max-width: 800px; margin: 0 auto; line-height: 1.6; }
        .header { border-bottom: 2px solid var(--green); padding-bottom: 20px; margin-bottom: 30px; }
        .header h1 { color: var(--green); margin: 0; letter-spacing: 2px; }
        .section-title { color: var(--green); margin: 30px 0 15px; font-size: 1.1rem; border-left: 4px solid var(--green); padding-left: 15px; text-transform: uppercase; }
        .grid { display: grid; grid-template-columns: 1fr 1fr; gap: 15px; }
        .card { background: var(--card); border: 1px solid var(--border); padding: 15px; }
        .label { color: #666; font-size: 0.75rem; text-transform: uppercase; margin-bottom: 5px; }
        .value { font-size: 1.1rem; font-weight: bold; }
        .value.pass { color: var(--green); }
        .value.warn { color: var(--warn); }
        .value.fail { color: var(--fail); }
        .gap-warning { color: var(--warn); font-size: 0.8rem; margin-top: 6px; }
        .risk-item { display: flex; justify-content: space-between; padding: 12px; background: rgba(255,255,255,0.03); border: 1px solid var(--border); border-left: 5px solid #444; margin-bottom: 8px; }
        .risk-item.high { border-left-color: #ff0055; }
        .risk-item.medium { border-left-color: #ffaa00; }
        .footer { margin-top: 50px; text-align: center; color: #444; font-size: 0.8rem; border-top: 1px solid #222; padding-top: 20px; }
        @media print { body { background: #fff !important; color: #000 !important; } .card, .risk-item { border: 1px solid #ddd !important; } }
"#;

/// Escapes text for use in HTML element content and quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_cards(html: &mut String, cards: &[PanelCard], section: CheckSection) {
    let _ = writeln!(html, r#"<div class="section-title">&gt; {}</div>"#, section);
    html.push_str("<div class=\"grid\">\n");
    for card in cards.iter().filter(|c| c.section == section) {
        let class = card.class.map(|c| format!(" {}", c)).unwrap_or_default();
        let _ = write!(
            html,
            r#"<div class="card"><div class="label">{}</div><div class="value{}">{}</div>"#,
            escape_html(card.label),
            class,
            escape_html(&card.value),
        );
        if let Some(warning) = card.gap_warning {
            let _ = write!(html, r#"<div class="gap-warning">&#9888; {}</div>"#, escape_html(warning));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");
}

/// Renders the inline summary panel as an HTML fragment.
pub fn render_panel(report: &Report) -> String {
    let mut html = String::new();

    let _ = writeln!(
        html,
        r#"<div class="section-title">&gt; Executive Risk Profile (Score: {}/100)</div>"#,
        report.risk_score
    );
    html.push_str("<div class=\"risk-container\">\n");
    for finding in &report.risk_breakdown {
        let value_class = if finding.score >= 0 { "pass" } else { "fail" };
        let _ = writeln!(
            html,
            r#"<div class="risk-item {}"><span>{}</span><span class="value {}">{:+}</span></div>"#,
            finding.severity.as_ref(),
            escape_html(&finding.item),
            value_class,
            finding.score,
        );
    }
    html.push_str("</div>\n");

    let cards = build_cards(report);
    write_cards(&mut html, &cards, CheckSection::Authentication);
    write_cards(&mut html, &cards, CheckSection::Advanced);
    html
}

/// Renders the standalone, self-contained report document.
pub fn render_document(report: &Report, generated_at: DateTime<Local>) -> String {
    let domain = escape_html(report.domain_or("unknown"));
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Security Report - {domain}</title>
    <style>{style}</style>
</head>
<body>
    <div class="header">
        <h1>VANGUARD // MAIL POSTURE ASSESSMENT</h1>
        <p>Target Domain: <span style="color: var(--green);">{domain}</span></p>
        <p style="font-size: 11px; color: #666;">Generated: {generated}</p>
    </div>
"#,
        domain = domain,
        style = DOCUMENT_STYLE,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S %:z"),
    );
    html.push_str(&render_panel(report));
    html.push_str(
        r#"    <div class="footer">
        CONFIDENTIAL - Generated by vanguard-mail
    </div>
</body>
</html>
"#,
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::assemble;
    use crate::core::models::{ProbeField, ProbeResult, Status};
    use chrono::TimeZone;

    fn hostile_report() -> Report {
        let mut report = assemble(&ProbeResult {
            domain: Some("<script>alert('x')</script>.example".into()),
            spf: Some(ProbeField::with_status("<img src=x onerror=alert(1)>")),
            ..Default::default()
        });
        report.sender_ip = Some("\"><b>ip</b>".into());
        report
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
        assert_eq!(escape_html("example.com"), "example.com");
    }

    #[test]
    fn test_panel_escapes_network_values() {
        let html = render_panel(&hostile_report());
        assert!(!html.contains("<img"));
        assert!(!html.contains("<b>ip</b>"));
        assert!(html.contains("&lt;IMG SRC=X ONERROR=ALERT(1)&gt;"));
    }

    #[test]
    fn test_document_escapes_domain() {
        let when = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let html = render_document(&hostile_report(), when);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;.example"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Generated: 2026-01-02 03:04:05"));
    }

    #[test]
    fn test_panel_lists_findings_in_order_with_signed_scores() {
        let report = assemble(&ProbeResult {
            spf: Some(ProbeField::with_status("pass")),
            mx: Some(ProbeField::with_status("pass")),
            ..Default::default()
        });
        let html = render_panel(&report);
        assert!(html.contains("(Score: 80/100)"));
        let spf = html.find("SPF Record Valid").unwrap();
        let dmarc = html.find("DMARC Policy Not Enforced").unwrap();
        let mx = html.find("MX Records Reachable").unwrap();
        assert!(spf < dmarc && dmarc < mx);
        assert!(html.contains(r#"<span class="value pass">+20</span>"#));
        assert!(html.contains(r#"<span class="value fail">-30</span>"#));
        assert!(html.contains(r#"<div class="risk-item high">"#));
    }

    #[test]
    fn test_panel_marks_status_classes() {
        let mut report = Report::default();
        report.dns_posture.spf = Some(Status::Warn);
        report.dns_posture.dmarc = Some(Status::Enforce);
        let html = render_panel(&report);
        assert!(html.contains(r#"<div class="label">SPF Governance</div><div class="value warn">WARN</div>"#));
        assert!(html.contains(r#"<div class="label">DMARC Enforcement</div><div class="value pass">ENFORCE</div>"#));
        assert!(html.contains("RFC 7208 Complexity Limit Exceeded"));
        assert!(html.contains("Advanced Security Protocols"));
    }
}
