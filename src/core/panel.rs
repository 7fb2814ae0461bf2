// src/core/panel.rs

//! The card view of a report, shared by the HTML renderers and the terminal view.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::knowledge_base::{self, CheckSection, PostureCheck};
use crate::core::models::{Report, Status};
use crate::core::normalizer::{classify_status, encryption_verdict, rbl_verdict, StatusClass};

/// Latency above this many seconds is flagged.
const SLOW_TRANSPORT_SECS: f64 = 5.0;

static RE_LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+))").unwrap());

/// One card of the posture grid. `class` is `None` for purely informational cards.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelCard {
    pub check: PostureCheck,
    pub label: &'static str,
    pub section: CheckSection,
    pub value: String,
    pub class: Option<StatusClass>,
    pub gap_warning: Option<&'static str>,
}

/// Reads the leading number of a free-form duration such as `"0.5s"`.
pub fn leading_seconds(raw: &str) -> Option<f64> {
    RE_LEADING_NUMBER
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn status_card(status: Option<&Status>, fallback: &str) -> (String, Option<StatusClass>) {
    let value = match status {
        Some(s) if !s.as_str().is_empty() => s.as_str().to_uppercase(),
        _ => fallback.to_string(),
    };
    (value, Some(classify_status(status)))
}

/// Builds every card of the posture grid, in display order.
pub fn build_cards(report: &Report) -> Vec<PanelCard> {
    let dns = &report.dns_posture;
    knowledge_base::checks()
        .iter()
        .map(|detail| {
            let (value, class) = match detail.check {
                PostureCheck::SenderIp => (
                    report.sender_ip.clone().unwrap_or_else(|| detail.fallback.to_string()),
                    None,
                ),
                PostureCheck::TransportTime => {
                    let slow = report
                        .transport_time
                        .as_deref()
                        .and_then(leading_seconds)
                        .is_some_and(|secs| secs > SLOW_TRANSPORT_SECS);
                    (
                        report.transport_time.clone().unwrap_or_else(|| detail.fallback.to_string()),
                        Some(if slow { StatusClass::Warn } else { StatusClass::Pass }),
                    )
                }
                PostureCheck::Spf => status_card(dns.spf.as_ref(), detail.fallback),
                PostureCheck::Dmarc => status_card(dns.dmarc.as_ref(), detail.fallback),
                PostureCheck::Dkim => status_card(dns.dkim.as_ref(), detail.fallback),
                PostureCheck::Dnssec => status_card(dns.dnssec.as_ref(), detail.fallback),
                PostureCheck::MtaSts => status_card(dns.mta_sts.as_ref(), detail.fallback),
                PostureCheck::TlsRpt => status_card(dns.tls_rpt.as_ref(), detail.fallback),
                PostureCheck::Bimi => status_card(dns.bimi.as_ref(), detail.fallback),
                PostureCheck::Rbl => {
                    let verdict = rbl_verdict(report.rbl_status.as_ref());
                    let value = if verdict == Status::Fail { "BLACKLISTED" } else { "CLEAN" };
                    (value.to_string(), Some(classify_status(Some(&verdict))))
                }
                PostureCheck::Encryption => (
                    report
                        .smtp_tls
                        .version
                        .clone()
                        .filter(|v| !v.is_empty())
                        .unwrap_or_else(|| detail.fallback.to_string()),
                    Some(classify_status(Some(&encryption_verdict(&report.smtp_tls)))),
                ),
            };
            PanelCard {
                check: detail.check,
                label: detail.label,
                section: detail.section,
                value,
                class,
                gap_warning: knowledge_base::gap_warning(detail.check, report),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::assemble;
    use crate::core::models::{ProbeField, ProbeResult};

    fn card(cards: &[PanelCard], check: PostureCheck) -> &PanelCard {
        cards.iter().find(|c| c.check == check).unwrap()
    }

    #[test]
    fn test_leading_seconds() {
        assert_eq!(leading_seconds("0.5s"), Some(0.5));
        assert_eq!(leading_seconds(" 12 seconds"), Some(12.0));
        assert_eq!(leading_seconds(".25"), Some(0.25));
        assert_eq!(leading_seconds("N/A"), None);
    }

    #[test]
    fn test_cards_for_assembled_report() {
        let probe = ProbeResult {
            spf: Some(ProbeField::with_status("pass")),
            encryption: Some(ProbeField::with_status("pass")),
            ..Default::default()
        };
        let cards = build_cards(&assemble(&probe));

        assert_eq!(cards.len(), knowledge_base::checks().len());
        assert_eq!(cards[0].check, PostureCheck::SenderIp);

        let spf = card(&cards, PostureCheck::Spf);
        assert_eq!(spf.value, "PASS");
        assert_eq!(spf.class, Some(StatusClass::Pass));

        let dmarc = card(&cards, PostureCheck::Dmarc);
        assert_eq!(dmarc.value, "MISSING");
        assert_eq!(dmarc.class, Some(StatusClass::Warn));

        let mta_sts = card(&cards, PostureCheck::MtaSts);
        assert_eq!(mta_sts.gap_warning, Some(knowledge_base::GAP_MTA_STS));

        assert_eq!(card(&cards, PostureCheck::Rbl).value, "CLEAN");
        assert_eq!(card(&cards, PostureCheck::Encryption).value, "TLS 1.3");
        assert_eq!(card(&cards, PostureCheck::TransportTime).class, Some(StatusClass::Pass));
    }

    #[test]
    fn test_cards_for_sparse_backend_report() {
        let report = Report {
            transport_time: Some("7.2s".into()),
            rbl_status: Some(Status::Fail),
            ..Default::default()
        };
        let cards = build_cards(&report);

        assert_eq!(card(&cards, PostureCheck::SenderIp).value, "Generic MTA");
        assert_eq!(card(&cards, PostureCheck::SenderIp).class, None);
        assert_eq!(card(&cards, PostureCheck::TransportTime).class, Some(StatusClass::Warn));
        assert_eq!(card(&cards, PostureCheck::Dmarc).value, "NONE");
        assert_eq!(card(&cards, PostureCheck::Dmarc).class, Some(StatusClass::Fail));
        assert_eq!(card(&cards, PostureCheck::Rbl).value, "BLACKLISTED");
        assert_eq!(card(&cards, PostureCheck::Rbl).class, Some(StatusClass::Fail));
        assert_eq!(card(&cards, PostureCheck::Encryption).value, "Unknown");
    }
}
