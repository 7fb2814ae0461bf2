//! Static catalogue of everything the report can show: the posture checks with
//! their labels and sections, the gap warnings attached to them, and a plain
//! language explanation for every risk finding the scorer can produce.

use crate::core::models::{Report, Status};
use std::fmt;

/// The two groups of posture cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckSection {
    /// Sender identity and domain authentication (SPF, DMARC, DKIM, DNSSEC, RBL).
    Authentication,
    /// Transport hardening and brand protocols (MTA-STS, TLS-RPT, BIMI, TLS).
    Advanced,
}

impl fmt::Display for CheckSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckSection::Authentication => write!(f, "Authentication Infrastructure"),
            CheckSection::Advanced => write!(f, "Advanced Security Protocols"),
        }
    }
}

/// Every card of the posture grid, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostureCheck {
    SenderIp,
    TransportTime,
    Spf,
    Dmarc,
    Dkim,
    Dnssec,
    Rbl,
    MtaSts,
    TlsRpt,
    Bimi,
    Encryption,
}

pub struct CheckDetail {
    pub check: PostureCheck,
    pub label: &'static str,
    pub section: CheckSection,
    /// Shown when the report carries no value for the field.
    pub fallback: &'static str,
}

static CHECKS: &[CheckDetail] = &[
    CheckDetail { check: PostureCheck::SenderIp, label: "Origin MTA Node", section: CheckSection::Authentication, fallback: "Generic MTA" },
    CheckDetail { check: PostureCheck::TransportTime, label: "Network Latency", section: CheckSection::Authentication, fallback: "N/A" },
    CheckDetail { check: PostureCheck::Spf, label: "SPF Governance", section: CheckSection::Authentication, fallback: "MISSING" },
    CheckDetail { check: PostureCheck::Dmarc, label: "DMARC Enforcement", section: CheckSection::Authentication, fallback: "NONE" },
    CheckDetail { check: PostureCheck::Dkim, label: "DKIM Signature", section: CheckSection::Authentication, fallback: "UNKNOWN" },
    CheckDetail { check: PostureCheck::Dnssec, label: "DNSSEC Integrity", section: CheckSection::Authentication, fallback: "FAIL" },
    CheckDetail { check: PostureCheck::Rbl, label: "RBL Reputation", section: CheckSection::Authentication, fallback: "CLEAN" },
    CheckDetail { check: PostureCheck::MtaSts, label: "MTA-STS Handshake", section: CheckSection::Advanced, fallback: "MISSING" },
    CheckDetail { check: PostureCheck::TlsRpt, label: "TLS Reporting (RPT)", section: CheckSection::Advanced, fallback: "MISSING" },
    CheckDetail { check: PostureCheck::Bimi, label: "BIMI Brand Indicator", section: CheckSection::Advanced, fallback: "MISSING" },
    CheckDetail { check: PostureCheck::Encryption, label: "Transport Encryption", section: CheckSection::Advanced, fallback: "Unknown" },
];

/// All posture checks in display order.
pub fn checks() -> &'static [CheckDetail] {
    CHECKS
}

pub fn get_check_detail(check: PostureCheck) -> Option<&'static CheckDetail> {
    CHECKS.iter().find(|c| c.check == check)
}

pub const GAP_SPF_COMPLEXITY: &str = "RFC 7208 Complexity Limit Exceeded";
pub const GAP_DMARC_RUA: &str = "Potential Data Exfiltration Path via RUA";
pub const GAP_MTA_STS: &str = "Policy Handshake Integrity Failed";

/// Returns the gap warning attached to a card, if the report triggers one.
pub fn gap_warning(check: PostureCheck, report: &Report) -> Option<&'static str> {
    let dns = &report.dns_posture;
    match check {
        PostureCheck::Spf if dns.spf == Some(Status::Warn) => Some(GAP_SPF_COMPLEXITY),
        PostureCheck::Dmarc if dns.dmarc_raw.as_deref().is_some_and(|r| r.contains("rua=")) => {
            Some(GAP_DMARC_RUA)
        }
        PostureCheck::MtaSts if dns.mta_sts == Some(Status::Missing) => Some(GAP_MTA_STS),
        _ => None,
    }
}

/// Plain language context for one risk finding.
pub struct FindingDetail {
    /// The finding's `item` text, as produced by the scorer.
    pub item: &'static str,
    pub description: &'static str,
    pub remediation: &'static str,
}

static FINDINGS: &[FindingDetail] = &[
    FindingDetail {
        item: "SPF Record Valid",
        description: "The domain publishes a valid Sender Policy Framework record listing the servers allowed to send mail on its behalf.",
        remediation: "Keep the record under the 10 DNS lookup limit and review it whenever a new mail provider is added.",
    },
    FindingDetail {
        item: "SPF Record Missing or Invalid",
        description: "Without a valid SPF record receivers cannot tell which servers may send mail for the domain, which makes spoofing easier.",
        remediation: "Publish a TXT record such as 'v=spf1 include:_spf.example-provider.com -all' that lists every legitimate sender.",
    },
    FindingDetail {
        item: "DMARC Policy Enforced",
        description: "A DMARC policy tells receivers to quarantine or reject mail that fails SPF and DKIM alignment.",
        remediation: "Monitor aggregate reports and keep the policy at 'quarantine' or 'reject'.",
    },
    FindingDetail {
        item: "DMARC Policy Not Enforced",
        description: "The domain has no DMARC record or only a monitoring policy, so spoofed mail is still delivered.",
        remediation: "Publish '_dmarc' with 'p=none' to collect reports, then move to 'p=quarantine' and finally 'p=reject'.",
    },
    FindingDetail {
        item: "MX Records Reachable",
        description: "The domain's mail exchangers resolve and accept connections.",
        remediation: "No action needed. Keep at least two MX hosts for redundancy.",
    },
];

/// Looks up the explanation for a finding by its item text.
pub fn get_finding_detail(item: &str) -> Option<&'static FindingDetail> {
    FINDINGS.iter().find(|f| f.item == item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::assemble;
    use crate::core::models::ProbeResult;

    #[test]
    fn test_every_check_has_detail() {
        for check in [
            PostureCheck::SenderIp,
            PostureCheck::TransportTime,
            PostureCheck::Spf,
            PostureCheck::Dmarc,
            PostureCheck::Dkim,
            PostureCheck::Dnssec,
            PostureCheck::Rbl,
            PostureCheck::MtaSts,
            PostureCheck::TlsRpt,
            PostureCheck::Bimi,
            PostureCheck::Encryption,
        ] {
            assert!(get_check_detail(check).is_some(), "{check:?}");
        }
    }

    #[test]
    fn test_every_scorer_finding_is_documented() {
        let all_fail = assemble(&ProbeResult::default());
        for finding in &all_fail.risk_breakdown {
            assert!(get_finding_detail(&finding.item).is_some(), "{}", finding.item);
        }
        for item in ["SPF Record Valid", "DMARC Policy Enforced", "MX Records Reachable"] {
            assert!(get_finding_detail(item).is_some());
        }
    }

    #[test]
    fn test_gap_warnings() {
        let mut report = Report::default();
        assert_eq!(gap_warning(PostureCheck::Spf, &report), None);

        report.dns_posture.spf = Some(Status::Warn);
        report.dns_posture.dmarc_raw = Some("v=DMARC1; p=none; rua=mailto:a@b.example".into());
        report.dns_posture.mta_sts = Some(Status::Missing);
        assert_eq!(gap_warning(PostureCheck::Spf, &report), Some(GAP_SPF_COMPLEXITY));
        assert_eq!(gap_warning(PostureCheck::Dmarc, &report), Some(GAP_DMARC_RUA));
        assert_eq!(gap_warning(PostureCheck::MtaSts, &report), Some(GAP_MTA_STS));
        assert_eq!(gap_warning(PostureCheck::Bimi, &report), None);
    }
}
