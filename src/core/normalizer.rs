// src/core/normalizer.rs

//! Maps raw posture statuses onto the three presentation classes.

use crate::core::models::{Report, SmtpTls, Status};

/// Presentation class of a posture field. The lowercase form doubles as CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum StatusClass {
    Pass,
    Warn,
    Fail,
}

/// Classifies a raw status string. Absent and unknown values are `Fail`.
pub fn classify(raw: Option<&str>) -> StatusClass {
    match raw {
        Some(raw) => classify_status(Some(&Status::parse(raw))),
        None => StatusClass::Fail,
    }
}

/// Classifies an already parsed status.
pub fn classify_status(status: Option<&Status>) -> StatusClass {
    match status {
        Some(Status::Pass | Status::True | Status::Low | Status::Enforce | Status::Enabled) => {
            StatusClass::Pass
        }
        Some(
            Status::Warn | Status::None | Status::Medium | Status::Missing | Status::QuarantineNone,
        ) => StatusClass::Warn,
        Some(Status::Fail | Status::Unknown | Status::Unchecked | Status::Unrecognized(_)) => {
            StatusClass::Fail
        }
        Option::None => StatusClass::Fail,
    }
}

/// Collapses the RBL status to pass/fail: only an explicit `fail` means blacklisted.
pub fn rbl_verdict(rbl: Option<&Status>) -> Status {
    match rbl {
        Some(Status::Fail) => Status::Fail,
        _ => Status::Pass,
    }
}

/// Transport encryption counts as present when a concrete TLS version was negotiated.
pub fn encryption_verdict(tls: &SmtpTls) -> Status {
    match tls.version.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() && !v.eq_ignore_ascii_case("unknown") => Status::Pass,
        _ => Status::Fail,
    }
}

/// The classification of every posture field of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostureClasses {
    pub spf: StatusClass,
    pub dmarc: StatusClass,
    pub dkim: StatusClass,
    pub mta_sts: StatusClass,
    pub tls_rpt: StatusClass,
    pub bimi: StatusClass,
    pub dnssec: StatusClass,
    pub rbl: StatusClass,
    pub encryption: StatusClass,
}

impl PostureClasses {
    fn all(&self) -> [StatusClass; 9] {
        [
            self.spf,
            self.dmarc,
            self.dkim,
            self.mta_sts,
            self.tls_rpt,
            self.bimi,
            self.dnssec,
            self.rbl,
            self.encryption,
        ]
    }

    pub fn count(&self, class: StatusClass) -> usize {
        self.all().iter().filter(|c| **c == class).count()
    }
}

/// Applies the classifier independently to each posture field of `report`.
pub fn normalize(report: &Report) -> PostureClasses {
    let dns = &report.dns_posture;
    PostureClasses {
        spf: classify_status(dns.spf.as_ref()),
        dmarc: classify_status(dns.dmarc.as_ref()),
        dkim: classify_status(dns.dkim.as_ref()),
        mta_sts: classify_status(dns.mta_sts.as_ref()),
        tls_rpt: classify_status(dns.tls_rpt.as_ref()),
        bimi: classify_status(dns.bimi.as_ref()),
        dnssec: classify_status(dns.dnssec.as_ref()),
        rbl: classify_status(Some(&rbl_verdict(report.rbl_status.as_ref()))),
        encryption: classify_status(Some(&encryption_verdict(&report.smtp_tls))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify(Some("PASS")), StatusClass::Pass);
        assert_eq!(classify(Some("pass")), StatusClass::Pass);
        assert_eq!(classify(Some("Enforce")), StatusClass::Pass);
        assert_eq!(classify(Some("QUARANTINE/NONE")), StatusClass::Warn);
    }

    #[test]
    fn test_classify_known_sets() {
        for raw in ["pass", "true", "low", "enforce", "enabled"] {
            assert_eq!(classify(Some(raw)), StatusClass::Pass, "{raw}");
        }
        for raw in ["warn", "none", "medium", "missing", "quarantine/none"] {
            assert_eq!(classify(Some(raw)), StatusClass::Warn, "{raw}");
        }
    }

    #[test]
    fn test_classify_everything_else_fails() {
        assert_eq!(classify(None), StatusClass::Fail);
        for raw in ["fail", "unknown", "", "softfail", "high", "quarantine", "pass "] {
            assert_eq!(classify(Some(raw)), StatusClass::Fail, "{raw:?}");
        }
    }

    #[test]
    fn test_rbl_and_encryption_verdicts() {
        assert_eq!(rbl_verdict(Some(&Status::Fail)), Status::Fail);
        assert_eq!(rbl_verdict(Some(&Status::Unchecked)), Status::Pass);
        assert_eq!(rbl_verdict(None), Status::Pass);

        let tls = SmtpTls { version: Some("TLS 1.3".into()), cipher: None };
        assert_eq!(encryption_verdict(&tls), Status::Pass);
        let tls = SmtpTls { version: Some("Unknown".into()), cipher: None };
        assert_eq!(encryption_verdict(&tls), Status::Fail);
        assert_eq!(encryption_verdict(&SmtpTls::default()), Status::Fail);
    }

    #[test]
    fn test_normalize_empty_report() {
        let classes = normalize(&Report::default());
        assert_eq!(classes.spf, StatusClass::Fail);
        assert_eq!(classes.rbl, StatusClass::Pass);
        assert_eq!(classes.encryption, StatusClass::Fail);
        assert_eq!(classes.count(StatusClass::Fail), 8);
        assert_eq!(classes.count(StatusClass::Pass), 1);
    }
}
