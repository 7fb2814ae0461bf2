// src/core/assembler.rs

use tracing::info;

use crate::core::models::{passes, status_of, DnsPosture, ProbeResult, Report, SmtpTls, Status};
use crate::core::scorer;

/// No sender IP is observed in the quick check flow.
pub const SENDER_IP_PLACEHOLDER: &str = "N/A (Static Check)";
pub const TRANSPORT_TIME_PLACEHOLDER: &str = "0.5s";
pub const NEGOTIATED_TLS_VERSION: &str = "TLS 1.3";
pub const UNKNOWN: &str = "Unknown";

/// Builds the report for a synchronous check from the backend's probe results.
///
/// DKIM cannot be verified without a live inbound message, so it is always
/// `unknown`. MTA-STS, TLS-RPT and BIMI are not probed on this path. DNSSEC is
/// not probed either and is inferred from DMARC.
pub fn assemble(probe: &ProbeResult) -> Report {
    let risk = scorer::score(probe);

    let dns_posture = DnsPosture {
        spf: Some(status_of(&probe.spf).cloned().unwrap_or(Status::Missing)),
        dmarc: Some(status_of(&probe.dmarc).cloned().unwrap_or(Status::Missing)),
        dkim: Some(Status::Unknown),
        mta_sts: Some(Status::Missing),
        tls_rpt: Some(Status::Missing),
        bimi: Some(Status::Missing),
        dnssec: Some(if passes(&probe.dmarc) { Status::Pass } else { Status::Unknown }),
        dmarc_raw: probe.dmarc.as_ref().and_then(|f| f.raw.clone()),
    };

    let smtp_tls = SmtpTls {
        version: Some(
            if passes(&probe.encryption) { NEGOTIATED_TLS_VERSION } else { UNKNOWN }.to_string(),
        ),
        cipher: Some(UNKNOWN.to_string()),
    };

    let report = Report {
        domain: probe.domain.clone(),
        sender_ip: Some(SENDER_IP_PLACEHOLDER.to_string()),
        transport_time: Some(TRANSPORT_TIME_PLACEHOLDER.to_string()),
        dns_posture,
        smtp_tls,
        rbl_status: Some(status_of(&probe.rbl).cloned().unwrap_or(Status::Unchecked)),
        risk_score: risk.risk_score,
        risk_breakdown: risk.breakdown,
    };

    info!(
        domain = report.domain_or("unknown"),
        risk_score = report.risk_score,
        "Report assembled."
    );
    report
}
