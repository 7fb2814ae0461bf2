// src/core/models.rs

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// --- Vocabolario degli Stati ---
// Status Vocabulary

/// A raw posture status as reported by the probing backend.
///
/// The backend speaks an open vocabulary of strings. Every known word gets its
/// own variant and anything else is kept verbatim in `Unrecognized`, so parsing
/// never fails and the normalizer can match exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Pass,
    Fail,
    Missing,
    None,
    Warn,
    Enforce,
    Enabled,
    /// `quarantine/none`, a DMARC policy that is not fully enforced.
    QuarantineNone,
    Low,
    Medium,
    True,
    Unknown,
    Unchecked,
    Unrecognized(String),
}

impl Status {
    /// Parses a status word, ignoring ASCII case. Total: unknown words are kept as `Unrecognized`.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pass" => Status::Pass,
            "fail" => Status::Fail,
            "missing" => Status::Missing,
            "none" => Status::None,
            "warn" => Status::Warn,
            "enforce" => Status::Enforce,
            "enabled" => Status::Enabled,
            "quarantine/none" => Status::QuarantineNone,
            "low" => Status::Low,
            "medium" => Status::Medium,
            "true" => Status::True,
            "unknown" => Status::Unknown,
            "unchecked" => Status::Unchecked,
            _ => Status::Unrecognized(raw.to_string()),
        }
    }

    /// The wire form of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Status::Pass => "pass",
            Status::Fail => "fail",
            Status::Missing => "missing",
            Status::None => "none",
            Status::Warn => "warn",
            Status::Enforce => "enforce",
            Status::Enabled => "enabled",
            Status::QuarantineNone => "quarantine/none",
            Status::Low => "low",
            Status::Medium => "medium",
            Status::True => "true",
            Status::Unknown => "unknown",
            Status::Unchecked => "unchecked",
            Status::Unrecognized(raw) => raw,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Status::Pass)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        Status::parse(raw)
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// The backend is not strict about types: `"true"`, `true` and `1` all show up.
struct StatusVisitor;

impl Visitor<'_> for StatusVisitor {
    type Value = Status;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a status string, boolean or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Status, E> {
        Ok(Status::parse(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Status, E> {
        Ok(Status::parse(if v { "true" } else { "false" }))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Status, E> {
        Ok(Status::parse(&v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Status, E> {
        Ok(Status::parse(&v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Status, E> {
        Ok(Status::parse(&v.to_string()))
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StatusVisitor)
    }
}

// --- Modelli del Probe ---
// Probe Models (produced by the backend)

/// One probed signal (SPF, DMARC, MX, ...). `raw` carries the record text when the backend sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeField {
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default, alias = "record", skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ProbeField {
    pub fn with_status(status: &str) -> Self {
        Self { status: Some(Status::parse(status)), raw: None }
    }
}

/// The results object returned by `POST /api/smtp/check`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub spf: Option<ProbeField>,
    #[serde(default)]
    pub dmarc: Option<ProbeField>,
    #[serde(default)]
    pub mx: Option<ProbeField>,
    #[serde(default)]
    pub encryption: Option<ProbeField>,
    #[serde(default)]
    pub rbl: Option<ProbeField>,
}

/// Reads the status out of an optional probe field.
pub fn status_of(field: &Option<ProbeField>) -> Option<&Status> {
    field.as_ref().and_then(|f| f.status.as_ref())
}

/// True only when the field is present and reports exactly `pass`.
pub fn passes(field: &Option<ProbeField>) -> bool {
    status_of(field).is_some_and(Status::is_pass)
}

// --- Modelli del Rischio ---
// Risk Models

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    /// Any severity word the client does not know, such as `critical`.
    #[serde(other)]
    Unknown,
}

/// A single scored line of the risk breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFinding {
    pub item: String,
    pub score: i32,
    pub severity: Severity,
}

impl RiskFinding {
    pub fn new(item: &str, score: i32, severity: Severity) -> Self {
        Self { item: item.to_string(), score, severity }
    }
}

// --- Report Principale ---
// Main Report

/// DNS posture as displayed to the user. `None` means the backend did not report the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsPosture {
    pub spf: Option<Status>,
    pub dmarc: Option<Status>,
    pub dkim: Option<Status>,
    pub mta_sts: Option<Status>,
    pub tls_rpt: Option<Status>,
    pub bimi: Option<Status>,
    pub dnssec: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dmarc_raw: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpTls {
    pub version: Option<String>,
    pub cipher: Option<String>,
}

/// The assembled assessment report handed to the renderers.
///
/// Every field defaults so that reports delivered by the asynchronous
/// assessment endpoint deserialize even when the backend omits parts of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    pub domain: Option<String>,
    pub sender_ip: Option<String>,
    pub transport_time: Option<String>,
    pub dns_posture: DnsPosture,
    pub smtp_tls: SmtpTls,
    pub rbl_status: Option<Status>,
    #[serde(deserialize_with = "deserialize_score")]
    pub risk_score: u8,
    pub risk_breakdown: Vec<RiskFinding>,
}

// Backend reports are not always strict about the score: `65.0`, `"65"`, `null` and
// out of range values all show up. Anything numeric is rounded and clamped to 0..=100.
struct ScoreVisitor;

impl Visitor<'_> for ScoreVisitor {
    type Value = u8;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a numeric risk score")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u8, E> {
        Ok(v.clamp(0, 100) as u8)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u8, E> {
        Ok(v.min(100) as u8)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u8, E> {
        if v.is_nan() {
            return Ok(0);
        }
        Ok(v.round().clamp(0.0, 100.0) as u8)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u8, E> {
        match v.trim().parse::<f64>() {
            Ok(n) => self.visit_f64(n),
            Err(_) => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<u8, E> {
        Ok(0)
    }
}

fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    deserializer.deserialize_any(ScoreVisitor)
}

impl Report {
    pub fn domain_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.domain.as_deref().filter(|d| !d.is_empty()).unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(Status::parse("PASS"), Status::Pass);
        assert_eq!(Status::parse("Quarantine/None"), Status::QuarantineNone);
        assert_eq!(Status::parse("softfail"), Status::Unrecognized("softfail".into()));
    }

    #[test]
    fn test_unrecognized_status_keeps_raw_text() {
        let status = Status::parse("SoftFail");
        assert_eq!(status.as_str(), "SoftFail");
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"SoftFail\"");
    }

    #[test]
    fn test_status_accepts_non_string_json() {
        let field: ProbeField = serde_json::from_str(r#"{"status": true}"#).unwrap();
        assert_eq!(field.status, Some(Status::True));

        let field: ProbeField = serde_json::from_str(r#"{"status": null}"#).unwrap();
        assert_eq!(field.status, None);
    }

    #[test]
    fn test_probe_result_ignores_unknown_keys() {
        let json = r#"{
            "domain": "example.com",
            "spf": {"status": "pass", "record": "v=spf1 -all"},
            "dmarc": {"status": "fail", "lookups": 3},
            "unexpected": 1
        }"#;
        let probe: ProbeResult = serde_json::from_str(json).unwrap();
        assert_eq!(probe.domain.as_deref(), Some("example.com"));
        assert!(passes(&probe.spf));
        assert!(!passes(&probe.dmarc));
        assert!(!passes(&probe.mx));
        assert_eq!(probe.spf.unwrap().raw.as_deref(), Some("v=spf1 -all"));
    }

    #[test]
    fn test_report_tolerates_loose_score_and_severity() {
        let json = r#"{"risk_score": 65.0,
            "risk_breakdown": [{"item": "Open relay", "score": -40, "severity": "critical"}]}"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.risk_score, 65);
        assert_eq!(report.risk_breakdown[0].severity, Severity::Unknown);
        assert_eq!(report.risk_breakdown[0].item, "Open relay");

        for (raw, expected) in [("140", 100), ("-5", 0), ("\"72\"", 72), ("null", 0), ("79.6", 80)] {
            let report: Report = serde_json::from_str(&format!(r#"{{"risk_score": {raw}}}"#)).unwrap();
            assert_eq!(report.risk_score, expected, "{raw}");
        }
        assert!(serde_json::from_str::<Report>(r#"{"risk_score": "high"}"#).is_err());
    }

    #[test]
    fn test_partial_report_deserializes_with_defaults() {
        let json = r#"{"domain": "example.com", "risk_score": 65,
            "risk_breakdown": [{"item": "x", "score": 5, "severity": "medium"}]}"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.risk_score, 65);
        assert_eq!(report.dns_posture.spf, None);
        assert_eq!(report.risk_breakdown[0].severity, Severity::Medium);
        assert_eq!(report.domain_or("unknown"), "example.com");
        assert_eq!(Report::default().domain_or("unknown"), "unknown");
    }
}
