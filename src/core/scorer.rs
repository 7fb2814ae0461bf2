// src/core/scorer.rs

use tracing::debug;

use crate::core::models::{passes, ProbeResult, RiskFinding, Severity};

const BASE_SCORE: i32 = 50;
const SPF_WEIGHT: i32 = 20;
const DMARC_WEIGHT: i32 = 30;
const MX_WEIGHT: i32 = 10;

/// Output of the risk scorer: the clamped score and the ordered breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
    pub risk_score: u8,
    pub breakdown: Vec<RiskFinding>,
}

/// Scores a probe with the fixed additive model.
///
/// Starts from 50 and adds the weight of every passing signal. Failing SPF and
/// DMARC produce a negative finding in the breakdown, but the negative weight
/// is informational only and is never subtracted. A failing MX produces no
/// finding at all. Findings are always emitted in SPF, DMARC, MX order.
pub fn score(probe: &ProbeResult) -> RiskAssessment {
    let mut total = BASE_SCORE;
    let mut breakdown = Vec::with_capacity(3);

    if passes(&probe.spf) {
        total += SPF_WEIGHT;
        breakdown.push(RiskFinding::new("SPF Record Valid", SPF_WEIGHT, Severity::Low));
    } else {
        breakdown.push(RiskFinding::new(
            "SPF Record Missing or Invalid",
            -SPF_WEIGHT,
            Severity::High,
        ));
    }

    if passes(&probe.dmarc) {
        total += DMARC_WEIGHT;
        breakdown.push(RiskFinding::new("DMARC Policy Enforced", DMARC_WEIGHT, Severity::Low));
    } else {
        breakdown.push(RiskFinding::new(
            "DMARC Policy Not Enforced",
            -DMARC_WEIGHT,
            Severity::High,
        ));
    }

    if passes(&probe.mx) {
        total += MX_WEIGHT;
        breakdown.push(RiskFinding::new("MX Records Reachable", MX_WEIGHT, Severity::Low));
    }

    let risk_score = total.clamp(0, 100) as u8;
    debug!(risk_score, findings = breakdown.len(), "Risk score computed.");
    RiskAssessment { risk_score, breakdown }
}
