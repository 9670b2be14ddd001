//! Assessment module - the unit of output for one engine run

use super::{Outcome, RequirementId, Verdict};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for an assessment run, based on UUIDv7.
///
/// UUIDv7 provides chronological sortability, so runs can be ordered by
/// creation time without a separate counter, and requires no coordination
/// to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u128);

impl RunId {
    /// Generate a new UUIDv7-based run id.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a run id from a raw u128 value (for deserialization).
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw u128 value.
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Get the timestamp component (milliseconds since Unix epoch).
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Warning attached to an assessment when a `conflicts_with` edge links two
/// independently compliant requirements.
///
/// This signals an upstream graph-authoring problem, not a compliance
/// failure, so it never changes a verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictWarning {
    /// One side of the conflict edge.
    pub first: RequirementId,
    /// The other side of the conflict edge.
    pub second: RequirementId,
    /// Explanation for the report reader.
    pub note: String,
}

/// Per-status verdict counts plus the headline numbers reporting needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentSummary {
    /// Number of requirements assessed.
    pub total_requirements: usize,
    /// Verdict count per outcome (keyed by `Outcome::as_str`).
    pub status_counts: BTreeMap<&'static str, usize>,
    /// Overall compliance as a percentage, when any requirement scored.
    pub compliance_percentage: Option<f64>,
}

/// The full set of verdicts for one run plus derived scores.
///
/// Owned by the aggregator; read-only once created. Verdicts are kept in
/// requirement-id order so output is reproducible across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceAssessment {
    /// Unique id of this run.
    pub run_id: RunId,

    /// One verdict per active requirement, ordered by requirement id.
    pub verdicts: Vec<Verdict>,

    /// Score per category tag, in `[0, 1]`. Categories whose verdicts are
    /// all indeterminate carry no score and are absent.
    pub category_scores: BTreeMap<String, f64>,

    /// Overall score in `[0, 1]`, absent when no category scored.
    pub overall_score: Option<f64>,

    /// Conflict warnings discovered during the adjustment pass.
    pub warnings: Vec<ConflictWarning>,
}

impl ComplianceAssessment {
    /// Look up the verdict for a specific requirement.
    pub fn verdict_for(&self, id: &RequirementId) -> Option<&Verdict> {
        self.verdicts.iter().find(|v| &v.requirement_id == id)
    }

    /// Derive the summary counts reporting consumes.
    pub fn summary(&self) -> AssessmentSummary {
        let mut status_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for verdict in &self.verdicts {
            *status_counts.entry(verdict.outcome.as_str()).or_insert(0) += 1;
        }

        AssessmentSummary {
            total_requirements: self.verdicts.len(),
            status_counts,
            compliance_percentage: self.overall_score.map(|s| s * 100.0),
        }
    }

    /// Count verdicts with the given outcome.
    pub fn count_outcome(&self, outcome: Outcome) -> usize {
        self.verdicts.iter().filter(|v| v.outcome == outcome).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EvidenceId, Method};

    fn verdict(id: &str, outcome: Outcome) -> Verdict {
        Verdict::new(
            RequirementId::new(id),
            outcome,
            0.9,
            vec![EvidenceId::new("DS-1")],
            "test rationale",
            Method::Rule,
        )
    }

    #[test]
    fn test_run_id_chronological() {
        let a = RunId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = RunId::new();

        assert!(a < b, "Earlier UUIDv7 should be less than later UUIDv7");
        assert!(a.timestamp() <= b.timestamp());
    }

    #[test]
    fn test_run_id_display() {
        let id = RunId::new();
        // UUID strings are 36 characters (8-4-4-4-12 with hyphens)
        assert_eq!(id.to_string().len(), 36);
    }

    #[test]
    fn test_summary_counts() {
        let assessment = ComplianceAssessment {
            run_id: RunId::new(),
            verdicts: vec![
                verdict("REG-1", Outcome::Compliant),
                verdict("REG-2", Outcome::Compliant),
                verdict("REG-3", Outcome::NonCompliant),
                verdict("REG-4", Outcome::Indeterminate),
            ],
            category_scores: BTreeMap::from([("seismic".to_string(), 2.0 / 3.0)]),
            overall_score: Some(2.0 / 3.0),
            warnings: Vec::new(),
        };

        let summary = assessment.summary();
        assert_eq!(summary.total_requirements, 4);
        assert_eq!(summary.status_counts.get("compliant"), Some(&2));
        assert_eq!(summary.status_counts.get("non_compliant"), Some(&1));
        assert_eq!(summary.status_counts.get("indeterminate"), Some(&1));
        let pct = summary.compliance_percentage.unwrap();
        assert!((pct - 66.666).abs() < 0.1);
    }

    #[test]
    fn test_verdict_lookup() {
        let assessment = ComplianceAssessment {
            run_id: RunId::new(),
            verdicts: vec![verdict("REG-1", Outcome::Compliant)],
            category_scores: BTreeMap::new(),
            overall_score: None,
            warnings: Vec::new(),
        };

        assert!(assessment.verdict_for(&RequirementId::new("REG-1")).is_some());
        assert!(assessment.verdict_for(&RequirementId::new("REG-2")).is_none());
    }
}
