//! Verdict module - the engine's determination for one requirement

use super::{EvidenceId, RequirementId};

/// Compliance outcome for a single requirement.
///
/// `Indeterminate` is a first-class outcome meaning "insufficient evidence
/// to decide". It is distinct from non-compliance and is never modeled as
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The evidence satisfies the requirement.
    Compliant,
    /// The evidence violates the requirement.
    NonCompliant,
    /// The requirement is satisfied only in part (for example, its
    /// prerequisite is not met).
    PartiallyCompliant,
    /// No decision could be established from the available evidence.
    Indeterminate,
}

impl Outcome {
    /// Scoring weight for category aggregation.
    ///
    /// `Indeterminate` has no weight: it is excluded from the score
    /// denominator rather than counted as zero, so evidence gaps are not
    /// penalized as violations.
    pub fn weight(&self) -> Option<f64> {
        match self {
            Outcome::Compliant => Some(1.0),
            Outcome::PartiallyCompliant => Some(0.5),
            Outcome::NonCompliant => Some(0.0),
            Outcome::Indeterminate => None,
        }
    }

    /// Stable string form used in logs and serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Compliant => "compliant",
            Outcome::NonCompliant => "non_compliant",
            Outcome::PartiallyCompliant => "partially_compliant",
            Outcome::Indeterminate => "indeterminate",
        }
    }

    /// Parse from the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "compliant" => Some(Outcome::Compliant),
            "non_compliant" => Some(Outcome::NonCompliant),
            "partially_compliant" => Some(Outcome::PartiallyCompliant),
            "indeterminate" => Some(Outcome::Indeterminate),
            _ => None,
        }
    }
}

/// How a verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Deterministic rule evaluation of a quantitative clause.
    Rule,
    /// Semantic retrieval plus external judgment.
    Semantic,
    /// Rule evaluation was inconclusive and semantic judgment decided.
    Hybrid,
}

impl Method {
    /// Stable string form used in logs and serialized records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Rule => "rule",
            Method::Semantic => "semantic",
            Method::Hybrid => "hybrid",
        }
    }
}

/// The engine's determination for one requirement in one assessment run.
///
/// Verdicts are immutable once recorded; a re-run produces a new verdict
/// set. Evidence is referenced by id only, so a verdict carries everything
/// needed to reconstruct a human-readable explanation without re-invoking
/// any external capability.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// The requirement this verdict is for.
    pub requirement_id: RequirementId,

    /// Compliance outcome.
    pub outcome: Outcome,

    /// Confidence in the outcome, in `[0, 1]`.
    pub confidence: f64,

    /// Evidence items that informed the outcome.
    pub evidence_ids: Vec<EvidenceId>,

    /// Human-readable explanation of the outcome.
    pub rationale: String,

    /// How the verdict was reached.
    pub method: Method,
}

impl Verdict {
    /// Create a new verdict. Confidence is clamped into `[0, 1]`.
    pub fn new(
        requirement_id: RequirementId,
        outcome: Outcome,
        confidence: f64,
        evidence_ids: Vec<EvidenceId>,
        rationale: impl Into<String>,
        method: Method,
    ) -> Self {
        Self {
            requirement_id,
            outcome,
            confidence: confidence.clamp(0.0, 1.0),
            evidence_ids,
            rationale: rationale.into(),
            method,
        }
    }

    /// An indeterminate verdict with zero confidence and a rationale
    /// explaining why no decision could be made.
    pub fn indeterminate(
        requirement_id: RequirementId,
        rationale: impl Into<String>,
        method: Method,
    ) -> Self {
        Self::new(
            requirement_id,
            Outcome::Indeterminate,
            0.0,
            Vec::new(),
            rationale,
            method,
        )
    }
}
