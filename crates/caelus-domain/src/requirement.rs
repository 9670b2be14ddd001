//! Requirement module - a single regulatory obligation

use std::fmt;

/// Stable identifier for a requirement.
///
/// Requirement ids are caller-supplied citations (for example `"REG-3.1.4"`)
/// rather than generated values, because traceability back to the source
/// document is part of the audit contract. Ordering is lexicographic, which
/// gives downstream consumers a deterministic iteration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequirementId(String);

impl RequirementId {
    /// Create a requirement id from a source citation string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying citation string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RequirementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Comparator for a quantitative clause threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparator {
    /// Evidence value must be `<=` the threshold.
    AtMost(f64),
    /// Evidence value must be `>=` the threshold.
    AtLeast(f64),
    /// Evidence value must equal the threshold (within float tolerance).
    Equal(f64),
    /// Evidence value must fall within `[lower, upper]` inclusive.
    Range {
        /// Lower bound of the acceptable range.
        lower: f64,
        /// Upper bound of the acceptable range.
        upper: f64,
    },
}

impl Comparator {
    /// Check whether `value` satisfies this comparator.
    pub fn satisfied_by(&self, value: f64) -> bool {
        match *self {
            Comparator::AtMost(t) => value <= t,
            Comparator::AtLeast(t) => value >= t,
            Comparator::Equal(t) => (value - t).abs() <= f64::EPSILON * t.abs().max(1.0),
            Comparator::Range { lower, upper } => value >= lower && value <= upper,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Comparator::AtMost(t) => write!(f, "<= {}", t),
            Comparator::AtLeast(t) => write!(f, ">= {}", t),
            Comparator::Equal(t) => write!(f, "= {}", t),
            Comparator::Range { lower, upper } => write!(f, "in [{}, {}]", lower, upper),
        }
    }
}

/// The kind of clause a requirement states.
///
/// This is a tagged sum type rather than a key-value bag so the Rule
/// Evaluator's applicability check is a type-level match, not a runtime
/// field-presence probe.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseKind {
    /// A measurable clause: a named metric compared against a threshold.
    Quantitative {
        /// Name of the metric, e.g. `"wall thickness"`.
        metric: String,
        /// Comparator and threshold value(s).
        comparator: Comparator,
        /// Unit symbol the threshold is expressed in, e.g. `"m"`.
        unit: String,
    },
    /// A clause evaluable only by qualitative judgment.
    Qualitative,
    /// A clause about system structure or organization.
    Structural,
}

impl ClauseKind {
    /// Whether this clause can be evaluated deterministically by rules.
    pub fn is_quantitative(&self) -> bool {
        matches!(self, ClauseKind::Quantitative { .. })
    }
}

/// Lifecycle status of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The requirement participates in assessments.
    Active,
    /// The requirement has been superseded by another and is soft-retired.
    Superseded,
}

/// A requirement - a single regulatory obligation.
///
/// Requirements are immutable once created except for `status`, which the
/// graph store flips when a supersession edge is added. They are never
/// deleted mid-assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    /// Stable unique identifier.
    pub id: RequirementId,

    /// Citation into the source regulatory document.
    pub citation: String,

    /// Normalized statement text.
    pub statement: String,

    /// Clause kind (quantitative / qualitative / structural).
    pub clause: ClauseKind,

    /// Category tag, e.g. `"seismic"` or `"containment"`.
    pub category: String,

    /// Lifecycle status.
    pub status: Status,
}

impl Requirement {
    /// Create a new active requirement.
    pub fn new(
        id: RequirementId,
        citation: impl Into<String>,
        statement: impl Into<String>,
        clause: ClauseKind,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            citation: citation.into(),
            statement: statement.into(),
            clause,
            category: category.into(),
            status: Status::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_id_ordering() {
        let a = RequirementId::new("REG-1.1");
        let b = RequirementId::new("REG-1.2");

        assert!(a < b);
        assert_eq!(a, RequirementId::from("REG-1.1"));
    }

    #[test]
    fn test_comparator_at_least() {
        let c = Comparator::AtLeast(1.2);
        assert!(c.satisfied_by(1.35));
        assert!(c.satisfied_by(1.2));
        assert!(!c.satisfied_by(0.9));
    }

    #[test]
    fn test_comparator_at_most() {
        let c = Comparator::AtMost(0.25);
        assert!(c.satisfied_by(0.2));
        assert!(!c.satisfied_by(0.3));
    }

    #[test]
    fn test_comparator_range() {
        let c = Comparator::Range {
            lower: 2.0,
            upper: 4.0,
        };
        assert!(c.satisfied_by(2.0));
        assert!(c.satisfied_by(3.5));
        assert!(c.satisfied_by(4.0));
        assert!(!c.satisfied_by(1.9));
        assert!(!c.satisfied_by(4.1));
    }

    #[test]
    fn test_comparator_equal_tolerance() {
        let c = Comparator::Equal(4.0);
        assert!(c.satisfied_by(4.0));
        assert!(!c.satisfied_by(4.01));
    }

    #[test]
    fn test_clause_kind_applicability() {
        let quantitative = ClauseKind::Quantitative {
            metric: "wall thickness".to_string(),
            comparator: Comparator::AtLeast(1.2),
            unit: "m".to_string(),
        };
        assert!(quantitative.is_quantitative());
        assert!(!ClauseKind::Qualitative.is_quantitative());
        assert!(!ClauseKind::Structural.is_quantitative());
    }

    #[test]
    fn test_new_requirement_is_active() {
        let r = Requirement::new(
            RequirementId::new("REG-1"),
            "10 CFR 50, App. A",
            "Containment wall thickness shall be at least 1.2 m.",
            ClauseKind::Qualitative,
            "containment",
        );
        assert_eq!(r.status, Status::Active);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: RequirementId ordering matches the underlying string ordering
        #[test]
        fn test_id_ordering_property(a in "[A-Z]{1,4}-[0-9]{1,3}", b in "[A-Z]{1,4}-[0-9]{1,3}") {
            let id_a = RequirementId::new(a.clone());
            let id_b = RequirementId::new(b.clone());

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// Property: Range satisfaction is equivalent to both one-sided comparators
        #[test]
        fn test_range_equivalence(lower in -1e6..1e6f64, width in 0.0..1e6f64, value in -2e6..2e6f64) {
            let upper = lower + width;
            let range = Comparator::Range { lower, upper };
            let both = Comparator::AtLeast(lower).satisfied_by(value)
                && Comparator::AtMost(upper).satisfied_by(value);

            prop_assert_eq!(range.satisfied_by(value), both);
        }
    }
}
