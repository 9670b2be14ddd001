//! Deterministic comparator evaluation

use crate::extract::extract_numerics;
use crate::unit;
use caelus_domain::{ClauseKind, Comparator, EvidenceId, EvidenceItem, NumericValue, Requirement};
use thiserror::Error;

/// Errors raised during rule evaluation
#[derive(Error, Debug)]
pub enum RuleError {
    /// The requirement has no quantitative clause to evaluate
    #[error("Requirement {0} has no quantitative clause")]
    NotQuantitative(String),

    /// Numeric evidence exists for the metric, but no candidate's unit
    /// can be converted into the requirement's unit family
    #[error("No known conversion from any of [{evidence_units}] to '{requirement_unit}'")]
    UnitMismatch {
        /// Unit the requirement's threshold is expressed in
        requirement_unit: String,
        /// Comma-separated units found in the candidate evidence
        evidence_units: String,
    },
}

/// The evidence value a rule verdict was decided on.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    /// Evidence item the value came from.
    pub evidence_id: EvidenceId,
    /// Value converted into the requirement's unit.
    pub value: f64,
    /// The requirement's unit symbol.
    pub unit: String,
}

/// Outcome of deterministic evaluation.
///
/// `Indeterminate` is a distinguished non-error result: no candidate
/// evidence carried an extractable numeric value for the requirement's
/// metric, so the decision falls to the semantic path.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// The deciding candidate satisfies the comparator.
    Compliant(RuleMatch),
    /// The deciding candidate violates the comparator.
    NonCompliant(RuleMatch),
    /// No usable numeric evidence for this metric.
    Indeterminate,
}

/// Evaluate a quantitative requirement against candidate evidence.
///
/// Pure and fully deterministic: identical inputs always yield identical
/// outcomes, and no external service is ever consulted.
///
/// Steps:
/// 1. keep candidates whose statement mentions the requirement's metric;
/// 2. take each candidate's structured numeric value, falling back to
///    extraction from its statement text;
/// 3. convert values into the requirement's unit
///    ([`RuleError::UnitMismatch`] when numeric candidates exist but none
///    converts);
/// 4. apply the comparator, deciding on the conservative candidate.
pub fn evaluate(
    requirement: &Requirement,
    candidates: &[EvidenceItem],
) -> Result<RuleOutcome, RuleError> {
    let (metric, comparator, req_unit) = match &requirement.clause {
        ClauseKind::Quantitative {
            metric,
            comparator,
            unit,
        } => (metric.as_str(), *comparator, unit.as_str()),
        _ => return Err(RuleError::NotQuantitative(requirement.id.to_string())),
    };

    // Numeric values from candidates relevant to this metric
    let mut unconverted_units: Vec<String> = Vec::new();
    let mut converted: Vec<(EvidenceId, f64)> = Vec::new();

    for item in candidates {
        if !mentions_metric(&item.statement, metric) {
            continue;
        }
        let numerics = match &item.numeric {
            Some(n) => vec![n.clone()],
            None => extract_numerics(&item.statement),
        };
        for NumericValue { value, unit } in numerics {
            match unit::convert(value, &unit, req_unit) {
                Some(v) => converted.push((item.id.clone(), v)),
                None => unconverted_units.push(unit),
            }
        }
    }

    if converted.is_empty() {
        if unconverted_units.is_empty() {
            // Nothing numeric for this metric at all
            return Ok(RuleOutcome::Indeterminate);
        }
        unconverted_units.sort();
        unconverted_units.dedup();
        return Err(RuleError::UnitMismatch {
            requirement_unit: req_unit.to_string(),
            evidence_units: unconverted_units.join(", "),
        });
    }

    let (satisfying, violating): (Vec<_>, Vec<_>) = converted
        .into_iter()
        .partition(|(_, v)| comparator.satisfied_by(*v));

    if !satisfying.is_empty() {
        let (id, value) = select_match(&satisfying, comparator);
        return Ok(RuleOutcome::Compliant(RuleMatch {
            evidence_id: id,
            value,
            unit: req_unit.to_string(),
        }));
    }

    // All candidates violate; report the one closest to satisfying so the
    // rationale shows the best the design achieves
    let (id, value) = violating
        .into_iter()
        .min_by(|(id_a, a), (id_b, b)| {
            distance_to_threshold(*a, comparator)
                .total_cmp(&distance_to_threshold(*b, comparator))
                .then_with(|| id_a.cmp(id_b))
        })
        .expect("violating is non-empty when satisfying is empty");

    Ok(RuleOutcome::NonCompliant(RuleMatch {
        evidence_id: id,
        value,
        unit: req_unit.to_string(),
    }))
}

/// Whether a statement mentions the requirement's metric.
///
/// Token overlap: any metric token of three or more characters appearing
/// (case-insensitively) in the statement counts. This keeps, say, pipe
/// diameters from being read as wall thicknesses.
fn mentions_metric(statement: &str, metric: &str) -> bool {
    let statement = statement.to_ascii_lowercase();
    let mut tokens = metric
        .split_whitespace()
        .map(|t| t.to_ascii_lowercase())
        .filter(|t| t.len() >= 3)
        .peekable();

    if tokens.peek().is_none() {
        // Metric name too short to filter on; accept everything
        return true;
    }
    tokens.any(|t| statement.contains(&t))
}

/// Pick the deciding candidate among satisfying ones.
///
/// Highest magnitude wins for `>=`, lowest for `<=`, closest to the
/// target for `=` and range clauses, ties broken by evidence id.
fn select_match(satisfying: &[(EvidenceId, f64)], comparator: Comparator) -> (EvidenceId, f64) {
    let best = match comparator {
        Comparator::AtLeast(_) => satisfying.iter().max_by(|(id_a, a), (id_b, b)| {
            a.total_cmp(b).then_with(|| id_b.cmp(id_a))
        }),
        Comparator::AtMost(_) => satisfying.iter().min_by(|(id_a, a), (id_b, b)| {
            a.total_cmp(b).then_with(|| id_a.cmp(id_b))
        }),
        Comparator::Equal(target) => satisfying.iter().min_by(|(id_a, a), (id_b, b)| {
            (a - target)
                .abs()
                .total_cmp(&(b - target).abs())
                .then_with(|| id_a.cmp(id_b))
        }),
        Comparator::Range { lower, upper } => {
            let mid = (lower + upper) / 2.0;
            satisfying.iter().min_by(|(id_a, a), (id_b, b)| {
                (a - mid)
                    .abs()
                    .total_cmp(&(b - mid).abs())
                    .then_with(|| id_a.cmp(id_b))
            })
        }
    };
    let (id, value) = best.expect("select_match called with non-empty slice");
    (id.clone(), *value)
}

/// How far a value is from satisfying the comparator. Zero if satisfied.
fn distance_to_threshold(value: f64, comparator: Comparator) -> f64 {
    match comparator {
        Comparator::AtLeast(t) => (t - value).max(0.0),
        Comparator::AtMost(t) => (value - t).max(0.0),
        Comparator::Equal(t) => (value - t).abs(),
        Comparator::Range { lower, upper } => {
            if value < lower {
                lower - value
            } else if value > upper {
                value - upper
            } else {
                0.0
            }
        }
    }
}
