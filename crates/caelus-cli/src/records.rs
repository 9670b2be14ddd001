//! Serde record shapes for ingestion files.
//!
//! The domain types deliberately carry no serde derives; these records are
//! the serialization boundary, converted into domain values after parsing.

use crate::error::{CliError, Result};
use caelus_domain::{
    ClauseKind, Comparator, EdgeKind, EvidenceId, NumericValue, Requirement, RequirementId,
};
use serde::Deserialize;

/// A requirement as it appears in an ingestion file.
#[derive(Debug, Deserialize)]
pub struct RequirementRecord {
    /// Stable unique id, e.g. "REG-3.1.4"
    pub id: String,
    /// Citation into the source regulatory document
    pub citation: String,
    /// Normalized statement text
    pub statement: String,
    /// Category tag, e.g. "seismic"
    pub category: String,
    /// Clause description; absent means qualitative
    #[serde(default)]
    pub clause: Option<ClauseRecord>,
}

/// Clause description within a requirement record.
#[derive(Debug, Deserialize)]
pub struct ClauseRecord {
    /// "quantitative" | "qualitative" | "structural"
    pub kind: String,
    /// Metric name (quantitative only)
    #[serde(default)]
    pub metric: Option<String>,
    /// Comparator symbol: "<=", ">=", "=", "range" (quantitative only)
    #[serde(default)]
    pub comparator: Option<String>,
    /// Threshold value; the lower bound for "range"
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Upper bound (range only)
    #[serde(default)]
    pub upper: Option<f64>,
    /// Unit symbol the threshold is expressed in
    #[serde(default)]
    pub unit: Option<String>,
}

impl RequirementRecord {
    /// Convert into a domain requirement.
    pub fn into_domain(self) -> Result<Requirement> {
        let clause = match self.clause {
            None => ClauseKind::Qualitative,
            Some(c) => c.into_clause_kind(&self.id)?,
        };
        Ok(Requirement::new(
            RequirementId::new(self.id),
            self.citation,
            self.statement,
            clause,
            self.category,
        ))
    }
}

impl ClauseRecord {
    fn into_clause_kind(self, requirement_id: &str) -> Result<ClauseKind> {
        match self.kind.as_str() {
            "qualitative" => Ok(ClauseKind::Qualitative),
            "structural" => Ok(ClauseKind::Structural),
            "quantitative" => {
                let field = |name: &str| {
                    CliError::InvalidInput(format!(
                        "Requirement '{}': quantitative clause missing '{}'",
                        requirement_id, name
                    ))
                };
                let metric = self.metric.ok_or_else(|| field("metric"))?;
                let unit = self.unit.ok_or_else(|| field("unit"))?;
                let threshold = self.threshold.ok_or_else(|| field("threshold"))?;
                let symbol = self.comparator.ok_or_else(|| field("comparator"))?;

                let comparator = match symbol.as_str() {
                    "<=" => Comparator::AtMost(threshold),
                    ">=" => Comparator::AtLeast(threshold),
                    "=" => Comparator::Equal(threshold),
                    "range" => Comparator::Range {
                        lower: threshold,
                        upper: self.upper.ok_or_else(|| field("upper"))?,
                    },
                    other => {
                        return Err(CliError::InvalidInput(format!(
                            "Requirement '{}': unknown comparator '{}'",
                            requirement_id, other
                        )))
                    }
                };

                Ok(ClauseKind::Quantitative {
                    metric,
                    comparator,
                    unit,
                })
            }
            other => Err(CliError::InvalidInput(format!(
                "Requirement '{}': unknown clause kind '{}'",
                requirement_id, other
            ))),
        }
    }
}

/// An evidence item as it appears in an ingestion file.
///
/// The semantic vector is not part of the record; it is computed at load
/// time by the configured embedding capability.
#[derive(Debug, Deserialize)]
pub struct EvidenceRecord {
    /// Stable unique id, e.g. "DS-12"
    pub id: String,
    /// Citation into the design specification
    pub citation: String,
    /// Normalized statement text
    pub statement: String,
    /// Structured numeric value, when the extraction step produced one
    #[serde(default)]
    pub numeric: Option<NumericRecord>,
}

/// Structured numeric value within an evidence record.
#[derive(Debug, Deserialize)]
pub struct NumericRecord {
    /// Extracted value
    pub value: f64,
    /// Unit symbol
    pub unit: String,
}

impl EvidenceRecord {
    /// Split into the fields the index needs; the caller supplies the
    /// vector.
    pub fn into_parts(self) -> (EvidenceId, String, String, Option<NumericValue>) {
        let numeric = self.numeric.map(|n| NumericValue::new(n.value, n.unit));
        (
            EvidenceId::new(self.id),
            self.citation,
            self.statement,
            numeric,
        )
    }
}

/// A relationship edge as it appears in an ingestion file.
#[derive(Debug, Deserialize)]
pub struct EdgeRecord {
    /// Source requirement id
    pub from: String,
    /// Target requirement id
    pub to: String,
    /// "supersedes" | "depends_on" | "cross_references" | "conflicts_with"
    pub kind: String,
}

impl EdgeRecord {
    /// Convert into domain values.
    pub fn into_domain(self) -> Result<(EdgeKind, RequirementId, RequirementId)> {
        let kind = EdgeKind::parse(&self.kind).ok_or_else(|| {
            CliError::InvalidInput(format!("Unknown edge kind '{}'", self.kind))
        })?;
        Ok((
            kind,
            RequirementId::new(self.from),
            RequirementId::new(self.to),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantitative_requirement_record() {
        let json = r#"{
            "id": "REG-1",
            "citation": "Reg. §3.1",
            "statement": "Containment wall thickness shall be at least 1.2 m",
            "category": "containment",
            "clause": {
                "kind": "quantitative",
                "metric": "wall thickness",
                "comparator": ">=",
                "threshold": 1.2,
                "unit": "m"
            }
        }"#;

        let record: RequirementRecord = serde_json::from_str(json).unwrap();
        let requirement = record.into_domain().unwrap();

        assert_eq!(requirement.id.as_str(), "REG-1");
        match requirement.clause {
            ClauseKind::Quantitative {
                metric,
                comparator,
                unit,
            } => {
                assert_eq!(metric, "wall thickness");
                assert_eq!(comparator, Comparator::AtLeast(1.2));
                assert_eq!(unit, "m");
            }
            other => panic!("expected quantitative clause, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_clause_defaults_to_qualitative() {
        let json = r#"{
            "id": "REG-2",
            "citation": "Reg. §7",
            "statement": "Operators shall be trained",
            "category": "operations"
        }"#;

        let record: RequirementRecord = serde_json::from_str(json).unwrap();
        let requirement = record.into_domain().unwrap();
        assert_eq!(requirement.clause, ClauseKind::Qualitative);
    }

    #[test]
    fn test_range_comparator() {
        let record = ClauseRecord {
            kind: "quantitative".to_string(),
            metric: Some("operating pressure".to_string()),
            comparator: Some("range".to_string()),
            threshold: Some(300.0),
            upper: Some(500.0),
            unit: Some("kPa".to_string()),
        };

        match record.into_clause_kind("REG-3").unwrap() {
            ClauseKind::Quantitative { comparator, .. } => {
                assert_eq!(
                    comparator,
                    Comparator::Range {
                        lower: 300.0,
                        upper: 500.0
                    }
                );
            }
            other => panic!("expected quantitative clause, got {:?}", other),
        }
    }

    #[test]
    fn test_quantitative_missing_field_rejected() {
        let record = ClauseRecord {
            kind: "quantitative".to_string(),
            metric: Some("wall thickness".to_string()),
            comparator: Some(">=".to_string()),
            threshold: None,
            upper: None,
            unit: Some("m".to_string()),
        };
        assert!(record.into_clause_kind("REG-1").is_err());
    }

    #[test]
    fn test_unknown_comparator_rejected() {
        let record = ClauseRecord {
            kind: "quantitative".to_string(),
            metric: Some("wall thickness".to_string()),
            comparator: Some("!=".to_string()),
            threshold: Some(1.0),
            upper: None,
            unit: Some("m".to_string()),
        };
        assert!(record.into_clause_kind("REG-1").is_err());
    }

    #[test]
    fn test_evidence_record_with_numeric() {
        let json = r#"{
            "id": "DS-1",
            "citation": "Design Spec §2",
            "statement": "Wall thickness: 1.35 m",
            "numeric": {"value": 1.35, "unit": "m"}
        }"#;

        let record: EvidenceRecord = serde_json::from_str(json).unwrap();
        let (id, _, statement, numeric) = record.into_parts();

        assert_eq!(id.as_str(), "DS-1");
        assert_eq!(statement, "Wall thickness: 1.35 m");
        assert_eq!(numeric, Some(NumericValue::new(1.35, "m")));
    }

    #[test]
    fn test_edge_record() {
        let json = r#"{"from": "REG-B", "to": "REG-A", "kind": "depends_on"}"#;
        let record: EdgeRecord = serde_json::from_str(json).unwrap();
        let (kind, from, to) = record.into_domain().unwrap();

        assert_eq!(kind, EdgeKind::DependsOn);
        assert_eq!(from.as_str(), "REG-B");
        assert_eq!(to.as_str(), "REG-A");
    }

    #[test]
    fn test_unknown_edge_kind_rejected() {
        let record = EdgeRecord {
            from: "REG-1".to_string(),
            to: "REG-2".to_string(),
            kind: "blocks".to_string(),
        };
        assert!(record.into_domain().is_err());
    }
}
