//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use caelus_domain::{ComplianceAssessment, Outcome, Verdict};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a full assessment.
    pub fn format_assessment(&self, assessment: &ComplianceAssessment) -> Result<String> {
        match self.format {
            CliFormat::Json => self.format_json(assessment),
            CliFormat::Table => Ok(self.format_table(assessment)),
            CliFormat::Quiet => Ok(self.format_quiet(assessment)),
        }
    }

    fn format_json(&self, assessment: &ComplianceAssessment) -> Result<String> {
        let verdicts: Vec<serde_json::Value> = assessment
            .verdicts
            .iter()
            .map(|v| {
                serde_json::json!({
                    "requirement_id": v.requirement_id.as_str(),
                    "outcome": v.outcome.as_str(),
                    "confidence": v.confidence,
                    "method": v.method.as_str(),
                    "evidence_ids": v.evidence_ids.iter().map(|id| id.as_str()).collect::<Vec<_>>(),
                    "rationale": v.rationale,
                })
            })
            .collect();

        let warnings: Vec<serde_json::Value> = assessment
            .warnings
            .iter()
            .map(|w| {
                serde_json::json!({
                    "first": w.first.as_str(),
                    "second": w.second.as_str(),
                    "note": w.note,
                })
            })
            .collect();

        let summary = assessment.summary();
        let document = serde_json::json!({
            "run_id": assessment.run_id.to_string(),
            "verdicts": verdicts,
            "category_scores": assessment.category_scores,
            "overall_score": assessment.overall_score,
            "warnings": warnings,
            "summary": {
                "total_requirements": summary.total_requirements,
                "status_counts": summary.status_counts,
                "compliance_percentage": summary.compliance_percentage,
            },
        });

        Ok(serde_json::to_string_pretty(&document)?)
    }

    fn format_table(&self, assessment: &ComplianceAssessment) -> String {
        let mut output = String::new();

        if assessment.verdicts.is_empty() {
            return self.colorize("No requirements assessed.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Requirement", "Outcome", "Confidence", "Method", "Evidence"]);

        for verdict in &assessment.verdicts {
            let evidence = verdict
                .evidence_ids
                .iter()
                .map(|id| id.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            builder.push_record([
                verdict.requirement_id.as_str(),
                &self.outcome_label(verdict),
                &format!("{:.2}", verdict.confidence),
                verdict.method.as_str(),
                &evidence,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        output.push_str(&table.to_string());
        output.push('\n');

        for verdict in &assessment.verdicts {
            output.push_str(&format!(
                "  {}: {}\n",
                verdict.requirement_id, verdict.rationale
            ));
        }

        if !assessment.category_scores.is_empty() {
            output.push('\n');
            output.push_str("Category scores:\n");
            for (category, score) in &assessment.category_scores {
                output.push_str(&format!("  {}: {:.1}%\n", category, score * 100.0));
            }
        }

        match assessment.overall_score {
            Some(score) => {
                output.push_str(&format!("\nOverall compliance: {:.1}%\n", score * 100.0))
            }
            None => output.push_str(&self.colorize(
                "\nNo overall score: no requirement could be scored.\n",
                "yellow",
            )),
        }

        for warning in &assessment.warnings {
            output.push_str(&self.warning(&warning.note));
            output.push('\n');
        }

        output
    }

    fn format_quiet(&self, assessment: &ComplianceAssessment) -> String {
        assessment
            .verdicts
            .iter()
            .map(|v| format!("{}\t{}", v.requirement_id, v.outcome.as_str()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn outcome_label(&self, verdict: &Verdict) -> String {
        let label = verdict.outcome.as_str();
        let color = match verdict.outcome {
            Outcome::Compliant => "green",
            Outcome::PartiallyCompliant => "yellow",
            Outcome::NonCompliant => "red",
            Outcome::Indeterminate => "blue",
        };
        self.colorize(label, color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }
        match color {
            "green" => text.green().to_string(),
            "red" => text.red().to_string(),
            "yellow" => text.yellow().to_string(),
            "blue" => text.blue().to_string(),
            _ => text.to_string(),
        }
    }
}
