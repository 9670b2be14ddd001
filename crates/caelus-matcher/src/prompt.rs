//! Judgment prompt engineering

use caelus_domain::Requirement;

/// Builds the requirement block and evidence texts for a judgment call
pub struct PromptBuilder<'a> {
    requirement: &'a Requirement,
    evidence: Vec<(String, String, f32)>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for a requirement
    pub fn new(requirement: &'a Requirement) -> Self {
        Self {
            requirement,
            evidence: Vec::new(),
        }
    }

    /// Add a retrieved evidence item: id, statement, similarity score
    pub fn with_evidence(mut self, evidence: Vec<(String, String, f32)>) -> Self {
        self.evidence = evidence;
        self
    }

    /// Build the requirement block sent to the judgment capability
    pub fn build_requirement_block(&self) -> String {
        let mut block = String::new();

        block.push_str(JUDGMENT_INSTRUCTIONS);
        block.push_str("\n\n");

        block.push_str(&format!("Citation: {}\n", self.requirement.citation));
        block.push_str(&format!("Category: {}\n", self.requirement.category));
        block.push_str("Requirement:\n---\n");
        block.push_str(&self.requirement.statement);
        block.push_str("\n---\n\n");

        block.push_str(OUTPUT_FORMAT_REMINDER);
        block
    }

    /// Build the evidence texts sent alongside the requirement block
    pub fn build_evidence_texts(&self) -> Vec<String> {
        self.evidence
            .iter()
            .map(|(id, statement, similarity)| {
                format!("[{}] (similarity {:.2}) {}", id, similarity, statement)
            })
            .collect()
    }
}

const JUDGMENT_INSTRUCTIONS: &str = r#"You are assessing whether a design specification satisfies a regulatory requirement.
Consider only the evidence statements provided. Do not assume facts that are not stated.
If the evidence is insufficient to decide either way, say so rather than guessing."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Respond with a single JSON object and nothing else:

{
  "outcome": "compliant" | "partially_compliant" | "non_compliant" | "indeterminate",
  "rationale": "one or two sentences citing the evidence by its [id]",
  "confidence": 0.0-1.0
}"#;
