//! Parse judgment capability output into a structured response

use crate::error::MatcherError;
use caelus_domain::Outcome;
use serde_json::Value;

/// A parsed judgment response
#[derive(Debug, Clone, PartialEq)]
pub struct JudgmentResponse {
    /// The capability's outcome determination
    pub outcome: Outcome,
    /// Free-text rationale, carried into the verdict verbatim
    pub rationale: String,
    /// The capability's self-reported confidence, if any. Advisory only;
    /// the matcher caps it by retrieval similarity.
    pub confidence: Option<f64>,
}

/// Parse raw model text into a judgment response
///
/// Models sometimes wrap JSON in markdown code blocks or lead with prose;
/// this parser tolerates both.
pub fn parse_judgment(response: &str) -> Result<JudgmentResponse, MatcherError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| MatcherError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| MatcherError::InvalidFormat("Expected JSON object".to_string()))?;

    let outcome_str = obj
        .get("outcome")
        .and_then(|v| v.as_str())
        .ok_or_else(|| MatcherError::InvalidFormat("Missing or invalid 'outcome'".to_string()))?;

    let outcome = Outcome::parse(outcome_str).ok_or_else(|| {
        MatcherError::InvalidFormat(format!("Unknown outcome '{}'", outcome_str))
    })?;

    let rationale = obj
        .get("rationale")
        .and_then(|v| v.as_str())
        .ok_or_else(|| MatcherError::InvalidFormat("Missing or invalid 'rationale'".to_string()))?
        .to_string();

    // Confidence is optional; out-of-range values are clamped downstream
    let confidence = obj.get("confidence").and_then(|v| v.as_f64());

    Ok(JudgmentResponse {
        outcome,
        rationale,
        confidence,
    })
}

/// Extract JSON from a response, handling markdown code blocks and
/// surrounding prose
fn extract_json(response: &str) -> Result<String, MatcherError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(MatcherError::InvalidFormat("Empty code block".to_string()));
        }
        // Skip the opening fence (``` or ```json) and the closing fence
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        return Ok(json_lines.join("\n"));
    }

    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    // Prose before the object: find the outermost braces
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(trimmed[start..=end].to_string()),
        _ => Err(MatcherError::InvalidFormat(
            "No JSON object in response".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw_json() {
        let response = r#"{"outcome": "compliant", "rationale": "evidence [DS-1] meets the clause", "confidence": 0.9}"#;
        let parsed = parse_judgment(response).unwrap();

        assert_eq!(parsed.outcome, Outcome::Compliant);
        assert!(parsed.rationale.contains("DS-1"));
        assert_eq!(parsed.confidence, Some(0.9));
    }

    #[test]
    fn test_parse_markdown_fenced_json() {
        let response = "```json\n{\"outcome\": \"non_compliant\", \"rationale\": \"no backup power\"}\n```";
        let parsed = parse_judgment(response).unwrap();

        assert_eq!(parsed.outcome, Outcome::NonCompliant);
        assert_eq!(parsed.confidence, None);
    }

    #[test]
    fn test_parse_bare_fence() {
        let response = "```\n{\"outcome\": \"indeterminate\", \"rationale\": \"evidence silent\"}\n```";
        let parsed = parse_judgment(response).unwrap();
        assert_eq!(parsed.outcome, Outcome::Indeterminate);
    }

    #[test]
    fn test_parse_with_leading_prose() {
        let response = "Here is my assessment:\n\n{\"outcome\": \"partially_compliant\", \"rationale\": \"one of two trains qualified\"}";
        let parsed = parse_judgment(response).unwrap();
        assert_eq!(parsed.outcome, Outcome::PartiallyCompliant);
    }

    #[test]
    fn test_unknown_outcome_rejected() {
        let response = r#"{"outcome": "probably_fine", "rationale": "looks ok"}"#;
        let result = parse_judgment(response);
        assert!(matches!(result, Err(MatcherError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_rationale_rejected() {
        let response = r#"{"outcome": "compliant"}"#;
        let result = parse_judgment(response);
        assert!(matches!(result, Err(MatcherError::InvalidFormat(_))));
    }

    #[test]
    fn test_non_json_rejected() {
        let result = parse_judgment("The design looks compliant to me.");
        assert!(matches!(result, Err(MatcherError::InvalidFormat(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = parse_judgment(r#"{"outcome": "compliant", "rationale": "#);
        assert!(matches!(result, Err(MatcherError::InvalidFormat(_))));
    }
}
