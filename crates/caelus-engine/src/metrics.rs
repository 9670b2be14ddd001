//! Metrics collection for assessment runs

use caelus_domain::Method;
use std::collections::HashMap;

/// Metrics collected during one assessment run
///
/// Tracks how verdicts were reached, how often the judgment capability was
/// retried, and how many requirements fell through to indeterminate.
#[derive(Debug, Clone, Default)]
pub struct AssessmentMetrics {
    /// Verdicts per decision method (keyed by `Method::as_str`)
    pub verdicts_by_method: HashMap<&'static str, usize>,

    /// Judgment call retries performed across the run
    pub judgment_retries: usize,

    /// Requirements recorded indeterminate because the judgment capability
    /// stayed unavailable through all retries
    pub judgment_failures: usize,

    /// Conflict warnings emitted by the adjustment pass
    pub conflict_warnings: usize,

    /// Verdicts downgraded because a prerequisite was non-compliant
    pub dependency_downgrades: usize,

    /// Total runtime in milliseconds
    pub runtime_ms: u64,
}

impl AssessmentMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a verdict reached by the given method
    pub fn record_verdict(&mut self, method: Method) {
        *self.verdicts_by_method.entry(method.as_str()).or_insert(0) += 1;
    }

    /// Record a judgment call that failed through all retries
    pub fn record_judgment_failure(&mut self) {
        self.judgment_failures += 1;
    }

    /// Total verdicts recorded
    pub fn total_verdicts(&self) -> usize {
        self.verdicts_by_method.values().sum()
    }

    /// Human-readable one-block summary for logs
    pub fn summary(&self) -> String {
        let mut methods: Vec<_> = self.verdicts_by_method.iter().collect();
        methods.sort();
        let methods = methods
            .iter()
            .map(|(m, n)| format!("{}: {}", m, n))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "verdicts [{}], retries: {}, failures: {}, downgrades: {}, warnings: {}, runtime: {}ms",
            methods,
            self.judgment_retries,
            self.judgment_failures,
            self.dependency_downgrades,
            self.conflict_warnings,
            self.runtime_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_verdicts_by_method() {
        let mut metrics = AssessmentMetrics::new();
        metrics.record_verdict(Method::Rule);
        metrics.record_verdict(Method::Rule);
        metrics.record_verdict(Method::Semantic);

        assert_eq!(metrics.verdicts_by_method.get("rule"), Some(&2));
        assert_eq!(metrics.verdicts_by_method.get("semantic"), Some(&1));
        assert_eq!(metrics.total_verdicts(), 3);
    }

    #[test]
    fn test_summary_mentions_counts() {
        let mut metrics = AssessmentMetrics::new();
        metrics.record_verdict(Method::Hybrid);
        metrics.judgment_retries += 1;
        metrics.record_judgment_failure();

        let summary = metrics.summary();
        assert!(summary.contains("hybrid: 1"));
        assert!(summary.contains("retries: 1"));
        assert!(summary.contains("failures: 1"));
    }
}
