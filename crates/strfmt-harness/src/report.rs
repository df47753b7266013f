//! Report generation for conformance results.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::verify::VerificationSummary;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub title: String,
    /// Cache threshold the cases were rendered under.
    pub threshold: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", self.title);
        let _ = writeln!(out, "- Cache threshold: {}", self.threshold);
        let _ = writeln!(out, "- Timestamp: {}", self.timestamp);
        let _ = writeln!(out, "- Total: {}", self.summary.total);
        let _ = writeln!(out, "- Passed: {}", self.summary.passed);
        let _ = writeln!(out, "- Failed: {}\n", self.summary.failed);

        out.push_str("| Case | Family | Status |\n");
        out.push_str("|------|--------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            let _ = writeln!(out, "| {} | {} | {} |", r.case_name, r.family, status);
        }

        let mut failures = self.summary.failures().peekable();
        if failures.peek().is_some() {
            out.push_str("\n## Failures\n");
            for r in failures {
                let _ = writeln!(out, "\n### {}\n\n```diff", r.case_name);
                out.push_str(r.diff.as_deref().unwrap_or(""));
                out.push_str("```\n");
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::VerificationResult;

    fn report(passed: bool) -> ConformanceReport {
        ConformanceReport {
            title: "strfmt Conformance Report".into(),
            threshold: "always".into(),
            timestamp: "2026-01-01T00:00:00.000Z".into(),
            summary: VerificationSummary::from_results(vec![VerificationResult {
                case_name: "hex_pad".into(),
                family: "verbs/hex".into(),
                passed,
                expected: "  7a".into(),
                actual: if passed { "  7a".into() } else { "7a".into() },
                diff: (!passed).then(|| "--- expected\n+++ actual\n".to_string()),
            }]),
        }
    }

    #[test]
    fn markdown_lists_cases() {
        let md = report(true).to_markdown();
        assert!(md.starts_with("# strfmt Conformance Report\n"));
        assert!(md.contains("- Cache threshold: always\n"));
        assert!(md.contains("| hex_pad | verbs/hex | PASS |"));
        assert!(!md.contains("## Failures"));
    }

    #[test]
    fn markdown_includes_failure_diffs() {
        let md = report(false).to_markdown();
        assert!(md.contains("| hex_pad | verbs/hex | FAIL |"));
        assert!(md.contains("### hex_pad\n\n```diff\n--- expected"));
    }

    #[test]
    fn json_parses_back() {
        let json = report(true).to_json();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["summary"]["total"], 1);
        assert_eq!(parsed["threshold"], "always");
    }
}
