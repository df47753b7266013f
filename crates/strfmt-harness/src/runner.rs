//! Test execution engine.

use strfmt_runtime::{CacheThreshold, FormatRegistry};

use crate::diff;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::verify::VerificationResult;

/// Renders fixture cases through a private registry, so a run exercises the
/// same compile-or-lookup path as the public entry points without touching
/// process-wide cache state.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    registry: FormatRegistry,
    passes: usize,
}

impl TestRunner {
    /// Runner that renders each case once.
    #[must_use]
    pub fn new(campaign: impl Into<String>, threshold: CacheThreshold) -> Self {
        Self {
            campaign: campaign.into(),
            registry: FormatRegistry::new(threshold),
            passes: 1,
        }
    }

    /// Render each case `passes` times and require every pass to match, so
    /// that cached and freshly compiled formats are both checked.
    #[must_use]
    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes.max(1);
        self
    }

    #[must_use]
    pub fn threshold(&self) -> CacheThreshold {
        self.registry.threshold()
    }

    #[must_use]
    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| self.run_case(&fixture_set.family, case))
            .collect()
    }

    fn run_case(&self, family: &str, case: &FixtureCase) -> VerificationResult {
        let mut actual = String::new();
        for pass in 0..self.passes {
            let rendered = self.render(case);
            if pass == 0 {
                actual = rendered;
            } else if rendered != actual {
                tracing::warn!(case = %case.name, pass, "rendering changed between passes");
                actual = rendered;
                break;
            }
        }
        let passed = actual == case.expected;
        tracing::debug!(campaign = %self.campaign, family, case = %case.name, passed, "case verified");
        VerificationResult {
            case_name: case.name.clone(),
            family: family.to_string(),
            passed,
            diff: (!passed).then(|| diff::render_diff(&case.expected, &actual)),
            expected: case.expected.clone(),
            actual,
        }
    }

    fn render(&self, case: &FixtureCase) -> String {
        let compiled = self.registry.lookup(&case.format);
        strfmt::sprintf_compiled(&compiled, &case.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> FixtureSet {
        FixtureSet::from_json(
            r#"{
                "version":"v1",
                "family":"smoke",
                "cases":[
                    {"name":"plain","format":"%s!","args":["hi"],"expected":"hi!"},
                    {"name":"missing","format":"%s %s","args":["a"],"expected":"a %!s(MISSING)"},
                    {"name":"wrong","format":"%q","args":["a"],"expected":"a"}
                ]
            }"#,
        )
        .expect("valid fixture json")
    }

    #[test]
    fn runner_reports_pass_and_fail() {
        let results = TestRunner::new("smoke", CacheThreshold::ALWAYS).run(&fixture());
        assert_eq!(results.len(), 3);
        assert!(results[0].passed);
        assert!(results[1].passed);
        assert!(!results[2].passed);
        assert_eq!(results[2].actual, "\"a\"");
        assert!(results[2].diff.as_deref().unwrap().contains("--- expected"));
        assert_eq!(results[0].family, "smoke");
    }

    #[test]
    fn repeated_passes_hit_the_cache() {
        let runner = TestRunner::new("cached", CacheThreshold::ALWAYS).with_passes(3);
        let results = runner.run(&fixture());
        assert!(results[0].passed);
        let m = runner.registry().metrics();
        assert_eq!(m.misses, 3);
        assert_eq!(m.hits, 6);
    }

    #[test]
    fn disabled_threshold_still_renders() {
        let runner = TestRunner::new("uncached", CacheThreshold::DISABLED).with_passes(2);
        let results = runner.run(&fixture());
        assert!(results[0].passed && results[1].passed);
        assert!(runner.registry().cache().is_empty());
    }
}
