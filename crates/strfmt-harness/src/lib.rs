//! Conformance harness for strfmt.
//!
//! This crate provides:
//! - Fixtures: JSON case files pairing a format and arguments with the
//!   expected rendering
//! - Runner: renders every case under a chosen cache threshold
//! - Verification summaries, diffs and markdown/JSON reports
//! - Structured JSONL run logs with a SHA-256 artifact index
//! - Inspection: a serializable view of compiled formats

#![forbid(unsafe_code)]

pub mod diff;
pub mod error;
pub mod fixtures;
pub mod inspect;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use error::HarnessError;
pub use fixtures::{FixtureCase, FixtureSet};
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::{VerificationResult, VerificationSummary};
