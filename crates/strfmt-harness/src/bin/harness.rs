//! CLI entrypoint for the strfmt conformance harness.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use strfmt_harness::structured_log::{ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, validate_log};
use strfmt_harness::{ConformanceReport, HarnessError, TestRunner, VerificationSummary};
use strfmt_runtime::CacheThreshold;

/// Conformance tooling for strfmt.
#[derive(Debug, Parser)]
#[command(name = "strfmt-harness")]
#[command(about = "Conformance testing harness for strfmt")]
struct Cli {
    /// Print debug tracing to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the formatter against fixture files.
    Verify {
        /// Fixture JSON file, or a directory of them.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown); a JSON copy is written next to it.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path; an artifact index is written next to it.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Cache threshold (`always`, `repetitions`, `disabled` or a count).
        /// Runs under all three named thresholds when omitted.
        #[arg(long)]
        threshold: Option<String>,
        /// Times each case is rendered.
        #[arg(long, default_value_t = 3)]
        passes: usize,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Render one format and print the result.
    Render {
        #[arg(long)]
        format: String,
        /// Argument; repeat for more.
        #[arg(long = "arg")]
        args: Vec<String>,
    },
    /// Print the compiled form of a format as JSON.
    Compile {
        #[arg(long)]
        format: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Command::Verify {
            fixture,
            report,
            log,
            threshold,
            passes,
            timestamp,
        } => verify(&fixture, report, log, threshold, passes, timestamp)?,
        Command::Render { format, args } => {
            strfmt::printf(&format, &args)?;
            println!();
        }
        Command::Compile { format } => {
            let view = strfmt_harness::inspect::CompiledView::new(&strfmt_core::compile(&format));
            println!("{}", view.to_json()?);
        }
    }
    Ok(())
}

fn verify(
    fixture: &Path,
    report: Option<PathBuf>,
    log: Option<PathBuf>,
    threshold: Option<String>,
    passes: usize,
    timestamp: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Verifying against fixtures in {}", fixture.display());
    let fixture_sets = if fixture.is_dir() {
        strfmt_harness::fixtures::load_dir(fixture)?
    } else {
        vec![strfmt_harness::FixtureSet::from_file(fixture)?]
    };

    let thresholds = match threshold.as_deref() {
        Some(s) => vec![CacheThreshold::from_str_loose(s)],
        None => vec![CacheThreshold::ALWAYS, CacheThreshold::REPETITIONS, CacheThreshold::DISABLED],
    };
    let threshold_label = thresholds.iter().map(ToString::to_string).collect::<Vec<_>>().join("+");

    let timestamp = timestamp.unwrap_or_else(strfmt_harness::structured_log::now_utc);
    let run_id = format!("verify-{}", timestamp.replace([':', '.'], "-"));
    let mut emitter = match &log {
        Some(path) => LogEmitter::to_file(path, &run_id)?,
        None => LogEmitter::to_buffer(&run_id),
    };
    emitter.emit_entry(
        LogEntry::new("", LogLevel::Info, "verify_start")
            .with_threshold(threshold_label.clone())
            .with_details(serde_json::json!({ "fixture_sets": fixture_sets.len(), "passes": passes })),
    )?;

    let mut results = Vec::new();
    for threshold in thresholds {
        let runner = TestRunner::new("fixture-verify", threshold).with_passes(passes);
        for set in &fixture_sets {
            let started = std::time::Instant::now();
            let set_results = runner.run(set);
            let elapsed = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
            for r in &set_results {
                let (level, outcome) = if r.passed {
                    (LogLevel::Debug, Outcome::Pass)
                } else {
                    (LogLevel::Error, Outcome::Fail)
                };
                let mut entry = LogEntry::new("", level, "case_verified")
                    .with_case(r.family.clone(), r.case_name.clone())
                    .with_threshold(threshold.to_string())
                    .with_outcome(outcome);
                if !r.passed {
                    entry = entry.with_details(serde_json::json!({ "expected": r.expected, "actual": r.actual }));
                }
                emitter.emit_entry(entry)?;
            }
            emitter.emit_entry(
                LogEntry::new("", LogLevel::Info, "set_verified")
                    .with_case(set.family.clone(), "*")
                    .with_threshold(threshold.to_string())
                    .with_latency_ns(elapsed),
            )?;
            results.extend(set_results);
        }
        let metrics = runner.registry().metrics();
        tracing::info!(
            %threshold,
            lookups = metrics.lookups,
            hits = metrics.hits,
            promotions = metrics.promotions,
            "threshold run complete"
        );
    }

    results.sort_by(|a, b| a.family.cmp(&b.family).then_with(|| a.case_name.cmp(&b.case_name)));

    let report_doc = ConformanceReport {
        title: String::from("strfmt Conformance Report"),
        threshold: threshold_label.clone(),
        timestamp,
        summary: VerificationSummary::from_results(results),
    };
    eprintln!(
        "Verification complete: total={}, passed={}, failed={}",
        report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
    );

    let mut index = ArtifactIndex::new(run_id);
    if let Some(report_path) = &report {
        eprintln!("Writing report to {}", report_path.display());
        std::fs::write(report_path, report_doc.to_markdown())?;
        let json_path = report_path.with_extension("json");
        std::fs::write(&json_path, report_doc.to_json())?;
        index.add_file(report_path, "report")?;
        index.add_file(&json_path, "report")?;
    }

    let outcome = if report_doc.summary.all_passed() { Outcome::Pass } else { Outcome::Fail };
    emitter.emit_entry(
        LogEntry::new("", LogLevel::Info, "verify_end")
            .with_threshold(threshold_label)
            .with_outcome(outcome)
            .with_artifacts(index.artifacts.iter().map(|a| a.path.clone()).collect()),
    )?;
    emitter.flush()?;

    if let Some(log_path) = &log {
        let content = std::fs::read_to_string(log_path)?;
        match validate_log(&content) {
            Ok(entries) => tracing::debug!(entries, "run log validated"),
            Err(errors) => {
                for err in &errors {
                    eprintln!("  {err}");
                }
                return Err(HarnessError::InvalidLog {
                    path: log_path.clone(),
                    invalid: errors.len(),
                }
                .into());
            }
        }
        index.add_file(log_path, "log")?;
        let index_path = log_path.with_extension("index.json");
        std::fs::write(&index_path, index.to_json()?)?;
        eprintln!("Wrote artifact index to {}", index_path.display());
    }

    if !report_doc.summary.all_passed() {
        return Err(HarnessError::Failed {
            failed: report_doc.summary.failed,
            total: report_doc.summary.total,
        }
        .into());
    }
    Ok(())
}
