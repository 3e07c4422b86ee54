//! The batch pipeline driver.
//!
//! For each discovered file, in order: run the structural validator (which
//! writes its report to an artifact path we choose), run the schema-rule
//! validator over that artifact (persisting its stdout as the second
//! artifact), parse both artifacts, merge the outcomes into one status
//! record, and append it to the logs. Files are processed strictly one at a
//! time; both validators are externally parallel-unsafe.
//!
//! No per-file failure escapes this loop. A crashed validator, a timeout or
//! a malformed report all become a "fail" record with a diagnostic; only log
//! writes (the one thing a batch cannot survive) propagate as errors.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;

use crate::config::ToolConfig;
use crate::error::Result;
use crate::logs::{LINE_SEP, RunLogs};
use crate::report;
use crate::runner::ValidatorRunner;

/// Merged pass/fail verdict for one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Pass,
    Fail,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Pass => "pass",
            Disposition::Fail => "fail",
        }
    }
}

/// Terminal artifact for one input file: exactly one of these is written
/// per discovered file, validator crashes included.
#[derive(Debug, Clone)]
pub struct StatusRecord {
    /// Absolute path of the validated file
    pub path: PathBuf,
    pub disposition: Disposition,
    /// Complete details-log block, line-separator terminated
    pub details: String,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Sequences the two validators and the report merge for every file.
pub struct BatchOrchestrator {
    config: ToolConfig,
    runner: ValidatorRunner,
    /// `file:///`-prefixed schema reference handed to the rule validator
    schema_ref: String,
    out_dir: PathBuf,
}

impl BatchOrchestrator {
    pub fn new(config: ToolConfig, schema_ref: String, out_dir: PathBuf, timeout: Duration) -> Self {
        Self {
            config,
            runner: ValidatorRunner::new(timeout),
            schema_ref,
            out_dir,
        }
    }

    /// Process every file, appending one record per file to the logs.
    pub async fn run(&self, files: &[PathBuf], logs: &mut RunLogs) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        for (index, file) in files.iter().enumerate() {
            let record = self.process_file(index, file).await;
            logs.append(&record).await?;

            summary.total += 1;
            match record.disposition {
                Disposition::Pass => summary.passed += 1,
                Disposition::Fail => summary.failed += 1,
            }
        }

        Ok(summary)
    }

    /// Validate one file end to end. Infallible: every failure mode is
    /// folded into the returned record.
    pub async fn process_file(&self, index: usize, file: &Path) -> StatusRecord {
        let path = fs::canonicalize(file)
            .await
            .unwrap_or_else(|_| file.to_path_buf());

        // Artifact paths are unique per iteration so a validator crash can
        // never leave one file's report to be parsed as the next file's.
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let structure_artifact = self.out_dir.join(format!("{}_{}_structure.xml", stem, index));
        let assertion_artifact = self.out_dir.join(format!("{}_{}_assertions.xml", stem, index));

        // The output directory outlives runs; clear leftovers from an
        // earlier run before the validators write anything.
        let _ = fs::remove_file(&structure_artifact).await;
        let _ = fs::remove_file(&assertion_artifact).await;

        let mut structural_diags: Vec<String> = Vec::new();
        let mut schema_diags: Vec<String> = Vec::new();

        // Validator A: writes its report to the path given after -out.
        let args_a: Vec<OsString> = vec![
            OsString::from("-jar"),
            self.config.epubcheck_jar.clone().into(),
            path.clone().into(),
            OsString::from("-out"),
            structure_artifact.clone().into(),
        ];
        let outcome_a = self.runner.run(&self.config.java, &args_a).await;
        let run_a_failed = outcome_a.exec_failed_outcome();
        if run_a_failed {
            structural_diags.push(diagnostic("Error running structural validator", &outcome_a.stderr));
        }

        // Validator B consumes artifact A (whatever of it exists) and
        // reports on stdout; persisting that stream is our job.
        let args_b: Vec<OsString> = vec![
            OsString::from("-jar"),
            self.config.probatron_jar.clone().into(),
            structure_artifact.clone().into(),
            OsString::from(&self.schema_ref),
        ];
        let outcome_b = self.runner.run(&self.config.java, &args_b).await;
        let mut run_b_failed = outcome_b.exec_failed_outcome();
        if run_b_failed {
            schema_diags.push(diagnostic("Error running schema validator", &outcome_b.stderr));
        } else if let Err(e) = fs::write(&assertion_artifact, &outcome_b.stdout).await {
            run_b_failed = true;
            schema_diags.push(format!("Error persisting schema validator output ({})", e));
        }

        // Parse both artifacts. A missing artifact reads as an empty
        // document, which the parsers report as a failed outcome.
        let assertion_xml = fs::read_to_string(&assertion_artifact)
            .await
            .unwrap_or_default();
        let assertion = report::parse_assertion_report(&assertion_xml);

        let structural_xml = fs::read_to_string(&structure_artifact)
            .await
            .unwrap_or_default();
        let structural = report::parse_structural_report(&structural_xml);

        structural_diags.extend(structural.outcome.messages.iter().cloned());
        schema_diags.extend(assertion.messages.iter().cloned());

        let failed =
            run_a_failed || run_b_failed || !structural.outcome.passed || !assertion.passed;
        let disposition = if failed {
            Disposition::Fail
        } else {
            Disposition::Pass
        };

        let details = details_block(
            &path,
            &structural.version,
            &self.schema_ref,
            &structural.status,
            &structural_diags,
            &schema_diags,
        );

        StatusRecord {
            path,
            disposition,
            details,
        }
    }
}

fn diagnostic(prefix: &str, stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        prefix.to_string()
    } else {
        format!("{} ({})", prefix, stderr)
    }
}

/// Assemble one details-log block, terminated by the `####` separator.
fn details_block(
    path: &Path,
    version: &str,
    schema_ref: &str,
    status: &str,
    structural_lines: &[String],
    schema_lines: &[String],
) -> String {
    let mut lines: Vec<String> = vec![
        format!("file name: {}", path.display()),
        format!("epub version: {}", version),
        format!("schema: {}", schema_ref),
        format!("validation status: {}", status),
    ];

    if !structural_lines.is_empty() {
        lines.push("*** Structural validation errors and warnings:".to_string());
        lines.extend(structural_lines.iter().cloned());
    }
    if !schema_lines.is_empty() {
        lines.push("*** Schema validation errors:".to_string());
        lines.extend(schema_lines.iter().cloned());
    }

    lines.push("####".to_string());

    let mut block = lines.join(LINE_SEP);
    block.push_str(LINE_SEP);
    block
}
