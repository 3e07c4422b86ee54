//! # validate-epub Library
//!
//! Batch EPUB quality assessment: walks a directory tree of EPUB files,
//! runs each through two independent external validators — a structural
//! validator (epubcheck) and a schema-rule validator (probatron) — and
//! reconciles their two differently-shaped XML reports into one pass/fail
//! verdict per file plus a human-readable detail log.

pub mod cli;
pub mod config;
pub mod error;
pub mod file_discovery;
pub mod logs;
pub mod orchestrator;
pub mod report;
pub mod runner;

pub use cli::Cli;
pub use config::{Profile, ToolConfig, resolve_schema_ref, to_file_uri};
pub use error::{Result, SetupError};
pub use file_discovery::FileDiscovery;
pub use logs::{DETAILS_LOG, LINE_SEP, RunLogs, STATUS_LOG};
pub use orchestrator::{BatchOrchestrator, BatchSummary, Disposition, StatusRecord};
pub use report::{
    ReportOutcome, StructuralReport, parse_assertion_report, parse_structural_report,
};
pub use runner::{EXEC_FAILED, ValidatorOutcome, ValidatorRunner};
